use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use zhang_core::synthetic::{noise::PixelNoise, planar};
use zhang_core::{CalibError, IntrinsicMatrix, Iso3, PatternSize, Pt2, Real, Vec3};
use zhang_pipeline::{
    run_calibration, CalibrationConfig, CalibrationInput, CalibrationPipeline, Stage,
};

fn camera() -> IntrinsicMatrix {
    IntrinsicMatrix {
        alpha: 800.0,
        beta: 800.0,
        gamma: 0.0,
        uc: 320.0,
        vc: 240.0,
    }
}

fn pattern() -> PatternSize {
    PatternSize::new(9, 6, 0.025)
}

fn synthetic_input(n_views: usize) -> Result<CalibrationInput> {
    let pattern = pattern();
    let poses = planar::tilted_poses(n_views, 0.45, 0.5, pattern.center());
    let views = planar::project_views(&camera(), &pattern.object_points(), &poses)?;
    Ok(CalibrationInput { pattern, views })
}

fn assert_close(est: &IntrinsicMatrix, gt: &IntrinsicMatrix, rel_tol: Real) {
    for (name, e, g) in [
        ("alpha", est.alpha, gt.alpha),
        ("beta", est.beta, gt.beta),
        ("uc", est.uc, gt.uc),
        ("vc", est.vc, gt.vc),
    ] {
        assert!((e - g).abs() <= rel_tol * g, "{name}: {e} vs {g}");
    }
    assert!(est.gamma.abs() <= rel_tol * gt.alpha, "gamma {}", est.gamma);
}

#[test]
fn recovers_intrinsics_from_clean_views() -> Result<()> {
    let input = synthetic_input(5)?;
    let report = run_calibration(&input, &CalibrationConfig::default())?;

    assert_close(&report.intrinsics, &camera(), 0.01);
    assert_eq!(report.views.len(), 5);
    assert!(report.dropped.is_empty());
    for view in &report.views {
        assert_eq!(view.homography.matrix()[(2, 2)], 1.0);
        assert!(view.reprojection.rms < 1e-6, "rms {}", view.reprojection.rms);
    }
    Ok(())
}

#[test]
fn recovers_intrinsics_from_noisy_views() -> Result<()> {
    let mut input = synthetic_input(8)?;
    input.views = PixelNoise::new(11, 0.3).apply_all(&input.views);

    let report = run_calibration(&input, &CalibrationConfig::default())?;
    assert_close(&report.intrinsics, &camera(), 0.05);
    for view in &report.views {
        assert!(view.reprojection.rms < 0.5, "rms {}", view.reprojection.rms);
    }
    Ok(())
}

#[test]
fn mismatched_view_is_dropped() -> Result<()> {
    let mut input = synthetic_input(5)?;
    input.views[2].object_points.pop();
    input.views[2].image_points.pop();

    let report = run_calibration(&input, &CalibrationConfig::default())?;
    assert_eq!(report.views.len(), 4);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].index, 2);
    assert_eq!(report.dropped[0].stage, Stage::Ingest);
    assert_close(&report.intrinsics, &camera(), 0.01);
    Ok(())
}

#[test]
fn two_views_are_insufficient() -> Result<()> {
    let input = synthetic_input(2)?;
    let err = run_calibration(&input, &CalibrationConfig::default()).unwrap_err();

    assert_eq!(err.stage, Stage::SolveIntrinsics);
    assert_eq!(err.view, None);
    assert_eq!(
        err.kind(),
        &CalibError::InsufficientViews {
            available: 2,
            required: 3
        }
    );
    Ok(())
}

#[test]
fn dropping_below_minimum_is_fatal() -> Result<()> {
    let mut input = synthetic_input(4)?;
    input.views[0].image_points.truncate(10);
    input.views[0].object_points.truncate(10);

    let config = CalibrationConfig {
        min_views: 4,
        ..CalibrationConfig::default()
    };
    let err = run_calibration(&input, &config).unwrap_err();
    assert_eq!(
        err.kind(),
        &CalibError::InsufficientViews {
            available: 3,
            required: 4
        }
    );
    assert_eq!(err.dropped.len(), 1);
    Ok(())
}

#[test]
fn near_identical_views_are_degenerate() -> Result<()> {
    let pattern = pattern();
    let poses: Vec<_> = [0.45, 0.5, 0.55, 0.6]
        .iter()
        .map(|&z| {
            planar::pose_from_euler(
                0.25,
                -0.2,
                0.1,
                Vec3::new(-pattern.center().x, -pattern.center().y, z),
            )
        })
        .collect();
    let views = planar::project_views(&camera(), &pattern.object_points(), &poses)?;
    let input = CalibrationInput { pattern, views };

    let err = run_calibration(&input, &CalibrationConfig::default()).unwrap_err();
    assert_eq!(err.stage, Stage::SolveIntrinsics);
    assert!(
        matches!(err.kind(), CalibError::DegenerateConfiguration { .. }),
        "unexpected error: {err}"
    );
    Ok(())
}

/// Three shots of the same orientation at nearly the same distance. Pixel
/// noise lifts the second null direction of `V` off zero, but only to the
/// noise level.
#[test]
fn noisy_near_identical_views_are_degenerate() -> Result<()> {
    let pattern = pattern();
    let poses: Vec<_> = [0.50, 0.51, 0.52]
        .iter()
        .map(|&z| {
            planar::pose_from_euler(
                0.25,
                -0.2,
                0.1,
                Vec3::new(-pattern.center().x, -pattern.center().y, z),
            )
        })
        .collect();
    let clean = planar::project_views(&camera(), &pattern.object_points(), &poses)?;

    for amplitude in [0.05, 0.3] {
        let input = CalibrationInput {
            pattern,
            views: PixelNoise::new(9, amplitude).apply_all(&clean),
        };
        let err = run_calibration(&input, &CalibrationConfig::default()).unwrap_err();
        assert_eq!(err.stage, Stage::SolveIntrinsics, "{amplitude} px");
        assert!(err.dropped.is_empty());
        assert!(
            matches!(err.kind(), CalibError::DegenerateConfiguration { .. }),
            "unexpected error at {amplitude} px: {err}"
        );
    }
    Ok(())
}

#[test]
fn degenerate_views_are_dropped_at_their_stage() -> Result<()> {
    let pattern = pattern();
    let poses = planar::tilted_poses(6, 0.45, 0.5, pattern.center());
    let mut input = CalibrationInput {
        pattern,
        views: planar::project_views(&camera(), &pattern.object_points(), &poses)?,
    };
    let n = pattern.num_points();

    // All target points on one horizontal line: no spread in y to normalize.
    let flat: Vec<Pt2> = (0..n).map(|i| Pt2::new(i as Real * 0.002, 0.0)).collect();
    input.views[1] = planar::project_view(&camera(), &poses[1], &flat)?;

    // On a diagonal both axes normalize, but the DLT has no unique solution.
    let diagonal: Vec<Pt2> = (0..n)
        .map(|i| Pt2::new(i as Real * 0.002, i as Real * 0.002))
        .collect();
    input.views[4] = planar::project_view(&camera(), &poses[4], &diagonal)?;

    let report = run_calibration(&input, &CalibrationConfig::default())?;
    assert_eq!(report.dropped.len(), 2);
    assert_eq!(
        (report.dropped[0].index, report.dropped[0].stage),
        (1, Stage::Normalize)
    );
    assert_eq!(
        (report.dropped[1].index, report.dropped[1].stage),
        (4, Stage::Estimate)
    );
    assert!(report.dropped[0].reason.contains("zero variance along y"), "{}", report.dropped[0]);
    assert_eq!(
        report.views.iter().map(|v| v.index).collect::<Vec<_>>(),
        vec![0, 2, 3, 5]
    );
    assert_close(&report.intrinsics, &camera(), 0.01);
    Ok(())
}

/// Board tilted about a random in-plane axis, with random yaw, distance and
/// off-center placement.
fn random_pose(rng: &mut StdRng, pattern: &PatternSize) -> Iso3 {
    let axis: Real = rng.gen_range(0.0..std::f64::consts::PI);
    let tilt: Real = rng.gen_range(0.25..0.6);
    let yaw: Real = rng.gen_range(-0.3..0.3);
    let (roll, pitch) = (tilt * axis.cos(), tilt * axis.sin());

    let rotation = planar::pose_from_euler(roll, pitch, yaw, Vec3::zeros()).rotation;
    let c = pattern.center();
    let placement = Vec3::new(
        rng.gen_range(-0.03..0.03),
        rng.gen_range(-0.03..0.03),
        rng.gen_range(0.45..0.65),
    );
    planar::pose_from_euler(roll, pitch, yaw, placement - rotation * Vec3::new(c.x, c.y, 0.0))
}

#[test]
fn recovers_intrinsics_from_random_poses() -> Result<()> {
    let pattern = pattern();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let poses: Vec<_> = (0..6).map(|_| random_pose(&mut rng, &pattern)).collect();
    let views = planar::project_views(&camera(), &pattern.object_points(), &poses)?;
    let input = CalibrationInput {
        pattern,
        views: PixelNoise::new(21, 0.1).apply_all(&views),
    };

    let pipeline = CalibrationPipeline::new(CalibrationConfig::default());
    assert_eq!(pipeline.config().effective_min_views(), 3);
    let report = pipeline.run(&input)?;

    assert!(report.dropped.is_empty());
    assert_close(&report.intrinsics, &camera(), 0.03);

    let homographies = report.homographies();
    assert_eq!(homographies.len(), 6);
    for (h, view) in homographies.iter().zip(&input.views) {
        assert!(h.reprojection_stats(view).rms < 0.2);
    }
    Ok(())
}

#[test]
fn parallel_and_sequential_runs_agree() -> Result<()> {
    let mut input = synthetic_input(6)?;
    input.views = PixelNoise::new(3, 0.2).apply_all(&input.views);

    let parallel = CalibrationPipeline::new(CalibrationConfig::default()).run(&input)?;
    let sequential = CalibrationPipeline::new(CalibrationConfig {
        parallel: false,
        ..CalibrationConfig::default()
    })
    .run(&input)?;

    assert_eq!(parallel, sequential);
    Ok(())
}

#[test]
fn report_round_trips_through_json() -> Result<()> {
    let input = synthetic_input(4)?;
    let report = run_calibration(&input, &CalibrationConfig::default())?;

    let json = serde_json::to_string(&report)?;
    let restored: zhang_pipeline::CalibrationReport = serde_json::from_str(&json)?;
    let (a, b) = (restored.intrinsics, report.intrinsics);
    for (x, y) in [
        (a.alpha, b.alpha),
        (a.beta, b.beta),
        (a.gamma, b.gamma),
        (a.uc, b.uc),
        (a.vc, b.vc),
    ] {
        assert!((x - y).abs() <= 1e-9 * y.abs().max(1.0), "{x} vs {y}");
    }
    assert_eq!(restored.views.len(), report.views.len());
    assert_eq!(restored.dropped, report.dropped);
    assert_eq!(
        restored.views[0].refinement.is_refined(),
        report.views[0].refinement.is_refined()
    );
    Ok(())
}
