//! Calibrate a simulated camera from noisy views of a chessboard.
//!
//! ```text
//! RUST_LOG=debug cargo run -p zhang-calib --example planar_synthetic
//! ```

use anyhow::Result;
use zhang_calib::core::synthetic::{noise::PixelNoise, planar};
use zhang_calib::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let k_gt = IntrinsicMatrix {
        alpha: 1200.0,
        beta: 1180.0,
        gamma: 0.0,
        uc: 640.0,
        vc: 400.0,
    };
    let pattern = PatternSize::new(9, 6, 0.025);
    let poses = planar::tilted_poses(8, 0.45, 0.6, pattern.center());
    let clean = planar::project_views(&k_gt, &pattern.object_points(), &poses)?;

    let mut views = PixelNoise::new(1, 0.3).apply_all(&clean);
    // One short detection to show the drop path.
    views[3].object_points.truncate(40);
    views[3].image_points.truncate(40);

    let report = run_calibration(&CalibrationInput { pattern, views }, &CalibrationConfig::default())?;

    println!("ground truth: {k_gt:?}");
    println!("estimate:     {:?}", report.intrinsics);
    for view in &report.views {
        println!(
            "view {}: rms {:.3} px, max {:.3} px",
            view.index, view.reprojection.rms, view.reprojection.max
        );
    }
    for dropped in &report.dropped {
        println!("{dropped}");
    }
    println!("{}", serde_json::to_string_pretty(&report.intrinsics)?);
    Ok(())
}
