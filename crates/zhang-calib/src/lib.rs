//! High-level entry crate for `zhang-calib`.
//!
//! Recovers the intrinsic matrix of a pinhole camera (focal scales, skew and
//! principal point) from several images of a planar pattern, following
//! Zhang's method: a normalized DLT homography per view, Levenberg–Marquardt
//! refinement of each homography, and a closed-form solve over all views.
//!
//! ## One call
//!
//! ```no_run
//! use zhang_calib::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input: CalibrationInput = serde_json::from_str(&std::fs::read_to_string("views.json")?)?;
//! let report = run_calibration(&input, &CalibrationConfig::default())?;
//! println!("K = {}", report.intrinsics.k_matrix());
//! for dropped in &report.dropped {
//!     println!("{dropped}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Stage by stage
//!
//! Every stage is usable on its own:
//!
//! ```
//! use zhang_calib::prelude::*;
//! use zhang_calib::core::synthetic::planar;
//!
//! let k = IntrinsicMatrix { alpha: 800.0, beta: 800.0, gamma: 0.0, uc: 320.0, vc: 240.0 };
//! let pattern = PatternSize::new(8, 6, 0.03);
//! let poses = planar::tilted_poses(3, 0.4, 0.6, pattern.center());
//! let views = planar::project_views(&k, &pattern.object_points(), &poses).unwrap();
//!
//! let homographies: Vec<Homography> = views
//!     .iter()
//!     .map(|v| -> Result<Homography, CalibError> {
//!         let h = HomographySolver::estimate(v, &HomographyOptions::default())?;
//!         Ok(refine_homography(&h, v, &RefineOptions::default()).homography)
//!     })
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let est = estimate_intrinsics_from_homographies(&homographies, &ZhangOptions::default()).unwrap();
//! assert!((est.alpha - 800.0).abs() < 1.0);
//! ```

/// Core types, error taxonomy and synthetic data helpers.
pub mod core {
    pub use zhang_core::*;
}

/// Point normalization, DLT homography and the closed-form intrinsics solve.
pub mod linear {
    pub use zhang_linear::*;
}

/// Least-squares abstraction, LM backend and homography refinement.
pub mod optim {
    pub use zhang_optim::*;
}

/// The multi-view calibration pipeline.
pub mod pipeline {
    pub use zhang_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use zhang_calib::prelude::*;`.
pub mod prelude {
    pub use crate::core::{
        CalibError, Correspondence, Homography, IntrinsicMatrix, PatternSize, Pt2, Real,
        ReprojectionStats,
    };

    pub use crate::linear::{
        estimate_intrinsics_from_homographies, HomographyOptions, HomographySolver,
        NormalizationTransform, ZhangOptions,
    };

    pub use crate::optim::{refine_homography, RefineOptions, RefineOutcome, SolveOptions};

    pub use crate::pipeline::{
        run_calibration, CalibrationConfig, CalibrationInput, CalibrationPipeline,
        CalibrationReport, DroppedView, PipelineError, Stage,
    };
}
