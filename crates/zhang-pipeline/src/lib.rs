//! Multi-view planar calibration pipeline.
//!
//! Runs `Ingest → Normalize → Estimate → Refine` independently for every view,
//! drops views that fail a per-view stage, and solves Zhang's closed form for
//! the intrinsic matrix once at least [`CalibrationConfig::min_views`] views
//! survive.
//!
//! ```no_run
//! use zhang_pipeline::{run_calibration, CalibrationConfig, CalibrationInput};
//!
//! # fn load() -> CalibrationInput { unimplemented!() }
//! let input = load();
//! let report = run_calibration(&input, &CalibrationConfig::default())?;
//! println!("alpha = {:.2}", report.intrinsics.alpha);
//! # Ok::<(), zhang_pipeline::PipelineError>(())
//! ```

mod config;
mod error;
mod pipeline;
mod report;
mod view;

pub use config::CalibrationConfig;
pub use error::PipelineError;
pub use pipeline::{run_calibration, CalibrationPipeline};
pub use report::{CalibrationInput, CalibrationReport, DroppedView, Stage, ViewReport};
pub use view::{NormalizedView, View};
