use serde::{Deserialize, Serialize};
use zhang_linear::{HomographyOptions, ZhangOptions, MIN_VIEWS};
use zhang_optim::RefineOptions;

/// Options for one calibration run. Every field has a default, so a partial
/// JSON object (or `{}`) is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Minimum number of views that must survive the per-view stages.
    /// Values below 3 are raised to 3.
    pub min_views: usize,
    /// Process views on the rayon thread pool.
    pub parallel: bool,
    pub homography: HomographyOptions,
    pub refine: RefineOptions,
    pub intrinsics: ZhangOptions,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_views: MIN_VIEWS,
            parallel: true,
            homography: HomographyOptions::default(),
            refine: RefineOptions::default(),
            intrinsics: ZhangOptions::default(),
        }
    }
}

impl CalibrationConfig {
    pub fn effective_min_views(&self) -> usize {
        self.min_views.max(MIN_VIEWS)
    }
}
