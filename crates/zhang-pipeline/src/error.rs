use crate::report::{DroppedView, Stage};
use thiserror::Error;
use zhang_core::CalibError;

/// Fatal failure of a calibration run.
///
/// Carries the stage that failed, the offending view (if the failure is tied
/// to one) and every view dropped before the failure, so that input quality
/// problems can be diagnosed from the error alone.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "calibration failed at {stage}{}: {source}",
    view_suffix(.view)
)]
pub struct PipelineError {
    pub stage: Stage,
    pub view: Option<usize>,
    pub dropped: Vec<DroppedView>,
    pub source: CalibError,
}

fn view_suffix(view: &Option<usize>) -> String {
    view.map(|v| format!(" (view {v})")).unwrap_or_default()
}

impl PipelineError {
    /// The underlying calibration error.
    pub fn kind(&self) -> &CalibError {
        &self.source
    }
}
