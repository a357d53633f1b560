use serde::{Deserialize, Serialize};
use std::fmt;
use zhang_core::{Correspondence, Homography, IntrinsicMatrix, PatternSize, ReprojectionStats};
use zhang_optim::RefineOutcome;

/// Stages of a calibration run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Normalize,
    Estimate,
    Refine,
    SolveIntrinsics,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingest => "ingest",
            Stage::Normalize => "normalize",
            Stage::Estimate => "estimate",
            Stage::Refine => "refine",
            Stage::SolveIntrinsics => "solve_intrinsics",
        };
        f.write_str(name)
    }
}

/// Input of a calibration run: the target pattern and one correspondence
/// set per captured image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInput {
    pub pattern: PatternSize,
    pub views: Vec<Correspondence>,
}

/// A view removed from the run by a per-view stage failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedView {
    /// Index into [`CalibrationInput::views`].
    pub index: usize,
    pub stage: Stage,
    pub reason: String,
}

impl fmt::Display for DroppedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view {} dropped at {}: {}", self.index, self.stage, self.reason)
    }
}

/// Per-view result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewReport {
    pub index: usize,
    /// Final (refined or linear) homography, `H[2,2] == 1`.
    pub homography: Homography,
    pub refinement: RefineOutcome,
    /// Pixel reprojection error of `homography` over the view.
    pub reprojection: ReprojectionStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub intrinsics: IntrinsicMatrix,
    /// Views that reached the intrinsics solve, in input order.
    pub views: Vec<ViewReport>,
    pub dropped: Vec<DroppedView>,
}

impl CalibrationReport {
    /// Homographies in the order they entered the intrinsics solve.
    pub fn homographies(&self) -> Vec<Homography> {
        self.views.iter().map(|v| v.homography).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_match_serde() {
        for stage in [
            Stage::Ingest,
            Stage::Normalize,
            Stage::Estimate,
            Stage::Refine,
            Stage::SolveIntrinsics,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{stage}\""));
        }
    }

    #[test]
    fn dropped_view_display() {
        let d = DroppedView {
            index: 4,
            stage: Stage::Ingest,
            reason: "view has 19 points, pattern expects 20".into(),
        };
        assert_eq!(
            d.to_string(),
            "view 4 dropped at ingest: view has 19 points, pattern expects 20"
        );
    }
}
