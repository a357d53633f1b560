use crate::Real;
use thiserror::Error;

/// Failure modes of the calibration stages.
///
/// Per-view errors ([`CalibError::is_per_view`]) only disqualify the view they
/// were raised for; the remaining variants are fatal for a calibration run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibError {
    /// Point set cannot be normalized (empty, coincident or zero variance along an axis).
    #[error("degenerate point set: {reason}")]
    DegenerateInput { reason: String },

    /// The DLT design matrix does not have a well separated one-dimensional null space.
    #[error(
        "ill-conditioned homography system: smallest singular values {smallest:.3e} / {second_smallest:.3e} (largest {largest:.3e})"
    )]
    RankDeficient {
        smallest: Real,
        second_smallest: Real,
        largest: Real,
    },

    /// Homography cannot be scaled so that `h[2,2] == 1`.
    #[error("homography scale h[2,2] = {h22:.3e} is too close to zero")]
    DegenerateHomography { h22: Real },

    /// Not enough usable views for intrinsic recovery.
    #[error("need at least {required} usable views, got {available}")]
    InsufficientViews { available: usize, required: usize },

    /// The homographies do not single out one conic `B`: either several null
    /// directions (all poses alike) or none (homographies from different cameras).
    #[error(
        "views do not determine the intrinsics: singular value ratio {ratio:.3e} outside threshold {tol:.3e}"
    )]
    DegenerateConfiguration { ratio: Real, tol: Real },

    /// Negative radicand or vanishing denominator in the closed-form back-substitution.
    #[error("numerical instability while computing {quantity}: {value:.3e}")]
    NumericalInstability { quantity: &'static str, value: Real },

    /// Object and image point lists have different lengths.
    #[error("object / image point counts must match: {object} vs {image}")]
    PointCountMismatch { object: usize, image: usize },

    /// Fewer than four correspondences.
    #[error("need at least 4 point correspondences, got {0}")]
    TooFewPoints(usize),

    /// Point count differs from the calibration pattern size.
    #[error("view has {got} points, pattern expects {expected}")]
    PatternMismatch { expected: usize, got: usize },
}

impl CalibError {
    /// Whether the error only invalidates a single view.
    pub fn is_per_view(&self) -> bool {
        matches!(
            self,
            CalibError::DegenerateInput { .. }
                | CalibError::RankDeficient { .. }
                | CalibError::DegenerateHomography { .. }
                | CalibError::PointCountMismatch { .. }
                | CalibError::TooFewPoints(_)
                | CalibError::PatternMismatch { .. }
        )
    }

    /// Shorthand for [`CalibError::DegenerateInput`].
    pub fn degenerate_input(reason: impl Into<String>) -> Self {
        CalibError::DegenerateInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_view_classification() {
        assert!(CalibError::TooFewPoints(3).is_per_view());
        assert!(CalibError::DegenerateHomography { h22: 0.0 }.is_per_view());
        assert!(!CalibError::InsufficientViews {
            available: 2,
            required: 3
        }
        .is_per_view());
        assert!(!CalibError::NumericalInstability {
            quantity: "lambda",
            value: -1.0
        }
        .is_per_view());
    }

    #[test]
    fn messages_carry_context() {
        let err = CalibError::PatternMismatch {
            expected: 20,
            got: 19,
        };
        assert_eq!(err.to_string(), "view has 19 points, pattern expects 20");
    }
}
