use crate::{Mat3, Real};
use serde::{Deserialize, Serialize};

/// Pinhole intrinsics recovered by Zhang's method.
///
/// The corresponding calibration matrix has the form:
///
/// ```text
/// [ alpha  gamma  uc ]
/// [   0    beta   vc ]
/// [   0     0      1 ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicMatrix {
    /// Focal scale along the image u axis (pixels).
    pub alpha: Real,
    /// Focal scale along the image v axis (pixels).
    pub beta: Real,
    /// Skew between the image axes.
    pub gamma: Real,
    /// Principal point u coordinate (pixels).
    pub uc: Real,
    /// Principal point v coordinate (pixels).
    pub vc: Real,
}

impl IntrinsicMatrix {
    /// Return the 3×3 upper-triangular calibration matrix.
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.alpha, self.gamma, self.uc, 0.0, self.beta, self.vc, 0.0, 0.0, 1.0,
        )
    }

    /// Build from an upper-triangular matrix normalized so that `K[2,2] == 1`.
    pub fn from_k_matrix(k: &Mat3) -> Self {
        let s = k[(2, 2)];
        Self {
            alpha: k[(0, 0)] / s,
            gamma: k[(0, 1)] / s,
            uc: k[(0, 2)] / s,
            beta: k[(1, 1)] / s,
            vc: k[(1, 2)] / s,
        }
    }
}

impl From<IntrinsicMatrix> for Mat3 {
    fn from(k: IntrinsicMatrix) -> Self {
        k.k_matrix()
    }
}
