use crate::{transform_point, CalibError, Correspondence, Mat3, Pt2, Real, ReprojectionStats};
use serde::{Deserialize, Serialize};

/// Relative magnitude below which `h[2,2]` is treated as zero.
pub const HOMOGRAPHY_SCALE_TOL: Real = 1e-12;

/// Plane-to-image homography `x' ~ H x`, scaled so that `H[2,2] == 1`.
///
/// Serialized as three rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[[Real; 3]; 3]", try_from = "[[Real; 3]; 3]")]
pub struct Homography {
    matrix: Mat3,
}

impl Homography {
    /// Scale `m` so that its bottom-right entry is one.
    ///
    /// # Errors
    ///
    /// [`CalibError::DegenerateHomography`] if `|m[2,2]|` is negligible relative
    /// to the matrix norm or not finite.
    pub fn from_matrix(m: Mat3) -> Result<Self, CalibError> {
        let h22 = m[(2, 2)];
        let norm = m.norm();
        if !h22.is_finite() || !norm.is_finite() || h22.abs() <= HOMOGRAPHY_SCALE_TOL * norm {
            return Err(CalibError::DegenerateHomography { h22 });
        }
        Ok(Self { matrix: m / h22 })
    }

    /// Build from nine row-major entries `[h0 .. h8]`.
    pub fn from_params(h: &[Real; 9]) -> Result<Self, CalibError> {
        Self::from_matrix(Mat3::from_row_slice(h))
    }

    /// Underlying 3×3 matrix.
    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    /// Row-major flattening `[h0 .. h8]`, the parameterization used by the refiner.
    pub fn params(&self) -> [Real; 9] {
        let m = &self.matrix;
        [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)],
        ]
    }

    /// Map an object-plane point into the image.
    pub fn map(&self, p: &Pt2) -> Option<Pt2> {
        transform_point(&self.matrix, p)
    }

    /// Per-point Euclidean reprojection errors; unmappable points yield `inf`.
    pub fn reprojection_errors(&self, view: &Correspondence) -> Vec<Real> {
        view.iter()
            .map(|(obj, img)| match self.map(obj) {
                Some(proj) => (proj - *img).norm(),
                None => Real::INFINITY,
            })
            .collect()
    }

    /// Sum of squared reprojection errors over the view.
    pub fn sum_squared_error(&self, view: &Correspondence) -> Real {
        self.reprojection_errors(view).iter().map(|e| e * e).sum()
    }

    pub fn reprojection_stats(&self, view: &Correspondence) -> ReprojectionStats {
        ReprojectionStats::from_errors(&self.reprojection_errors(view))
    }
}

impl From<Homography> for [[Real; 3]; 3] {
    fn from(h: Homography) -> Self {
        let m = h.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }
}

impl TryFrom<[[Real; 3]; 3]> for Homography {
    type Error = CalibError;

    fn try_from(rows: [[Real; 3]; 3]) -> Result<Self, Self::Error> {
        let m = Mat3::new(
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        );
        Self::from_matrix(m)
    }
}
