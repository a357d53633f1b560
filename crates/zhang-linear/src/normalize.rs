//! Point normalization for numerical conditioning.
//!
//! Every axis is centered on its mean and scaled so that its variance becomes
//! two, i.e. `x' = sx (x - x̄)` with `sx = √(2 / σx²)` (and likewise for `y`).
//! Normalizing both point sets of a view before the DLT keeps the design
//! matrix entries of comparable magnitude.
//!
//! # Example
//!
//! ```
//! use zhang_core::Pt2;
//! use zhang_linear::NormalizationTransform;
//!
//! let points = vec![
//!     Pt2::new(100.0, 200.0),
//!     Pt2::new(150.0, 250.0),
//!     Pt2::new(120.0, 210.0),
//! ];
//! let t = NormalizationTransform::from_points(&points).unwrap();
//! let back = t.unapply(&t.apply(&points[0]));
//! assert!((back - points[0]).norm() < 1e-9);
//! ```

use zhang_core::{CalibError, Mat3, Pt2, Real, Vec2};

/// Similarity transform `N` (and its inverse) that conditions a 2D point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationTransform {
    mean: Vec2,
    scale: Vec2,
}

impl NormalizationTransform {
    /// Compute the transform from a point set's per-axis mean and variance.
    ///
    /// # Errors
    ///
    /// [`CalibError::DegenerateInput`] if the set is empty, contains non-finite
    /// coordinates, or has zero variance along an axis.
    pub fn from_points(points: &[Pt2]) -> Result<Self, CalibError> {
        if points.is_empty() {
            return Err(CalibError::degenerate_input("empty point set"));
        }

        let n = points.len() as Real;
        let mut mean = Vec2::zeros();
        for p in points {
            mean += p.coords;
        }
        mean /= n;
        if !mean.x.is_finite() || !mean.y.is_finite() {
            return Err(CalibError::degenerate_input("non-finite coordinates"));
        }

        let mut var = Vec2::zeros();
        for p in points {
            let d = p.coords - mean;
            var += d.component_mul(&d);
        }
        var /= n;

        for (axis, (v, m)) in ["x", "y"].iter().zip(var.iter().zip(mean.iter())) {
            let tol = Real::EPSILON * (1.0 + m.abs()).powi(2);
            if *v <= tol {
                return Err(CalibError::degenerate_input(format!(
                    "zero variance along {axis} (variance {v:.3e})"
                )));
            }
        }

        let scale = Vec2::new((2.0 / var.x).sqrt(), (2.0 / var.y).sqrt());
        Ok(Self { mean, scale })
    }

    /// Per-axis mean `(x̄, ȳ)` of the source points.
    pub fn mean(&self) -> Vec2 {
        self.mean
    }

    /// Per-axis scale `(sx, sy)`.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// `N = [[sx, 0, -sx·x̄], [0, sy, -sy·ȳ], [0, 0, 1]]`.
    pub fn matrix(&self) -> Mat3 {
        let (sx, sy) = (self.scale.x, self.scale.y);
        Mat3::new(
            sx,
            0.0,
            -sx * self.mean.x,
            0.0,
            sy,
            -sy * self.mean.y,
            0.0,
            0.0,
            1.0,
        )
    }

    /// `N⁻¹ = [[1/sx, 0, x̄], [0, 1/sy, ȳ], [0, 0, 1]]`.
    pub fn inverse_matrix(&self) -> Mat3 {
        Mat3::new(
            1.0 / self.scale.x,
            0.0,
            self.mean.x,
            0.0,
            1.0 / self.scale.y,
            self.mean.y,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Map a point into the normalized frame.
    pub fn apply(&self, p: &Pt2) -> Pt2 {
        Pt2::new(
            self.scale.x * (p.x - self.mean.x),
            self.scale.y * (p.y - self.mean.y),
        )
    }

    /// Map a normalized point back into the source frame.
    pub fn unapply(&self, p: &Pt2) -> Pt2 {
        Pt2::new(
            p.x / self.scale.x + self.mean.x,
            p.y / self.scale.y + self.mean.y,
        )
    }

    pub fn apply_all(&self, points: &[Pt2]) -> Vec<Pt2> {
        points.iter().map(|p| self.apply(p)).collect()
    }

    pub fn unapply_all(&self, points: &[Pt2]) -> Vec<Pt2> {
        points.iter().map(|p| self.unapply(p)).collect()
    }
}

/// Normalize a point set, returning the normalized points and the transform.
pub fn normalize_points_2d(points: &[Pt2]) -> Result<(Vec<Pt2>, NormalizationTransform), CalibError> {
    let t = NormalizationTransform::from_points(points)?;
    Ok((t.apply_all(points), t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zhang_core::transform_point;

    fn scattered() -> Vec<Pt2> {
        vec![
            Pt2::new(312.5, 98.0),
            Pt2::new(411.0, 120.25),
            Pt2::new(380.0, 305.5),
            Pt2::new(290.75, 260.0),
            Pt2::new(350.0, 180.0),
        ]
    }

    #[test]
    fn normalized_points_have_zero_mean_and_variance_two() {
        let (norm, _) = normalize_points_2d(&scattered()).unwrap();
        let n = norm.len() as Real;
        let mx: Real = norm.iter().map(|p| p.x).sum::<Real>() / n;
        let my: Real = norm.iter().map(|p| p.y).sum::<Real>() / n;
        let vx: Real = norm.iter().map(|p| (p.x - mx).powi(2)).sum::<Real>() / n;
        let vy: Real = norm.iter().map(|p| (p.y - my).powi(2)).sum::<Real>() / n;
        assert!(mx.abs() < 1e-12 && my.abs() < 1e-12);
        assert!((vx - 2.0).abs() < 1e-12 && (vy - 2.0).abs() < 1e-12);
    }

    #[test]
    fn mean_and_scale_follow_axis_statistics() {
        let pts = vec![
            Pt2::new(0.0, 10.0),
            Pt2::new(4.0, 10.0),
            Pt2::new(0.0, 12.0),
            Pt2::new(4.0, 12.0),
        ];
        let t = NormalizationTransform::from_points(&pts).unwrap();
        assert_eq!(t.mean(), Vec2::new(2.0, 11.0));
        // variances 4 and 1
        assert!((t.scale() - Vec2::new(0.5_f64.sqrt(), 2.0_f64.sqrt())).norm() < 1e-12);
    }

    #[test]
    fn roundtrip_reproduces_points() {
        let pts = scattered();
        let t = NormalizationTransform::from_points(&pts).unwrap();
        let back = t.unapply_all(&t.apply_all(&pts));
        for (a, b) in pts.iter().zip(back.iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn matrices_are_inverse_of_each_other() {
        let t = NormalizationTransform::from_points(&scattered()).unwrap();
        let prod = t.inverse_matrix() * t.matrix();
        assert!((prod - Mat3::identity()).norm() < 1e-12);

        let p = scattered()[2];
        let via_matrix = transform_point(&t.matrix(), &p).unwrap();
        assert!((via_matrix - t.apply(&p)).norm() < 1e-12);
    }

    #[test]
    fn zero_variance_is_rejected() {
        let vertical: Vec<Pt2> = (0..5).map(|i| Pt2::new(10.0, i as Real)).collect();
        assert!(matches!(
            NormalizationTransform::from_points(&vertical),
            Err(CalibError::DegenerateInput { .. })
        ));

        let coincident = vec![Pt2::new(3.0, 4.0); 6];
        assert!(NormalizationTransform::from_points(&coincident).is_err());
        assert!(NormalizationTransform::from_points(&[]).is_err());
    }
}
