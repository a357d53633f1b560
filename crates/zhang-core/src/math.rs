use nalgebra::{Isometry3, Matrix3, Point2, Point3, Vector2, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Convert a 2D point in Euclidean coordinates into homogeneous coordinates.
///
/// Given a point `p = (x, y)`, returns the homogeneous vector `(x, y, 1)`.
pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Convert a 3D homogeneous vector back to a 2D point.
///
/// Returns `None` when `w` is zero or not finite.
pub fn from_homogeneous(v: &Vec3) -> Option<Pt2> {
    if v.z == 0.0 || !v.z.is_finite() {
        return None;
    }
    Some(Pt2::new(v.x / v.z, v.y / v.z))
}

/// Apply a 3×3 projective transform to a 2D point.
pub fn transform_point(m: &Mat3, p: &Pt2) -> Option<Pt2> {
    from_homogeneous(&(m * to_homogeneous(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_roundtrip() {
        let p = Pt2::new(3.5, -2.0);
        let h = to_homogeneous(&p) * 4.0;
        assert_eq!(from_homogeneous(&h), Some(p));
    }

    #[test]
    fn point_at_infinity_is_rejected() {
        assert!(from_homogeneous(&Vec3::new(1.0, 2.0, 0.0)).is_none());
    }
}
