//! Synthetic planar target helpers.
//!
//! The target lives on the `Z = 0` plane of its own frame. Poses map target
//! points into the camera frame, and projection goes through a distortion-free
//! pinhole [`IntrinsicMatrix`].

use crate::{Correspondence, IntrinsicMatrix, Iso3, Mat3, PatternSize, Pt2, Pt3, Real, Vec2, Vec3};
use anyhow::{bail, Result};
use nalgebra::{Translation3, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// Generate a planar grid with `nx * ny` points, column index varying fastest.
pub fn grid_points(nx: usize, ny: usize, spacing: Real) -> Vec<Pt2> {
    PatternSize::new(nx, ny, spacing).object_points()
}

/// Pose from Euler angles (roll, pitch, yaw) and a translation.
pub fn pose_from_euler(roll: Real, pitch: Real, yaw: Real, translation: Vec3) -> Iso3 {
    Iso3::from_parts(
        Translation3::from(translation),
        UnitQuaternion::from_euler_angles(roll, pitch, yaw),
    )
}

/// `n_views` poses looking at the board center from `distance`.
///
/// View `i` tilts the board by `tilt_rad` about an in-plane axis whose
/// direction turns by `π / n_views` per view, plus a small roll, so every pair
/// of views has distinct plane normals.
pub fn tilted_poses(n_views: usize, tilt_rad: Real, distance: Real, board_center: Vec2) -> Vec<Iso3> {
    (0..n_views)
        .map(|i| {
            let phi = PI * i as Real / n_views.max(1) as Real;
            let axis = Vector3::new(phi.cos(), phi.sin(), 0.0);
            let rotation = UnitQuaternion::from_scaled_axis(axis * tilt_rad)
                * UnitQuaternion::from_euler_angles(0.0, 0.0, 0.1 * i as Real);
            let center = Vec3::new(board_center.x, board_center.y, 0.0);
            let translation = Vec3::new(0.0, 0.0, distance) - rotation * center;
            Iso3::from_parts(Translation3::from(translation), rotation)
        })
        .collect()
}

/// Ground-truth plane homography `H = K [r1 r2 t]`, scaled so `H[2,2] == 1`.
pub fn homography_from_pose(k: &IntrinsicMatrix, cam_from_target: &Iso3) -> Mat3 {
    let rot = cam_from_target.rotation.to_rotation_matrix();
    let r = rot.matrix();
    let mut h = Mat3::zeros();
    h.set_column(0, &r.column(0));
    h.set_column(1, &r.column(1));
    h.set_column(2, &cam_from_target.translation.vector);
    let h = k.k_matrix() * h;
    h / h[(2, 2)]
}

/// Project a planar target into the camera, requiring every point to be in front of it.
pub fn project_view(
    k: &IntrinsicMatrix,
    cam_from_target: &Iso3,
    target_points: &[Pt2],
) -> Result<Correspondence> {
    let kmtx = k.k_matrix();
    let mut pixels = Vec::with_capacity(target_points.len());
    for (idx, pw) in target_points.iter().enumerate() {
        let pc = cam_from_target.transform_point(&Pt3::new(pw.x, pw.y, 0.0));
        if pc.z <= Real::EPSILON {
            bail!("point {idx} not projectable (z={:.6})", pc.z);
        }
        let uvw = kmtx * pc.coords;
        pixels.push(Pt2::new(uvw.x / uvw.z, uvw.y / uvw.z));
    }
    Ok(Correspondence::new(target_points.to_vec(), pixels)?)
}

/// Project multiple views of the same target.
pub fn project_views(
    k: &IntrinsicMatrix,
    target_points: &[Pt2],
    cam_from_target: &[Iso3],
) -> Result<Vec<Correspondence>> {
    cam_from_target
        .iter()
        .map(|pose| project_view(k, pose, target_points))
        .collect()
}
