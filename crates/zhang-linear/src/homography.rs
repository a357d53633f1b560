//! Homography estimation (plane-induced projective transform).
//!
//! Implements the normalized Direct Linear Transform (DLT). The homography `H`
//! maps **object points** on the target plane to **image points** in pixels:
//! `x' ~ H x`.
//!
//! The solve happens in the normalized frames of both point sets and the
//! result is de-normalized with `H = N_u⁻¹ · H_norm · N_x`.

use crate::math::solve_null_space;
use crate::normalize::NormalizationTransform;
use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use zhang_core::{CalibError, Correspondence, Homography, Mat3, Pt2, Real, MIN_POINTS_PER_VIEW};

/// Conditioning thresholds for the DLT solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomographyOptions {
    /// Reject when the second-smallest singular value is below
    /// `rank_tol * largest` (null space of dimension > 1).
    pub rank_tol: Real,
    /// Reject when the smallest singular value exceeds
    /// `null_ratio * second_smallest` (no clear null direction).
    pub null_ratio: Real,
}

impl Default for HomographyOptions {
    fn default() -> Self {
        Self {
            rank_tol: 1e-10,
            null_ratio: 0.5,
        }
    }
}

/// Normalized DLT homography solver.
#[derive(Debug, Clone, Copy)]
pub struct HomographySolver;

impl HomographySolver {
    /// Solve `M h = 0` for already-normalized correspondences.
    ///
    /// Returns the unscaled homography in the normalized frames.
    pub fn dlt_normalized(
        object: &[Pt2],
        image: &[Pt2],
        opts: &HomographyOptions,
    ) -> Result<Mat3, CalibError> {
        let n = object.len();
        if image.len() != n {
            return Err(CalibError::PointCountMismatch {
                object: n,
                image: image.len(),
            });
        }
        if n < MIN_POINTS_PER_VIEW {
            return Err(CalibError::TooFewPoints(n));
        }

        let mut a = DMatrix::<Real>::zeros(2 * n, 9);

        for (i, (pw, pi)) in object.iter().zip(image.iter()).enumerate() {
            let x = pw.x;
            let y = pw.y;
            let u = pi.x;
            let v = pi.y;

            let r0 = 2 * i;
            let r1 = 2 * i + 1;

            a[(r0, 0)] = -x;
            a[(r0, 1)] = -y;
            a[(r0, 2)] = -1.0;
            a[(r0, 6)] = x * u;
            a[(r0, 7)] = y * u;
            a[(r0, 8)] = u;

            a[(r1, 3)] = -x;
            a[(r1, 4)] = -y;
            a[(r1, 5)] = -1.0;
            a[(r1, 6)] = x * v;
            a[(r1, 7)] = y * v;
            a[(r1, 8)] = v;
        }

        let ns = solve_null_space(a).ok_or(CalibError::RankDeficient {
            smallest: Real::NAN,
            second_smallest: Real::NAN,
            largest: Real::NAN,
        })?;

        let (smallest, second_smallest, largest) =
            (ns.smallest(), ns.second_smallest(), ns.largest());
        debug!(
            "dlt singular values: smallest {smallest:.3e}, second {second_smallest:.3e}, largest {largest:.3e}"
        );
        if !(second_smallest > opts.rank_tol * largest) || smallest > opts.null_ratio * second_smallest
        {
            return Err(CalibError::RankDeficient {
                smallest,
                second_smallest,
                largest,
            });
        }

        Ok(Mat3::from_row_slice(ns.vector.as_slice()))
    }

    /// Undo the normalization and fix the scale so that `H[2,2] == 1`.
    pub fn denormalize(
        h_norm: &Mat3,
        object_t: &NormalizationTransform,
        image_t: &NormalizationTransform,
    ) -> Result<Homography, CalibError> {
        Homography::from_matrix(image_t.inverse_matrix() * h_norm * object_t.matrix())
    }

    /// Estimate the homography of one view from raw (unnormalized) points.
    pub fn estimate(
        view: &Correspondence,
        opts: &HomographyOptions,
    ) -> Result<Homography, CalibError> {
        view.validate()?;
        let object_t = NormalizationTransform::from_points(&view.object_points)?;
        let image_t = NormalizationTransform::from_points(&view.image_points)?;
        let h_norm = Self::dlt_normalized(
            &object_t.apply_all(&view.object_points),
            &image_t.apply_all(&view.image_points),
            opts,
        )?;
        Self::denormalize(&h_norm, &object_t, &image_t)
    }
}

/// Estimate `H` such that `x' ~ H x` using the normalized DLT with default options.
pub fn dlt_homography(object: &[Pt2], image: &[Pt2]) -> Result<Homography, CalibError> {
    let view = Correspondence::new(object.to_vec(), image.to_vec())?;
    HomographySolver::estimate(&view, &HomographyOptions::default())
}
