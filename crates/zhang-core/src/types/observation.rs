//! Observation types for calibration data.
//!
//! This module provides the planar object / image correspondences consumed by
//! the calibration pipeline and the description of the target pattern.

use crate::{CalibError, Pt2, Real, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum number of correspondences for a homography solve.
pub const MIN_POINTS_PER_VIEW: usize = 4;

/// One view of a planar target: object-plane points and their detections.
///
/// Object point `i` corresponds to image point `i`. Object points live on the
/// `Z = 0` plane of the target frame, image points are pixel coordinates.
///
/// # Example
///
/// ```
/// use zhang_core::{Correspondence, Pt2};
///
/// let object = vec![
///     Pt2::new(0.0, 0.0),
///     Pt2::new(1.0, 0.0),
///     Pt2::new(1.0, 1.0),
///     Pt2::new(0.0, 1.0),
/// ];
/// let image = vec![
///     Pt2::new(320.0, 240.0),
///     Pt2::new(400.0, 240.0),
///     Pt2::new(400.0, 320.0),
///     Pt2::new(320.0, 320.0),
/// ];
/// let view = Correspondence::new(object, image).unwrap();
/// assert_eq!(view.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    /// Points on the target plane.
    pub object_points: Vec<Pt2>,
    /// Corresponding pixel observations.
    pub image_points: Vec<Pt2>,
}

impl Correspondence {
    /// Construct a view, checking lengths and the minimum point count.
    ///
    /// # Errors
    ///
    /// [`CalibError::PointCountMismatch`] if the two lists differ in length,
    /// [`CalibError::TooFewPoints`] if there are fewer than four pairs.
    pub fn new(object_points: Vec<Pt2>, image_points: Vec<Pt2>) -> Result<Self, CalibError> {
        let view = Self {
            object_points,
            image_points,
        };
        view.validate()?;
        Ok(view)
    }

    /// Re-check the invariants, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), CalibError> {
        if self.object_points.len() != self.image_points.len() {
            return Err(CalibError::PointCountMismatch {
                object: self.object_points.len(),
                image: self.image_points.len(),
            });
        }
        if self.len() < MIN_POINTS_PER_VIEW {
            return Err(CalibError::TooFewPoints(self.len()));
        }
        Ok(())
    }

    /// Number of point correspondences in this view.
    #[inline]
    pub fn len(&self) -> usize {
        self.object_points.len()
    }

    /// Returns true if this view has no correspondences.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.object_points.is_empty()
    }

    /// Iterate over (object point, image point) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Pt2, &Pt2)> {
        self.object_points.iter().zip(self.image_points.iter())
    }
}

/// Size of the planar calibration grid.
///
/// `cols × rows` inner corners spaced `square_size` apart in target units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternSize {
    pub cols: usize,
    pub rows: usize,
    #[serde(default = "default_square_size")]
    pub square_size: Real,
}

fn default_square_size() -> Real {
    1.0
}

impl PatternSize {
    pub fn new(cols: usize, rows: usize, square_size: Real) -> Self {
        Self {
            cols,
            rows,
            square_size,
        }
    }

    /// Number of points a complete detection delivers.
    pub fn num_points(&self) -> usize {
        self.cols * self.rows
    }

    /// Object-plane coordinates of the grid.
    ///
    /// Row-major with the column index varying fastest: `(0,0), (s,0), ..., (0,s), ...`.
    pub fn object_points(&self) -> Vec<Pt2> {
        let mut points = Vec::with_capacity(self.num_points());
        for j in 0..self.rows {
            for i in 0..self.cols {
                points.push(Pt2::new(
                    i as Real * self.square_size,
                    j as Real * self.square_size,
                ));
            }
        }
        points
    }

    /// Center of the grid in target coordinates.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.cols.saturating_sub(1) as Real * self.square_size * 0.5,
            self.rows.saturating_sub(1) as Real * self.square_size * 0.5,
        )
    }

    /// Check that a view carries exactly one detection per grid point.
    pub fn check(&self, view: &Correspondence) -> Result<(), CalibError> {
        if view.len() != self.num_points() {
            return Err(CalibError::PatternMismatch {
                expected: self.num_points(),
                got: view.len(),
            });
        }
        Ok(())
    }
}

/// Summary statistics for reprojection errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReprojectionStats {
    /// Mean reprojection error in pixels.
    pub mean: Real,
    /// Root mean square error in pixels.
    pub rms: Real,
    /// Maximum reprojection error in pixels.
    pub max: Real,
    /// Number of points evaluated.
    pub count: usize,
}

impl ReprojectionStats {
    /// Compute statistics from a collection of per-point errors.
    pub fn from_errors(errors: &[Real]) -> Self {
        if errors.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                max: 0.0,
                count: 0,
            };
        }

        let sum: Real = errors.iter().sum();
        let sum_sq: Real = errors.iter().map(|e| e * e).sum();
        let max = errors.iter().cloned().fold(0.0, Real::max);
        let n = errors.len() as Real;

        Self {
            mean: sum / n,
            rms: (sum_sq / n).sqrt(),
            max,
            count: errors.len(),
        }
    }
}
