//! Common types shared across the calibration workspace.
//!
//! Observations flow in as [`Correspondence`] records, per-view results are
//! [`Homography`] instances, and a run produces one [`IntrinsicMatrix`].

mod homography;
mod intrinsics;
mod observation;

pub use homography::*;
pub use intrinsics::*;
pub use observation::*;
