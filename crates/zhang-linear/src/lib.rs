//! Linear solvers for planar calibration.
//!
//! - [`normalize`]: per-axis similarity conditioning of 2D point sets,
//! - [`homography`]: normalized DLT homography estimation,
//! - [`zhang_intrinsics`]: closed-form intrinsics from a set of plane homographies.
//!
//! All solvers are pure functions over their inputs; they hold no state
//! between calls and can be used from several threads at once.

pub mod homography;
pub mod math;
pub mod normalize;
pub mod zhang_intrinsics;

pub use homography::*;
pub use normalize::*;
pub use zhang_intrinsics::*;
