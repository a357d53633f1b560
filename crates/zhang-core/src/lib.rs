//! Core math and data primitives for `zhang-calib`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Pt2`, `Mat3`, ...),
//! - the observation and result types shared by every stage
//!   ([`Correspondence`], [`Homography`], [`IntrinsicMatrix`]),
//! - the calibration error taxonomy ([`CalibError`]),
//! - deterministic synthetic data helpers for tests and examples.
//!
//! Camera model (no distortion):
//! `pixel ~ K [r1 r2 t] (X, Y, 1)^T` for a point `(X, Y, 0)` on the target plane.

/// Calibration error taxonomy.
mod error;
/// Linear algebra type aliases and helpers.
mod math;
/// Deterministic synthetic data generation helpers.
///
/// Builds planar grids, board poses and noise-free or noisy projections.
/// It is used by workspace tests and examples.
pub mod synthetic;
/// Observation and result types.
mod types;

pub use error::*;
pub use math::*;
pub use types::*;
