//! Deterministic synthetic data generation helpers.
//!
//! Small building blocks for constructing synthetic calibration problems used
//! in tests and examples:
//! - planar target grids and board poses,
//! - noise-free projection through a pinhole `K` producing [`crate::Correspondence`],
//! - seeded pixel noise.
//!
//! # Example
//!
//! ```
//! use zhang_core::{synthetic::planar, IntrinsicMatrix, PatternSize};
//!
//! let k = IntrinsicMatrix { alpha: 800.0, beta: 800.0, gamma: 0.0, uc: 320.0, vc: 240.0 };
//! let pattern = PatternSize::new(8, 6, 0.03);
//! let poses = planar::tilted_poses(4, 0.35, 0.7, pattern.center());
//! let views = planar::project_views(&k, &pattern.object_points(), &poses).unwrap();
//! assert_eq!(views.len(), 4);
//! ```

pub mod noise;
pub mod planar;
