//! Least-squares problems solved by this crate.

pub mod homography;
