//! Non-linear refinement of plane homographies.
//!
//! The crate is split into a small dense least-squares abstraction
//! ([`NllsProblem`], [`NllsSolverBackend`]), a Levenberg–Marquardt backend
//! built on the `levenberg-marquardt` crate ([`LmBackend`]), and the
//! reprojection problem for a single view's homography
//! ([`problems::homography`]).

pub mod backend_lm;
pub mod problems;
pub mod traits;

pub use backend_lm::LmBackend;
pub use problems::homography::{
    refine_homography, refine_homography_with, HomographyReprojection, RefineOptions,
    RefineOutcome, RefinedHomography,
};
pub use traits::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};
