//! Per-view homography refinement by reprojection error minimization.
//!
//! The nine entries of `H` (row-major) are optimized directly against the raw
//! pixel observations. For an object point `(X, Y)`:
//!
//! ```text
//! w  = h6 X + h7 Y + h8
//! û = (h0 X + h1 Y + h2) / w
//! v̂ = (h3 X + h4 Y + h5) / w
//! ```
//!
//! with residuals `û - u` and `v̂ - v`. The overall scale of `H` is a gauge
//! freedom; the result is re-normalized to `H[2,2] = 1` afterwards.
//!
//! Refinement never fails the caller. If the solver does not converge or
//! ends up worse than it started, the input homography is returned together
//! with the reason in [`RefineOutcome::Fallback`].

use crate::backend_lm::LmBackend;
use crate::traits::{NllsProblem, NllsSolverBackend, SolveOptions};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use zhang_core::{Correspondence, Homography, Real};

/// Number of homography parameters.
const NUM_PARAMS: usize = 9;

/// Reprojection problem for one view.
#[derive(Debug, Clone, Copy)]
pub struct HomographyReprojection<'a> {
    view: &'a Correspondence,
}

impl<'a> HomographyReprojection<'a> {
    pub fn new(view: &'a Correspondence) -> Self {
        Self { view }
    }
}

impl NllsProblem for HomographyReprojection<'_> {
    fn num_params(&self) -> usize {
        NUM_PARAMS
    }

    fn num_residuals(&self) -> usize {
        2 * self.view.len()
    }

    fn residuals(&self, h: &DVector<Real>) -> DVector<Real> {
        let mut r = DVector::zeros(self.num_residuals());
        for (i, (obj, img)) in self.view.iter().enumerate() {
            let (x, y) = (obj.x, obj.y);
            let w = h[6] * x + h[7] * y + h[8];
            let su = h[0] * x + h[1] * y + h[2];
            let sv = h[3] * x + h[4] * y + h[5];
            r[2 * i] = su / w - img.x;
            r[2 * i + 1] = sv / w - img.y;
        }
        r
    }

    fn jacobian(&self, h: &DVector<Real>) -> DMatrix<Real> {
        let mut j = DMatrix::zeros(self.num_residuals(), NUM_PARAMS);
        for (i, (obj, _)) in self.view.iter().enumerate() {
            let (x, y) = (obj.x, obj.y);
            let w = h[6] * x + h[7] * y + h[8];
            let su = h[0] * x + h[1] * y + h[2];
            let sv = h[3] * x + h[4] * y + h[5];
            let w2 = w * w;

            let mut ru = j.row_mut(2 * i);
            ru[0] = x / w;
            ru[1] = y / w;
            ru[2] = 1.0 / w;
            ru[6] = -su * x / w2;
            ru[7] = -su * y / w2;
            ru[8] = -su / w2;

            let mut rv = j.row_mut(2 * i + 1);
            rv[3] = x / w;
            rv[4] = y / w;
            rv[5] = 1.0 / w;
            rv[6] = -sv * x / w2;
            rv[7] = -sv * y / w2;
            rv[8] = -sv / w2;
        }
        j
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    /// Run the non-linear refinement at all.
    pub enabled: bool,
    pub solve: SolveOptions,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            solve: SolveOptions::default(),
        }
    }
}

/// What happened to a view's homography during refinement.
///
/// Costs are sums of squared pixel residuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefineOutcome {
    Refined {
        initial_cost: Real,
        final_cost: Real,
        iterations: usize,
    },
    /// The linear estimate was kept.
    Fallback { reason: String, initial_cost: Real },
    Skipped,
}

impl RefineOutcome {
    pub fn is_refined(&self) -> bool {
        matches!(self, Self::Refined { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedHomography {
    pub homography: Homography,
    pub outcome: RefineOutcome,
}

/// Refine `initial` against `view` with the default LM backend.
pub fn refine_homography(
    initial: &Homography,
    view: &Correspondence,
    opts: &RefineOptions,
) -> RefinedHomography {
    refine_homography_with(&LmBackend, initial, view, opts)
}

/// Refine `initial` against `view` with an explicit solver backend.
pub fn refine_homography_with<B: NllsSolverBackend>(
    backend: &B,
    initial: &Homography,
    view: &Correspondence,
    opts: &RefineOptions,
) -> RefinedHomography {
    if !opts.enabled {
        return RefinedHomography {
            homography: *initial,
            outcome: RefineOutcome::Skipped,
        };
    }

    let problem = HomographyReprojection::new(view);
    let x0 = DVector::from_row_slice(&initial.params());
    let initial_cost = problem.cost(&x0);

    let fallback = |reason: String| {
        warn!("homography refinement fell back to linear estimate: {reason}");
        RefinedHomography {
            homography: *initial,
            outcome: RefineOutcome::Fallback {
                reason,
                initial_cost,
            },
        }
    };

    if !initial_cost.is_finite() {
        return fallback("initial residuals are not finite".to_string());
    }

    let (x, report) = backend.solve(&problem, x0, &opts.solve);
    debug!(
        "homography LM: {} evaluations, termination {}, cost {initial_cost:.6e} -> {:.6e}",
        report.iterations, report.termination, report.final_cost
    );

    if !report.converged {
        return fallback(format!("solver did not converge ({})", report.termination));
    }

    let mut params = [0.0; NUM_PARAMS];
    params.copy_from_slice(x.as_slice());
    let refined = match Homography::from_params(&params) {
        Ok(h) => h,
        Err(e) => return fallback(format!("refined homography is invalid: {e}")),
    };

    let final_cost = refined.sum_squared_error(view);
    if !final_cost.is_finite() {
        return fallback("refined reprojection error is not finite".to_string());
    }
    if final_cost > initial_cost {
        return fallback(format!(
            "refinement increased the cost from {initial_cost:.6e} to {final_cost:.6e}"
        ));
    }

    RefinedHomography {
        homography: refined,
        outcome: RefineOutcome::Refined {
            initial_cost,
            final_cost,
            iterations: report.iterations,
        },
    }
}
