use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use zhang_core::Real;

/// Dense non-linear least squares problem `min_x ‖r(x)‖²`.
pub trait NllsProblem {
    fn num_params(&self) -> usize;
    /// Length of the residual vector.
    fn num_residuals(&self) -> usize;

    /// `r(x)`.
    fn residuals(&self, x: &DVector<Real>) -> DVector<Real>;
    /// `∂r/∂x`, one row per residual.
    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real>;

    /// Sum of squared residuals.
    fn cost(&self, x: &DVector<Real>) -> Real {
        self.residuals(x).norm_squared()
    }
}

/// Termination settings shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Iteration budget. [`crate::LmBackend`] turns it into a cap of
    /// `max_iters * (n + 1)` residual evaluations (MINPACK patience).
    pub max_iters: usize,
    /// Stop when the relative cost decrease drops below this.
    pub ftol: Real,
    /// Stop when the cosine between residual and Jacobian columns drops below this.
    pub gtol: Real,
    /// Stop when the relative step length drops below this.
    pub xtol: Real,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: 200,
            ftol: 1e-10,
            gtol: 1e-10,
            xtol: 1e-10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Residual evaluations spent by the backend.
    pub iterations: usize,
    /// Sum of squared residuals at the returned parameters.
    pub final_cost: Real,
    pub converged: bool,
    /// Backend-specific termination reason, kept for diagnostics.
    pub termination: String,
}

/// A dense least-squares solver.
pub trait NllsSolverBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport);
}
