use crate::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};
use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{storage::Owned, DMatrix, DVector, Dyn};
use zhang_core::Real;

struct LmWrapper<'a, P: NllsProblem> {
    problem: &'a P,
    params: DVector<Real>,
}

impl<'a, P: NllsProblem> LeastSquaresProblem<Real, Dyn, Dyn> for LmWrapper<'a, P> {
    type ResidualStorage = Owned<Real, Dyn>;
    type JacobianStorage = Owned<Real, Dyn, Dyn>;
    type ParameterStorage = Owned<Real, Dyn>;

    fn set_params(&mut self, x: &DVector<Real>) {
        self.params.clone_from(x);
    }

    fn params(&self) -> DVector<Real> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<Real>> {
        let r = self.problem.residuals(&self.params);
        r.iter().all(|v| v.is_finite()).then_some(r)
    }

    fn jacobian(&self) -> Option<DMatrix<Real>> {
        let j = self.problem.jacobian(&self.params);
        j.iter().all(|v| v.is_finite()).then_some(j)
    }
}

/// Levenberg–Marquardt backend (MINPACK port from the `levenberg-marquardt` crate).
#[derive(Debug, Default, Clone)]
pub struct LmBackend;

impl NllsSolverBackend for LmBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport) {
        let lm = LevenbergMarquardt::new()
            .with_ftol(opts.ftol)
            .with_xtol(opts.xtol)
            .with_gtol(opts.gtol)
            .with_patience(opts.max_iters.max(1));

        let wrapper = LmWrapper {
            problem,
            params: x0,
        };

        let (wrapper, report) = lm.minimize(wrapper);
        let x_opt = wrapper.params();

        (
            x_opt,
            SolveReport {
                iterations: report.number_of_evaluations,
                final_cost: 2.0 * report.objective_function,
                converged: report.termination.was_successful(),
                termination: format!("{:?}", report.termination),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::LmBackend;
    use crate::{NllsProblem, NllsSolverBackend, SolveOptions};
    use nalgebra::{DMatrix, DVector};
    use zhang_core::Real;

    /// Fit `y = a exp(b t)` to exact samples.
    struct ExpFit {
        t: Vec<Real>,
        y: Vec<Real>,
    }

    impl NllsProblem for ExpFit {
        fn num_params(&self) -> usize {
            2
        }

        fn num_residuals(&self) -> usize {
            self.t.len()
        }

        fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
            DVector::from_iterator(
                self.t.len(),
                self.t
                    .iter()
                    .zip(self.y.iter())
                    .map(|(t, y)| x[0] * (x[1] * t).exp() - y),
            )
        }

        fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real> {
            let mut j = DMatrix::zeros(self.t.len(), 2);
            for (i, t) in self.t.iter().enumerate() {
                let e = (x[1] * t).exp();
                j[(i, 0)] = e;
                j[(i, 1)] = x[0] * t * e;
            }
            j
        }
    }

    #[test]
    fn lm_backend_fits_exponential() {
        let t: Vec<Real> = (0..10).map(|i| i as Real * 0.1).collect();
        let y = t.iter().map(|t| 2.0 * (-1.5 * t).exp()).collect();
        let problem = ExpFit { t, y };

        let (x, report) =
            LmBackend.solve(&problem, DVector::from_vec(vec![1.0, 0.0]), &SolveOptions::default());

        assert!((x[0] - 2.0).abs() < 1e-6, "a = {}", x[0]);
        assert!((x[1] + 1.5).abs() < 1e-6, "b = {}", x[1]);
        assert!(report.converged, "LM did not converge: {report:?}");
        assert!(report.final_cost < 1e-12, "final cost {}", report.final_cost);
        assert!(problem.cost(&x) < 1e-12);
    }
}
