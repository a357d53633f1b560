//! SVD helpers shared by the linear solvers.
//!
//! Both the DLT homography and the Zhang intrinsics system are homogeneous
//! least-squares problems `A x = 0` with `‖x‖ = 1`; the solution is the right
//! singular vector of the smallest singular value.

use nalgebra::{DMatrix, DVector};
use zhang_core::Real;

/// Least-squares null vector of a matrix together with its singular spectrum.
#[derive(Debug, Clone)]
pub struct NullSpace {
    /// Unit-norm right singular vector of the smallest singular value.
    pub vector: DVector<Real>,
    /// Singular values sorted in decreasing order.
    pub singular_values: Vec<Real>,
}

impl NullSpace {
    pub fn largest(&self) -> Real {
        self.singular_values[0]
    }

    pub fn smallest(&self) -> Real {
        self.singular_values[self.singular_values.len() - 1]
    }

    pub fn second_smallest(&self) -> Real {
        self.singular_values[self.singular_values.len() - 2]
    }
}

/// Solve `A x = 0` in the least-squares sense via SVD.
///
/// Matrices with fewer rows than columns are zero-padded to square so the
/// null direction shows up in `V^T`. Returns `None` if the decomposition
/// did not produce `V^T` or `A` has fewer than two columns.
pub fn solve_null_space(a: DMatrix<Real>) -> Option<NullSpace> {
    let cols = a.ncols();
    if cols < 2 {
        return None;
    }

    let mut a_work = a;
    if a_work.nrows() < cols {
        let rows = a_work.nrows();
        let mut a_pad = DMatrix::<Real>::zeros(cols, cols);
        a_pad.view_mut((0, 0), (rows, cols)).copy_from(&a_work);
        a_work = a_pad;
    }

    let svd = a_work.svd(false, true);
    let v_t = svd.v_t?;

    // Do not rely on the decomposition ordering its singular values.
    let (idx_min, _) = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))?;
    let vector = v_t.row(idx_min).transpose();

    let mut singular_values: Vec<Real> = svd.singular_values.iter().copied().collect();
    singular_values.sort_by(|a, b| b.total_cmp(a));

    Some(NullSpace {
        vector,
        singular_values,
    })
}
