//! Zhang's closed-form intrinsics from plane homographies (no distortion).
//!
//! Each homography `H = λ K [r1 r2 t]` yields two linear constraints on the
//! symmetric matrix `B = K^-T K^-1`, stored as
//! `b = [B11, B12, B22, B13, B23, B33]`:
//!
//! ```text
//! v12(H)^T b = 0
//! (v11(H) - v22(H))^T b = 0
//! ```
//!
//! Stacking them for `M ≥ 3` views gives `V b = 0`, solved by SVD.

use crate::math::solve_null_space;
use log::debug;
use nalgebra::{DMatrix, SVector};
use serde::{Deserialize, Serialize};
use zhang_core::{CalibError, Homography, IntrinsicMatrix, Real};

/// Minimum number of homographies for a well-determined solve.
pub const MIN_VIEWS: usize = 3;

/// Column norms below this fraction of the largest one are not equilibrated.
const EQUILIBRATION_FLOOR: Real = 1e-12;

/// Conditioning thresholds for the intrinsics solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZhangOptions {
    /// Reject when the second-smallest singular value of the (column
    /// equilibrated) system is below `rank_tol * largest`. Views that differ
    /// only by noise land around `1e-4`; distinct orientations stay above `1e-2`.
    pub rank_tol: Real,
    /// Reject when the smallest singular value exceeds `null_ratio` times the
    /// second-smallest, i.e. `V` has no clear null direction.
    pub null_ratio: Real,
    /// Reject when `|B11 B22 - B12²|` is below `denom_rel_tol * (B11² + B22²)`.
    pub denom_rel_tol: Real,
}

impl Default for ZhangOptions {
    fn default() -> Self {
        Self {
            rank_tol: 1e-3,
            null_ratio: 0.5,
            denom_rel_tol: 1e-6,
        }
    }
}

/// Build the 6-vector `v_pq(H)` for columns `p`, `q` of `H`.
fn v_pq(h: &Homography, p: usize, q: usize) -> SVector<Real, 6> {
    let m = h.matrix();
    let hp = m.column(p);
    let hq = m.column(q);

    SVector::<Real, 6>::from_row_slice(&[
        hp[0] * hq[0],
        hp[0] * hq[1] + hp[1] * hq[0],
        hp[1] * hq[1],
        hp[2] * hq[0] + hp[0] * hq[2],
        hp[2] * hq[1] + hp[1] * hq[2],
        hp[2] * hq[2],
    ])
}

fn unstable(quantity: &'static str, value: Real) -> CalibError {
    CalibError::NumericalInstability { quantity, value }
}

/// Estimate the intrinsic matrix from a set of plane homographies.
///
/// # Errors
///
/// - [`CalibError::InsufficientViews`] for fewer than [`MIN_VIEWS`] homographies,
/// - [`CalibError::DegenerateConfiguration`] when `V` has more than one null
///   direction (views too similar) or none that stands out (homographies
///   inconsistent with a single camera),
/// - [`CalibError::NumericalInstability`] for a negative radicand or a vanishing
///   denominator in the back-substitution.
pub fn estimate_intrinsics_from_homographies(
    homographies: &[Homography],
    opts: &ZhangOptions,
) -> Result<IntrinsicMatrix, CalibError> {
    let m = homographies.len();
    if m < MIN_VIEWS {
        return Err(CalibError::InsufficientViews {
            available: m,
            required: MIN_VIEWS,
        });
    }

    let mut vmtx = DMatrix::<Real>::zeros(2 * m, 6);
    for (k, h) in homographies.iter().enumerate() {
        let v12 = v_pq(h, 0, 1);
        let v11 = v_pq(h, 0, 0);
        let v22 = v_pq(h, 1, 1);

        vmtx.row_mut(2 * k).copy_from(&v12.transpose());
        vmtx.row_mut(2 * k + 1).copy_from(&(v11 - v22).transpose());
    }

    // Pixel-unit homographies make the columns of V differ by many orders of
    // magnitude; equilibrate them and undo the scaling on the solution.
    // Columns that are numerically zero (fronto-parallel views) keep their
    // relative size instead of having rounding noise blown up to unit norm.
    let col_norms: Vec<Real> = vmtx.column_iter().map(|c| c.norm()).collect();
    let max_norm = col_norms.iter().cloned().fold(Real::MIN_POSITIVE, Real::max);
    let col_scale: Vec<Real> = col_norms
        .iter()
        .map(|&n| {
            if n > EQUILIBRATION_FLOOR * max_norm {
                n
            } else {
                max_norm
            }
        })
        .collect();
    for (j, s) in col_scale.iter().enumerate() {
        vmtx.column_mut(j).unscale_mut(*s);
    }

    let ns = solve_null_space(vmtx).ok_or(CalibError::DegenerateConfiguration {
        ratio: 0.0,
        tol: opts.rank_tol,
    })?;
    let ratio = ns.second_smallest() / ns.largest();
    debug!(
        "zhang system over {m} views: singular values {:?}, ratio {ratio:.3e}",
        ns.singular_values
    );
    if !(ratio > opts.rank_tol) {
        return Err(CalibError::DegenerateConfiguration {
            ratio,
            tol: opts.rank_tol,
        });
    }
    if ns.smallest() > opts.null_ratio * ns.second_smallest() {
        return Err(CalibError::DegenerateConfiguration {
            ratio: ns.smallest() / ns.second_smallest(),
            tol: opts.null_ratio,
        });
    }

    let mut b = ns.vector;
    for (j, s) in col_scale.iter().enumerate() {
        b[j] /= *s;
    }
    let b_norm = b.norm();
    b /= b_norm;

    intrinsics_from_b(&SVector::<Real, 6>::from_column_slice(b.as_slice()), opts)
}

/// Back-substitute `K` from the unit-norm conic `b`.
///
/// From Zhang's paper, with `b = [B11, B12, B22, B13, B23, B33]`:
///
/// ```text
/// vc = (B12 B13 - B11 B23) / (B11 B22 - B12^2)
/// λ  = B33 - (B13^2 + vc (B12 B13 - B11 B23)) / B11
/// α  = sqrt(λ / B11)
/// β  = sqrt(λ B11 / (B11 B22 - B12^2))
/// γ  = -B12 α^2 β / λ
/// uc = γ vc / β - B13 α^2 / λ
/// ```
fn intrinsics_from_b(
    b: &SVector<Real, 6>,
    opts: &ZhangOptions,
) -> Result<IntrinsicMatrix, CalibError> {
    let (b0, b1, b2, b3, b4, b5) = (b[0], b[1], b[2], b[3], b[4], b[5]);

    let denom = b0 * b2 - b1 * b1;
    let denom_norm = b0 * b0 + b2 * b2;
    if !(denom.abs() > opts.denom_rel_tol * denom_norm) {
        return Err(unstable("B11 B22 - B12^2", denom));
    }
    if !(b0.abs() > Real::EPSILON) {
        return Err(unstable("B11", b0));
    }

    let vc = (b1 * b3 - b0 * b4) / denom;
    let lambda = b5 - (b3 * b3 + vc * (b1 * b3 - b0 * b4)) / b0;
    if !(lambda.abs() > Real::EPSILON) {
        return Err(unstable("lambda", lambda));
    }

    let alpha_sq = lambda / b0;
    if !(alpha_sq > 0.0) {
        return Err(unstable("lambda / B11", alpha_sq));
    }
    let beta_sq = lambda * b0 / denom;
    if !(beta_sq > 0.0) {
        return Err(unstable("lambda B11 / (B11 B22 - B12^2)", beta_sq));
    }

    let alpha = alpha_sq.sqrt();
    let beta = beta_sq.sqrt();
    let gamma = -b1 * alpha * alpha * beta / lambda;
    let uc = gamma * vc / beta - b3 * alpha * alpha / lambda;

    let k = IntrinsicMatrix {
        alpha,
        beta,
        gamma,
        uc,
        vc,
    };
    if ![k.alpha, k.beta, k.gamma, k.uc, k.vc].iter().all(|x| x.is_finite()) {
        return Err(unstable("intrinsic parameters", Real::NAN));
    }
    Ok(k)
}
