//! Least squares solver.
//!
//! Every solve in this crate is a tiny `2 × n` system:
//!
//! ```text
//! [ 1      1      ...  1      ] x = [ total_taxable ]
//! [ r_1    r_2    ...  r_n    ]     [ total_tax     ]
//! ```
//!
//! Implementation choices:
//! - We use SVD because the system is wide (`n > 2`) in the common case, and the
//!   pseudo-inverse gives the minimum-norm solution among all exact solutions.
//!   (Nalgebra's `QR::solve` is intended for square systems.)
//! - Singular values below `eps * max(m, n) * σ_max` are treated as zero, which
//!   is the usual cutoff for a numerical pseudo-inverse.

use nalgebra::{DMatrix, DVector};

/// Result of a least squares solve.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub solution: DVector<f64>,
    /// Number of singular values kept by the cutoff.
    pub rank: usize,
}

/// Solve `a · x ≈ b` for the minimum-norm least squares `x`.
///
/// Returns `None` if the decomposition produced non-finite values.
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<LeastSquares> {
    let (m, n) = a.shape();
    let svd = a.clone().svd(true, true);

    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = f64::EPSILON * m.max(n) as f64 * sigma_max;

    let solution = svd.solve(b, tol).ok()?;
    if !solution.iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(LeastSquares {
        solution,
        rank: svd.rank(tol),
    })
}
