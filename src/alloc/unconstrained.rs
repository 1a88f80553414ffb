//! Unconstrained ("Normal Calc") allocation.
//!
//! Solves the `2 × n` system
//!
//! - row 1: `Σ x_i = total_taxable`
//! - row 2: `Σ x_i · r_i = total_tax`
//!
//! for the minimum-norm least squares `x`. With two distinct rates this is an
//! exact solve; with more slabs the system is underdetermined and the shortest
//! exact solution is returned. No sign constraint is applied, so individual
//! slabs may come out negative.
//!
//! Known limitation: rank-deficient inputs (a single slab, or repeated rates)
//! get whatever the pseudo-inverse gives; they are not special-cased.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::domain::{Allocation, AllocationTarget, Diagnostics, Method, SlabRow, SlabSet};
use crate::math::solve_least_squares;

/// Build the constraint matrix: an all-ones row over a row of rate fractions.
pub fn constraint_matrix(slabs: &SlabSet) -> DMatrix<f64> {
    let n = slabs.len();
    let fractions = slabs.fractions();
    DMatrix::from_fn(2, n, |row, col| if row == 0 { 1.0 } else { fractions[col] })
}

/// Distribute the targets across slabs by minimum-norm least squares.
pub fn solve_unconstrained(slabs: &SlabSet, target: &AllocationTarget) -> Allocation {
    let a = constraint_matrix(slabs);
    let b = DVector::from_row_slice(&[target.total_taxable, target.total_tax]);

    let (x, rank) = match solve_least_squares(&a, &b) {
        Some(ls) => (ls.solution, Some(ls.rank)),
        None => {
            warn!("least squares produced non-finite values; returning a zero split");
            (DVector::zeros(slabs.len()), None)
        }
    };
    debug!(?rank, "unconstrained solve");

    // Tax is recomputed from each taxable value so every row is rate-consistent.
    let rows = slabs
        .rates()
        .iter()
        .zip(x.iter())
        .map(|(&rate, &taxable)| SlabRow {
            rate,
            taxable,
            tax: taxable * rate / 100.0,
        })
        .collect();

    Allocation::from_rows(
        Method::Normal,
        rows,
        Diagnostics {
            rank,
            ..Diagnostics::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rates: &[f64], total_taxable: f64, total_tax: f64) -> Allocation {
        let slabs = SlabSet::new(rates.to_vec()).unwrap();
        let target = AllocationTarget::new(total_taxable, total_tax).unwrap();
        solve_unconstrained(&slabs, &target)
    }

    #[test]
    fn three_slabs_hit_both_totals() {
        let alloc = run(&[5.0, 12.0, 18.0], 1000.0, 100.0);
        assert_eq!(alloc.rows.len(), 3);
        assert!((alloc.total_taxable - 1000.0).abs() < 0.01);
        assert!((alloc.total_tax - 100.0).abs() < 0.01);
        assert_eq!(alloc.diagnostics.rank, Some(2));
    }

    #[test]
    fn rows_are_rate_consistent() {
        let alloc = run(&[5.0, 12.0, 18.0, 28.0], 2500.0, 300.0);
        for row in &alloc.rows {
            assert_eq!(row.tax, row.taxable * row.rate / 100.0);
        }
    }

    #[test]
    fn two_slabs_is_an_exact_solve() {
        let alloc = run(&[5.0, 18.0], 1000.0, 100.0);
        // 0.05 x + 0.18 (1000 - x) = 100  =>  x = 80 / 0.13
        assert!((alloc.rows[0].taxable - 80.0 / 0.13).abs() < 1e-6);
        assert!((alloc.rows[1].taxable - (1000.0 - 80.0 / 0.13)).abs() < 1e-6);
    }

    #[test]
    fn minimum_norm_solution_can_go_negative() {
        // Effective rate 2% is below every slab; only a negative slab can reach it.
        let alloc = run(&[5.0, 12.0, 18.0], 1000.0, 20.0);
        assert!(alloc.rows.iter().any(|r| r.taxable < 0.0));
        assert!((alloc.total_taxable - 1000.0).abs() < 1e-6);
        assert!((alloc.total_tax - 20.0).abs() < 1e-6);
    }

    #[test]
    fn single_slab_is_trivial() {
        let alloc = run(&[18.0], 1000.0, 180.0);
        assert!((alloc.rows[0].taxable - 1000.0).abs() < 1e-9);
        assert!((alloc.rows[0].tax - 180.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let a = run(&[5.0, 12.0, 18.0], 1234.5, 150.25);
        let b = run(&[5.0, 12.0, 18.0], 1234.5, 150.25);
        assert_eq!(a, b);
    }
}
