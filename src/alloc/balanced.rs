//! Balanced-proportional allocation with non-negative taxable values.
//!
//! Outline:
//!
//! 1. Reject targets whose effective rate lies outside `[min(rates), max(rates)]`.
//!    No non-negative split can reach them, nor a non-positive taxable total.
//! 2. Seed `x` by scaling the caller's baseline to `total_taxable`.
//! 3. Run correction rounds. Each round moves tax between active slabs along
//!    `delta_i = w_i (r_i - r̄)`, which sums to zero and so leaves the taxable
//!    total alone. Slabs pushed below zero are pinned at zero and leave the active
//!    set for good; the taxable shortfall they leave is spread over the
//!    remaining active slabs by baseline share.
//! 4. Rescale taxable to `total_taxable`, recompute tax, then rescale tax to
//!    `total_tax`. The second rescale can break a row's exact `tax = taxable · r`
//!    relationship in edge cases; totals always match.
//!
//! Rounds are a pure function `RoundState -> RoundState` so each one can be
//! inspected on its own.

use tracing::{debug, warn};

use crate::domain::{
    Allocation, AllocationTarget, Baseline, Diagnostics, Infeasible, Method, Outcome, SlabRow,
    SlabSet,
};

/// Hard cap on correction rounds. Hitting it is not an error.
pub const MAX_ROUNDS: usize = 100;

/// Below this `|Σ delta_i · r_i|` the weighted direction is treated as singular.
const DEGENERATE_EPS: f64 = 1e-12;

/// Taxable gaps smaller than this are not redistributed.
const TAXABLE_GAP_EPS: f64 = 1e-9;

/// Slack (in percentage points) on the inclusive feasibility range.
pub const FEASIBILITY_TOL: f64 = 1e-9;

/// Iteration state carried from round to round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub x: Vec<f64>,
    /// `false` once a slab has been clamped to zero.
    pub active: Vec<bool>,
}

impl RoundState {
    pub fn active_indices(&self) -> Vec<usize> {
        (0..self.active.len()).filter(|&i| self.active[i]).collect()
    }
}

/// What happened during a single round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundReport {
    /// Slabs clamped and removed this round.
    pub deactivated: Vec<usize>,
    /// The rate-proportional fallback direction was used.
    pub degenerate: bool,
}

impl RoundReport {
    /// A round that clamps nothing ends the iteration.
    pub fn converged(&self) -> bool {
        self.deactivated.is_empty()
    }
}

/// Check the effective rate against the slab range.
///
/// Returns the infeasibility details, or `None` if a non-negative split exists.
/// A non-positive taxable total is always infeasible: non-negative slabs cannot
/// sum to it.
pub fn check_feasibility(slabs: &SlabSet, target: &AllocationTarget) -> Option<Infeasible> {
    let effective_rate = target.effective_rate();
    let min_rate = slabs.min_rate();
    let max_rate = slabs.max_rate();

    let inside = target.total_taxable > 0.0
        && effective_rate.is_finite()
        && effective_rate >= min_rate - FEASIBILITY_TOL
        && effective_rate <= max_rate + FEASIBILITY_TOL;
    if inside {
        None
    } else {
        Some(Infeasible {
            effective_rate,
            min_rate,
            max_rate,
        })
    }
}

/// Fixed inputs of one balanced solve.
#[derive(Debug, Clone)]
pub struct BalancedProblem {
    rates: Vec<f64>,
    fractions: Vec<f64>,
    baseline: Vec<f64>,
    seed: Vec<f64>,
    target: AllocationTarget,
}

impl BalancedProblem {
    pub fn new(slabs: &SlabSet, baseline: &Baseline, target: &AllocationTarget) -> Self {
        let sum = baseline.sum();
        let seed = baseline
            .values()
            .iter()
            .map(|b| b / sum * target.total_taxable)
            .collect();
        Self {
            rates: slabs.rates().to_vec(),
            fractions: slabs.fractions(),
            baseline: baseline.values().to_vec(),
            seed,
            target: *target,
        }
    }

    /// Baseline scaled to the taxable target, every slab active.
    pub fn initial_state(&self) -> RoundState {
        RoundState {
            x: self.seed.clone(),
            active: vec![true; self.seed.len()],
        }
    }

    /// Apply one correction round.
    pub fn round(&self, state: &RoundState) -> (RoundState, RoundReport) {
        let idx = state.active_indices();
        if idx.is_empty() {
            return (state.clone(), RoundReport::default());
        }
        let r = &self.fractions;

        let raw: Vec<f64> = idx.iter().map(|&i| self.baseline[i] * r[i]).collect();
        let raw_sum: f64 = raw.iter().sum();
        let w: Vec<f64> = if raw_sum > 0.0 {
            raw.iter().map(|v| v / raw_sum).collect()
        } else {
            vec![1.0 / idx.len() as f64; idx.len()]
        };

        let r_bar: f64 = idx.iter().zip(&w).map(|(&i, wk)| wk * r[i]).sum();
        let current_tax: f64 = idx.iter().map(|&i| state.x[i] * r[i]).sum();
        let tax_gap = self.target.total_tax - current_tax;

        let mut delta: Vec<f64> = idx.iter().zip(&w).map(|(&i, wk)| wk * (r[i] - r_bar)).collect();
        let mut denom: f64 = idx.iter().zip(&delta).map(|(&i, d)| d * r[i]).sum();
        let degenerate = denom.abs() < DEGENERATE_EPS;
        if degenerate {
            delta = idx.iter().map(|&i| r[i]).collect();
            denom = delta.iter().map(|d| d * d).sum();
        }
        // All active rates zero: nothing can move the tax.
        let scale = if denom == 0.0 { 0.0 } else { tax_gap / denom };

        let mut x = state.x.clone();
        for (&i, d) in idx.iter().zip(&delta) {
            x[i] += scale * d;
        }

        let negative: Vec<usize> = idx.iter().copied().filter(|&i| x[i] < 0.0).collect();
        let mut active = state.active.clone();
        for &i in &negative {
            x[i] = 0.0;
            active[i] = false;
        }

        if !negative.is_empty() {
            self.redistribute_taxable(&mut x, &active);
        }

        let report = RoundReport {
            deactivated: negative,
            degenerate,
        };
        (RoundState { x, active }, report)
    }

    /// Spread `total_taxable - Σ_active x` over active slabs by seed share.
    fn redistribute_taxable(&self, x: &mut [f64], active: &[bool]) {
        let idx: Vec<usize> = (0..active.len()).filter(|&i| active[i]).collect();
        if idx.is_empty() {
            return;
        }
        let remaining: f64 = idx.iter().map(|&i| x[i]).sum();
        let gap = self.target.total_taxable - remaining;
        if gap.abs() <= TAXABLE_GAP_EPS {
            return;
        }

        let seed_sum: f64 = idx.iter().map(|&i| self.seed[i]).sum();
        for &i in &idx {
            if seed_sum == 0.0 {
                x[i] += gap / idx.len() as f64;
            } else {
                x[i] += gap * (self.seed[i] / seed_sum);
            }
        }
    }

    /// Rescale taxable, then tax, so both totals match exactly.
    pub fn finalize(&self, x: &[f64]) -> Vec<SlabRow> {
        let mut taxable = x.to_vec();
        let sum: f64 = taxable.iter().sum();
        if sum != 0.0 {
            let k = self.target.total_taxable / sum;
            taxable.iter_mut().for_each(|v| *v *= k);
        }

        let mut tax: Vec<f64> = taxable.iter().zip(&self.fractions).map(|(x, r)| x * r).collect();
        let tax_sum: f64 = tax.iter().sum();
        if tax_sum != 0.0 {
            let k = self.target.total_tax / tax_sum;
            tax.iter_mut().for_each(|v| *v *= k);
        }

        self.rates
            .iter()
            .zip(taxable)
            .zip(tax)
            .map(|((&rate, taxable), tax)| SlabRow { rate, taxable, tax })
            .collect()
    }
}

/// Allocate non-negatively around `baseline`, or report infeasibility.
pub fn solve_balanced(slabs: &SlabSet, baseline: &Baseline, target: &AllocationTarget) -> Outcome {
    if let Some(infeasible) = check_feasibility(slabs, target) {
        return Outcome::Infeasible(infeasible);
    }

    let problem = BalancedProblem::new(slabs, baseline, target);
    let (state, diagnostics) = run_rounds(&problem, MAX_ROUNDS);

    let rows = problem.finalize(&state.x);
    Outcome::Allocated(Allocation::from_rows(Method::Balanced, rows, diagnostics))
}

/// Iterate correction rounds from the seed until one clamps nothing or
/// `max_rounds` elapse.
pub fn run_rounds(problem: &BalancedProblem, max_rounds: usize) -> (RoundState, Diagnostics) {
    let mut state = problem.initial_state();
    let mut diagnostics = Diagnostics::default();
    let mut converged = false;

    for round in 1..=max_rounds {
        let (next, report) = problem.round(&state);
        state = next;
        diagnostics.rounds = round;

        if report.degenerate {
            debug!(round, "singular correction direction, using rate-proportional fallback");
            diagnostics.degenerate_rounds.push(round);
        }
        debug!(round, deactivated = ?report.deactivated, "correction round");
        diagnostics.deactivated.extend_from_slice(&report.deactivated);

        if report.converged() {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(rounds = max_rounds, "round cap reached; accepting current allocation");
        diagnostics.cap_reached = true;
    }

    (state, diagnostics)
}
