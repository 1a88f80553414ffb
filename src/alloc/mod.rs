//! Allocation solvers.
//!
//! Responsibilities:
//!
//! - minimum-norm least squares split (`unconstrained`)
//! - baseline-weighted non-negative split (`balanced`)
//! - dispatch of a request to exactly one of them (`solve`)

pub mod balanced;
pub mod unconstrained;

pub use balanced::*;
pub use unconstrained::*;

use tracing::info;

use crate::domain::{AllocationTarget, Baseline, MalformedInput, Method, Outcome, SlabSet};

/// One validated solver invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    pub method: Method,
    pub slabs: SlabSet,
    pub target: AllocationTarget,
    /// Required for `Method::Balanced`, ignored otherwise.
    pub baseline: Option<Baseline>,
}

impl AllocationRequest {
    /// Validate raw caller values into a request.
    ///
    /// `declared_slabs` is the slab count the caller claims; it must match
    /// both the rate list and (for the balanced method) the baseline list.
    pub fn new(
        method: Method,
        declared_slabs: usize,
        rates: Vec<f64>,
        baseline: Option<Vec<f64>>,
        total_taxable: f64,
        total_tax: f64,
    ) -> Result<Self, MalformedInput> {
        let slabs = SlabSet::with_count(declared_slabs, rates)?;
        let target = AllocationTarget::new(total_taxable, total_tax)?;
        let baseline = match method {
            Method::Normal => None,
            Method::Balanced => {
                let values = baseline.unwrap_or_default();
                Some(Baseline::new(values, &slabs)?)
            }
        };
        Ok(Self {
            method,
            slabs,
            target,
            baseline,
        })
    }
}

/// Run the solver selected by `request.method`.
pub fn solve(request: &AllocationRequest) -> Result<Outcome, MalformedInput> {
    info!(
        method = ?request.method,
        slabs = request.slabs.len(),
        total_taxable = request.target.total_taxable,
        total_tax = request.target.total_tax,
        "solving allocation"
    );

    let outcome = match request.method {
        Method::Normal => Outcome::Allocated(solve_unconstrained(&request.slabs, &request.target)),
        Method::Balanced => {
            let baseline = match &request.baseline {
                Some(b) => b,
                None => {
                    return Err(MalformedInput::BaselineLengthMismatch {
                        expected: request.slabs.len(),
                        actual: 0,
                    });
                }
            };
            solve_balanced(&request.slabs, baseline, &request.target)
        }
    };

    if let Outcome::Infeasible(inf) = &outcome {
        info!(effective_rate = inf.effective_rate, "allocation infeasible");
    }
    Ok(outcome)
}
