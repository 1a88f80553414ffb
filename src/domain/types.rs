//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the solvers and the formatter
//! - exported to JSON alongside the text artifact

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which allocation strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Minimum-norm least squares ("Normal Calc"); values may be negative.
    Normal,
    /// Baseline-weighted iterative correction with non-negative taxable values.
    Balanced,
}

impl Method {
    pub fn display_name(self) -> &'static str {
        match self {
            Method::Normal => "Normal Calc",
            Method::Balanced => "Balanced-Proportional, Non-negative",
        }
    }
}

/// Structural precondition violations.
///
/// These are hard failures: no partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    #[error("At least one GST rate is required.")]
    EmptySlabSet,

    #[error("Declared {declared} slabs but {actual} rates were given.")]
    SlabCountMismatch { declared: usize, actual: usize },

    #[error("Expected {expected} baseline values (one per slab) but {actual} were given.")]
    BaselineLengthMismatch { expected: usize, actual: usize },

    #[error("{field} must be a finite number, got {value}.")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Baseline value #{index} is negative ({value}).")]
    NegativeBaseline { index: usize, value: f64 },

    #[error("Baseline values sum to zero; cannot seed a proportional split.")]
    ZeroBaselineSum,
}

/// Ordered list of GST rate percentages (e.g. `[5.0, 12.0, 18.0]`).
///
/// Order only matters for display: output rows follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabSet {
    rates: Vec<f64>,
}

impl SlabSet {
    pub fn new(rates: Vec<f64>) -> Result<Self, MalformedInput> {
        if rates.is_empty() {
            return Err(MalformedInput::EmptySlabSet);
        }
        if let Some(&value) = rates.iter().find(|r| !r.is_finite()) {
            return Err(MalformedInput::NonFinite { field: "rate", value });
        }
        Ok(Self { rates })
    }

    /// Build a slab set and check it against the caller's declared slab count.
    pub fn with_count(declared: usize, rates: Vec<f64>) -> Result<Self, MalformedInput> {
        if rates.is_empty() {
            return Err(MalformedInput::EmptySlabSet);
        }
        if declared != rates.len() {
            return Err(MalformedInput::SlabCountMismatch {
                declared,
                actual: rates.len(),
            });
        }
        Self::new(rates)
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rates as fractions (`18.0 -> 0.18`).
    pub fn fractions(&self) -> Vec<f64> {
        self.rates.iter().map(|r| r / 100.0).collect()
    }

    pub fn min_rate(&self) -> f64 {
        self.rates.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_rate(&self) -> f64 {
        self.rates.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// The two totals every allocation must reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationTarget {
    pub total_taxable: f64,
    pub total_tax: f64,
}

impl AllocationTarget {
    pub fn new(total_taxable: f64, total_tax: f64) -> Result<Self, MalformedInput> {
        if !total_taxable.is_finite() {
            return Err(MalformedInput::NonFinite {
                field: "total taxable value",
                value: total_taxable,
            });
        }
        if !total_tax.is_finite() {
            return Err(MalformedInput::NonFinite {
                field: "total tax value",
                value: total_tax,
            });
        }
        Ok(Self {
            total_taxable,
            total_tax,
        })
    }

    /// `total_tax / total_taxable * 100`.
    ///
    /// Non-finite when `total_taxable` is zero.
    pub fn effective_rate(&self) -> f64 {
        self.total_tax / self.total_taxable * 100.0
    }
}

/// Existing taxable values, one per slab.
///
/// Only used to seed and weight the balanced solver; not a constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    values: Vec<f64>,
}

impl Baseline {
    pub fn new(values: Vec<f64>, slabs: &SlabSet) -> Result<Self, MalformedInput> {
        if values.len() != slabs.len() {
            return Err(MalformedInput::BaselineLengthMismatch {
                expected: slabs.len(),
                actual: values.len(),
            });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(MalformedInput::NonFinite {
                    field: "baseline value",
                    value,
                });
            }
            if value < 0.0 {
                return Err(MalformedInput::NegativeBaseline { index, value });
            }
        }
        if values.iter().sum::<f64>() <= 0.0 {
            return Err(MalformedInput::ZeroBaselineSum);
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// One output row: a slab and its allocated amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlabRow {
    pub rate: f64,
    pub taxable: f64,
    pub tax: f64,
}

/// Solver output: per-slab rows plus the derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub method: Method,
    pub rows: Vec<SlabRow>,
    pub total_taxable: f64,
    pub total_tax: f64,
    pub diagnostics: Diagnostics,
}

impl Allocation {
    pub fn from_rows(method: Method, rows: Vec<SlabRow>, diagnostics: Diagnostics) -> Self {
        let total_taxable = rows.iter().map(|r| r.taxable).sum();
        let total_tax = rows.iter().map(|r| r.tax).sum();
        Self {
            method,
            rows,
            total_taxable,
            total_tax,
            diagnostics,
        }
    }
}

/// Recovered conditions observed while solving.
///
/// Nothing here is an error; it exists so callers (and tests) can see when the
/// degenerate fallback or the round cap kicked in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Correction rounds executed (balanced solver only).
    pub rounds: usize,
    /// Slab indices clamped to zero, in the order they were removed.
    pub deactivated: Vec<usize>,
    /// 1-based round numbers where the correction direction was singular and
    /// the rate-proportional fallback was used.
    pub degenerate_rounds: Vec<usize>,
    /// The round cap was hit while the last round still produced negatives.
    pub cap_reached: bool,
    /// Numerical rank of the least-squares system (normal solver only).
    pub rank: Option<usize>,
}

/// Reason a balanced allocation cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Infeasible {
    pub effective_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,
}

/// Terminal result of a solve: either an allocation or an infeasibility report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Allocated(Allocation),
    Infeasible(Infeasible),
}

impl Outcome {
    pub fn allocation(&self) -> Option<&Allocation> {
        match self {
            Outcome::Allocated(a) => Some(a),
            Outcome::Infeasible(_) => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Outcome::Allocated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slab_count_must_match_rates() {
        let err = SlabSet::with_count(2, vec![5.0, 12.0, 18.0]).unwrap_err();
        assert_eq!(
            err,
            MalformedInput::SlabCountMismatch {
                declared: 2,
                actual: 3
            }
        );
        assert!(SlabSet::with_count(3, vec![5.0, 12.0, 18.0]).is_ok());
    }

    #[test]
    fn empty_rates_rejected() {
        assert_eq!(SlabSet::new(vec![]).unwrap_err(), MalformedInput::EmptySlabSet);
        assert_eq!(
            SlabSet::with_count(0, vec![]).unwrap_err(),
            MalformedInput::EmptySlabSet
        );
    }

    #[test]
    fn non_finite_rate_rejected() {
        assert!(matches!(
            SlabSet::new(vec![5.0, f64::NAN]),
            Err(MalformedInput::NonFinite { field: "rate", .. })
        ));
    }

    #[test]
    fn baseline_checks() {
        let slabs = SlabSet::new(vec![5.0, 18.0]).unwrap();
        assert_eq!(
            Baseline::new(vec![1.0], &slabs).unwrap_err(),
            MalformedInput::BaselineLengthMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            Baseline::new(vec![0.0, 0.0], &slabs).unwrap_err(),
            MalformedInput::ZeroBaselineSum
        );
        assert!(matches!(
            Baseline::new(vec![10.0, -1.0], &slabs),
            Err(MalformedInput::NegativeBaseline { index: 1, .. })
        ));
        assert!(Baseline::new(vec![0.0, 10.0], &slabs).is_ok());
    }

    #[test]
    fn rate_range_and_effective_rate() {
        let slabs = SlabSet::new(vec![12.0, 5.0, 18.0]).unwrap();
        assert_eq!(slabs.min_rate(), 5.0);
        assert_eq!(slabs.max_rate(), 18.0);

        let target = AllocationTarget::new(1000.0, 100.0).unwrap();
        assert!((target.effective_rate() - 10.0).abs() < 1e-12);
        assert!(!AllocationTarget::new(0.0, 5.0).unwrap().effective_rate().is_finite());
    }
}
