//! Fixed-width text rendering of solver outcomes.

use crate::domain::{Allocation, Diagnostics, Infeasible, Outcome};

/// Render either outcome as the user-facing text.
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Allocated(alloc) => format_allocation(alloc),
        Outcome::Infeasible(inf) => format_infeasible(inf),
    }
}

/// Header, one row per slab, and a trailing `Total` row.
pub fn format_allocation(alloc: &Allocation) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\nGST Allocation Table ({})\n",
        alloc.method.display_name()
    ));
    out.push_str(&format!("{:<8} {:<12} {:<12}\n", "Rate %", "Taxable", "Tax"));

    for row in &alloc.rows {
        out.push_str(&format!(
            "{:<8} {:<12.2} {:<12.2}\n",
            fmt_rate(row.rate),
            row.taxable,
            row.tax
        ));
    }
    out.push_str(&format!(
        "{:<8} {:<12.2} {:<12.2}\n",
        "Total", alloc.total_taxable, alloc.total_tax
    ));

    out
}

pub fn format_infeasible(inf: &Infeasible) -> String {
    let mut out = String::new();
    out.push_str("\nINVALID GST INPUT\n");
    out.push_str(&format!("Effective GST Rate : {:.2}%\n", inf.effective_rate));
    out.push_str(&format!(
        "Allowed Range     : {}% to {}%\n",
        fmt_rate(inf.min_rate),
        fmt_rate(inf.max_rate)
    ));
    out.push_str("Negative taxable values would be required without constraints.\n");
    out
}

/// Plain-text summary of recovered solver conditions.
pub fn format_diagnostics(diag: &Diagnostics) -> String {
    let mut out = String::new();
    out.push_str("Diagnostics:\n");
    if let Some(rank) = diag.rank {
        out.push_str(&format!("- least squares rank: {rank}\n"));
    }
    if diag.rounds > 0 {
        out.push_str(&format!("- correction rounds: {}\n", diag.rounds));
        out.push_str(&format!("- deactivated slabs: {}\n", fmt_indices(&diag.deactivated)));
        out.push_str(&format!(
            "- degenerate rounds: {}\n",
            fmt_indices(&diag.degenerate_rounds)
        ));
        out.push_str(&format!("- round cap reached: {}\n", diag.cap_reached));
    }
    out
}

/// Whole rates keep one decimal (`18.0`); others print as-is (`12.5`).
fn fmt_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{rate:.1}")
    } else {
        format!("{rate}")
    }
}

fn fmt_indices(v: &[usize]) -> String {
    if v.is_empty() {
        return "none".to_string();
    }
    let parts: Vec<String> = v.iter().map(|i| i.to_string()).collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Method, SlabRow};

    fn sample() -> Allocation {
        Allocation::from_rows(
            Method::Balanced,
            vec![
                SlabRow {
                    rate: 5.0,
                    taxable: 615.384615,
                    tax: 30.769231,
                },
                SlabRow {
                    rate: 12.5,
                    taxable: 384.615385,
                    tax: 69.230769,
                },
            ],
            Diagnostics::default(),
        )
    }

    #[test]
    fn table_layout_is_fixed_width() {
        let text = format_allocation(&sample());
        let expected = "\nGST Allocation Table (Balanced-Proportional, Non-negative)\n\
                        Rate %   Taxable      Tax         \n\
                        5.0      615.38       30.77       \n\
                        12.5     384.62       69.23       \n\
                        Total    1000.00      100.00      \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn normal_method_title() {
        let mut alloc = sample();
        alloc.method = Method::Normal;
        assert!(format_allocation(&alloc).starts_with("\nGST Allocation Table (Normal Calc)\n"));
    }

    #[test]
    fn infeasible_message() {
        let text = format_infeasible(&Infeasible {
            effective_rate: 50.0,
            min_rate: 12.0,
            max_rate: 18.0,
        });
        assert_eq!(
            text,
            "\nINVALID GST INPUT\n\
             Effective GST Rate : 50.00%\n\
             Allowed Range     : 12.0% to 18.0%\n\
             Negative taxable values would be required without constraints.\n"
        );
    }

    #[test]
    fn diagnostics_lists_rounds() {
        let text = format_diagnostics(&Diagnostics {
            rounds: 2,
            deactivated: vec![2],
            degenerate_rounds: vec![],
            cap_reached: false,
            rank: None,
        });
        assert!(text.contains("- correction rounds: 2\n"));
        assert!(text.contains("- deactivated slabs: 2\n"));
        assert!(text.contains("- degenerate rounds: none\n"));
    }
}
