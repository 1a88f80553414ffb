//! Command-line parsing for the GST allocation calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the solver code. List arguments are comma separated
//! (`--rates 5,12,18`); clap rejects non-numeric entries before anything runs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Method;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gst", version, about = "GST Allocation Calculator")]
pub struct Cli {
    /// Enable debug logging (per-round solver detail) on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands, one per allocation method.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Least squares split ("Normal Calc"); slabs may come out negative.
    Normal(NormalArgs),
    /// Balanced-proportional split around existing taxable values, never negative.
    Balanced(BalancedArgs),
}

impl Command {
    pub fn method(&self) -> Method {
        match self {
            Command::Normal(_) => Method::Normal,
            Command::Balanced(_) => Method::Balanced,
        }
    }

    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Normal(args) => &args.common,
            Command::Balanced(args) => &args.common,
        }
    }

    pub fn baseline(&self) -> Option<Vec<f64>> {
        match self {
            Command::Normal(_) => None,
            Command::Balanced(args) => Some(args.baseline.clone()),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct NormalArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args, Clone)]
pub struct BalancedArgs {
    /// Existing taxable values, one per slab (e.g. 900,50,50).
    #[arg(long, value_delimiter = ',', required = true, num_args = 1..)]
    pub baseline: Vec<f64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options shared by both methods.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Number of slabs; must match the rate list. Defaults to the rate count.
    #[arg(short = 'n', long)]
    pub slabs: Option<usize>,

    /// GST rates in percent, comma separated (e.g. 5,12,18).
    #[arg(short, long, value_delimiter = ',', required = true, num_args = 1..)]
    pub rates: Vec<f64>,

    /// Expected total taxable value.
    #[arg(long, allow_negative_numbers = true)]
    pub total_taxable: f64,

    /// Expected total tax value.
    #[arg(long, allow_negative_numbers = true)]
    pub total_tax: f64,

    /// Result text file (overrides GST_RESULT_PATH and the Desktop default).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not write the result text file.
    #[arg(long, conflicts_with = "output")]
    pub no_save: bool,

    /// Also write the request and outcome as JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Print solver diagnostics after the result.
    #[arg(long)]
    pub diagnostics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_balanced_command() {
        let cli = Cli::try_parse_from([
            "gst",
            "balanced",
            "-n",
            "3",
            "--rates",
            "5,12,18",
            "--baseline",
            "900,50,50",
            "--total-taxable",
            "1000",
            "--total-tax",
            "51",
        ])
        .unwrap();

        assert_eq!(cli.command.method(), Method::Balanced);
        let common = cli.command.common();
        assert_eq!(common.slabs, Some(3));
        assert_eq!(common.rates, vec![5.0, 12.0, 18.0]);
        assert_eq!(cli.command.baseline(), Some(vec![900.0, 50.0, 50.0]));
        assert!(!common.no_save);
    }

    #[test]
    fn normal_command_has_no_baseline() {
        let cli = Cli::try_parse_from([
            "gst",
            "normal",
            "--rates",
            "5,12,18",
            "--total-taxable",
            "1000",
            "--total-tax",
            "100",
            "--no-save",
        ])
        .unwrap();
        assert_eq!(cli.command.method(), Method::Normal);
        assert_eq!(cli.command.baseline(), None);
        assert!(cli.command.common().no_save);
    }

    #[test]
    fn non_numeric_rate_is_rejected() {
        let result = Cli::try_parse_from([
            "gst",
            "normal",
            "--rates",
            "5,twelve",
            "--total-taxable",
            "1000",
            "--total-tax",
            "100",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn balanced_requires_baseline() {
        let result = Cli::try_parse_from([
            "gst",
            "balanced",
            "--rates",
            "5,18",
            "--total-taxable",
            "1000",
            "--total-tax",
            "100",
        ]);
        assert!(result.is_err());
    }
}
