//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves where the result artifact goes
//! - runs exactly one solver
//! - prints and persists the rendered result

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable naming the result text file.
pub const RESULT_PATH_ENV: &str = "GST_RESULT_PATH";

/// File name used when no explicit path is configured.
pub const DEFAULT_RESULT_FILE: &str = "GST_Allocation_Result.txt";

/// Where (and whether) the rendered result is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub result_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

impl OutputConfig {
    /// Resolve from CLI flags, then `.env`/environment, then the Desktop default.
    pub fn from_args(command: &Command) -> Self {
        dotenvy::dotenv().ok();
        let common = command.common();
        let result_path = if common.no_save {
            None
        } else {
            Some(resolve_result_path(
                common.output.as_deref(),
                std::env::var(RESULT_PATH_ENV).ok(),
                std::env::var_os("HOME").map(PathBuf::from),
            ))
        };
        Self {
            result_path,
            json_path: common.export_json.clone(),
        }
    }
}

/// Pick the result path: flag, environment, `~/Desktop`, then the working directory.
pub fn resolve_result_path(flag: Option<&Path>, env_value: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(value);
    }
    match home {
        Some(home) => home.join("Desktop").join(DEFAULT_RESULT_FILE),
        None => PathBuf::from(DEFAULT_RESULT_FILE),
    }
}

/// Entry point for the `gst` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let output = OutputConfig::from_args(&cli.command);
    let show_diagnostics = cli.command.common().diagnostics;

    let request = pipeline::request_from_command(&cli.command)?;
    let run = pipeline::run_allocation(&request)?;

    print!("{}", run.text);
    if show_diagnostics {
        if let Some(alloc) = run.outcome.allocation() {
            println!();
            print!("{}", crate::report::format_diagnostics(&alloc.diagnostics));
        }
    }

    if let Some(path) = &output.result_path {
        crate::io::write_result_text(path, &run.text)?;
        info!(path = %path.display(), "result saved");
    }
    if let Some(path) = &output.json_path {
        crate::io::write_outcome_json(path, &request, &run.outcome)?;
        info!(path = %path.display(), "outcome JSON saved");
    }

    Ok(())
}
