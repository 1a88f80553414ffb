//! Shared request workflow: validate -> solve -> render.
//!
//! Keeping this apart from `app::run` lets the whole path be tested without
//! touching stdout or the filesystem.

use crate::alloc::{AllocationRequest, solve};
use crate::cli::Command;
use crate::domain::Outcome;
use crate::error::AppError;
use crate::report::format_outcome;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub outcome: Outcome,
    /// Rendered table or infeasibility message, exactly as persisted.
    pub text: String,
}

/// Build a validated request from parsed CLI arguments.
pub fn request_from_command(command: &Command) -> Result<AllocationRequest, AppError> {
    let common = command.common();
    let declared = common.slabs.unwrap_or(common.rates.len());
    let request = AllocationRequest::new(
        command.method(),
        declared,
        common.rates.clone(),
        command.baseline(),
        common.total_taxable,
        common.total_tax,
    )?;
    Ok(request)
}

/// Solve and render one request.
pub fn run_allocation(request: &AllocationRequest) -> Result<RunOutput, AppError> {
    let outcome = solve(request)?;
    let text = format_outcome(&outcome);
    Ok(RunOutput { outcome, text })
}
