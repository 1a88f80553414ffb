//! Persist the rendered result text.
//!
//! The artifact always holds the latest run only: each write truncates it.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::AppError;

/// Write `text` verbatim to `path`, replacing any previous content.
pub fn write_result_text(path: &Path, text: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::new(3, format!("Failed to create directory '{}': {e}", parent.display()))
        })?;
    }

    let mut file = File::create(path)
        .map_err(|e| AppError::new(3, format!("Failed to create result file '{}': {e}", path.display())))?;
    file.write_all(text.as_bytes())
        .map_err(|e| AppError::new(3, format!("Failed to write result file '{}': {e}", path.display())))?;

    debug!(path = %path.display(), bytes = text.len(), "result written");
    Ok(())
}
