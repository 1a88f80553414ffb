//! Write an outcome as a JSON document.
//!
//! The JSON file is the machine-readable twin of the text artifact: it carries
//! the request alongside the result so it can be consumed without re-parsing the
//! table. The schema is defined by `OutcomeFile`.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alloc::AllocationRequest;
use crate::domain::{AllocationTarget, Method, Outcome};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub method: Method,
    pub rates: Vec<f64>,
    pub target: AllocationTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Vec<f64>>,
    pub outcome: Outcome,
}

impl OutcomeFile {
    pub fn new(request: &AllocationRequest, outcome: &Outcome) -> Self {
        Self {
            tool: "gst".to_string(),
            generated_at: Utc::now(),
            method: request.method,
            rates: request.slabs.rates().to_vec(),
            target: request.target,
            baseline: request.baseline.as_ref().map(|b| b.values().to_vec()),
            outcome: outcome.clone(),
        }
    }
}

pub fn write_outcome_json(path: &Path, request: &AllocationRequest, outcome: &Outcome) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(3, format!("Failed to create outcome JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &OutcomeFile::new(request, outcome))
        .map_err(|e| AppError::new(3, format!("Failed to write outcome JSON: {e}")))?;

    Ok(())
}
