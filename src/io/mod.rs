//! Output helpers.
//!
//! - result text artifact (`export`)
//! - outcome JSON (`outcome_json`)

pub mod export;
pub mod outcome_json;

pub use export::*;
pub use outcome_json::*;
