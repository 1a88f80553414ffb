//! Reporting utilities: formatted allocation tables and messages.
//!
//! We keep formatting code in one place so:
//! - the solver code stays clean and testable
//! - the persisted artifact and stdout are byte-identical

pub mod format;

pub use format::*;
