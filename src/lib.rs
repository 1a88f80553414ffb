//! `gst-alloc` library crate.
//!
//! The binary (`gst`) is a thin wrapper around this library so that:
//!
//! - both solvers are testable without spawning processes
//! - the core can be hosted behind other front-ends (a web form, a batch job)
//!   without pulling in CLI concerns

pub mod alloc;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
