//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - validated solver inputs (`SlabSet`, `AllocationTarget`, `Baseline`)
//! - solver outputs (`Allocation`, `Outcome`, `Diagnostics`)
//! - the structural error channel (`MalformedInput`)

pub mod types;

pub use types::*;
