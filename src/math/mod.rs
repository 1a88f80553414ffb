//! Mathematical utilities: minimum-norm least squares.

pub mod ols;

pub use ols::*;
