//! Application error carrying the process exit code.
//!
//! Exit codes:
//! - `2`: malformed input (the request never reached a solver)
//! - `3`: the result could not be persisted

use crate::domain::MalformedInput;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<MalformedInput> for AppError {
    fn from(err: MalformedInput) -> Self {
        AppError::new(2, format!("Malformed input: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_maps_to_exit_code_two() {
        let err: AppError = MalformedInput::EmptySlabSet.into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Malformed input: At least one GST rate is required.");
    }
}
