//! Coded errors with recovery suggestions
//!
//! Errors carry an error code for programmatic handling and an optional
//! recovery suggestion shown to the operator.

use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors (6xxx)
    InvalidRange = 6004,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Process exit code for a CLI failing with this error
    pub fn exit_code(&self) -> u8 {
        match self.code() / 1000 {
            6 => exit_codes::VALIDATION_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Recovery suggestion
    pub suggestion: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn invalid_range(start: i32, end: i32) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("End year {} is before start year {}", end, start),
        )
        .with_suggestion("Pick an end year on or after the start year")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const VALIDATION_ERROR: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const NETWORK_ERROR: u8 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidRange.to_string(), "E6004");
    }

    #[test]
    fn test_validation_errors_exit_with_validation_code() {
        assert_eq!(ErrorCode::InvalidRange.exit_code(), exit_codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_invalid_range_has_suggestion() {
        let err = Error::invalid_range(2030, 2025);

        assert_eq!(err.code, ErrorCode::InvalidRange);
        assert!(err.message.contains("2025"));
        assert!(err.to_string().contains("Suggestion: Pick an end year"));
    }
}
