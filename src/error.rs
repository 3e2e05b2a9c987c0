//! Error types for loan loading, validation and configuration
//!
//! The amortization engine itself never returns these: an invalid loan is
//! reported through `LoanResult::is_valid`. Errors surface from validation
//! helpers, CSV/JSON I/O and configuration parsing.

use thiserror::Error;

/// Errors raised outside the pure calculation path
#[derive(Debug, Error)]
pub enum LoanError {
    /// An input value is out of range
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Payment frequency string not recognised
    #[error("Unknown payment frequency: {0}")]
    UnknownFrequency(String),

    /// Date could not be parsed or advanced
    #[error("Date error: {0}")]
    Date(String),

    /// Configuration value could not be parsed
    #[error("Invalid configuration '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        LoanError::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        LoanError::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Short code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LoanError::InvalidInput { .. } => "INVALID_INPUT",
            LoanError::UnknownFrequency(_) => "UNKNOWN_FREQUENCY",
            LoanError::Date(_) => "DATE_ERROR",
            LoanError::InvalidConfig { .. } => "INVALID_CONFIG",
            LoanError::Csv(_) => "CSV_ERROR",
            LoanError::Io(_) => "IO_ERROR",
            LoanError::Json(_) => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = LoanError::invalid_input("principal", 0.0, "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid input for 'principal': 0 - must be greater than zero"
        );
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LoanError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
