//! Error types for the tabstat engine
//!
//! Provides a unified error type for all tabstat crates. Only structural
//! problems are errors: a statistic that cannot be derived from the sample is
//! reported as `None` and rendered as a blank cell, never as an `Error`.

use thiserror::Error;

/// Core error type for tabstat computations
#[derive(Error, Debug)]
pub enum Error {
    /// Mismatched array lengths (data vs weights vs case numbers)
    #[error("Input shape error: {0}")]
    InputShape(String),

    /// An option value that cannot be used
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Unexpected failure while computing
    #[error("Internal computation error: {0}")]
    Internal(String),

    /// Malformed request payload
    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for parallel arrays of different lengths
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InputShape(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a percentile outside [0, 100]
    pub fn invalid_percentile(p: f64) -> Self {
        Self::InvalidOption(format!("Percentile {p} must be in [0, 100]"))
    }

    /// Create an error for an unusable option value
    pub fn invalid_option(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidOption(format!("{name}: {reason}"))
    }

    /// Create an error for NaN/Inf values appearing in a computed result
    pub fn non_finite(context: &str) -> Self {
        Self::Internal(format!("{context} produced NaN or infinite values"))
    }
}

/// Check that a parallel array has the same length as the data column
pub fn check_len(expected: usize, actual: usize, context: &str) -> Result<()> {
    if expected != actual {
        return Err(Error::size_mismatch(expected, actual, context));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputShape("weights too short".to_string());
        assert_eq!(err.to_string(), "Input shape error: weights too short");

        let err = Error::InvalidOption("trim".to_string());
        assert_eq!(err.to_string(), "Invalid option: trim");

        let err = Error::Internal("overflow".to_string());
        assert_eq!(err.to_string(), "Internal computation error: overflow");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(5, 4, "weight vector");
        assert_eq!(
            err.to_string(),
            "Input shape error: Size mismatch in weight vector: expected 5, got 4"
        );

        let err = Error::invalid_percentile(101.0);
        assert_eq!(
            err.to_string(),
            "Invalid option: Percentile 101 must be in [0, 100]"
        );

        let err = Error::invalid_option("trimPercent", "must be in [0, 50)");
        assert_eq!(err.to_string(), "Invalid option: trimPercent: must be in [0, 50)");

        let err = Error::non_finite("variance");
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_check_len() {
        assert!(check_len(3, 3, "weights").is_ok());
        match check_len(3, 2, "case numbers") {
            Err(Error::InputShape(msg)) => assert!(msg.contains("case numbers")),
            other => panic!("Wrong result: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<f64>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("Malformed request"));
    }
}
