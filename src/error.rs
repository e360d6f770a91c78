//! Error types for the tfcat library.
//!
//! All fallible operations return [`TfcatError`] through the crate-wide
//! [`Result`] alias. Variants follow the taxonomy used across the crate:
//! malformed input, invalid parameters, unavailable resources and the
//! wrapped I/O and serialization errors.
//!
//! # Examples
//!
//! ```
//! use tfcat::error::{Result, TfcatError};
//!
//! fn check(threshold: f64) -> Result<()> {
//!     if threshold < 0.0 {
//!         return Err(TfcatError::invalid_parameter("threshold must be non-negative"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(-1.0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for tfcat operations.
#[derive(Error, Debug)]
pub enum TfcatError {
    /// I/O errors (model files, labeled data, similarity resources)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Training, classification or model input that cannot be used
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A training record lacks a required field
    #[error("Missing field '{field}' in document {index}")]
    MissingField { field: String, index: usize },

    /// Numeric knob outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Similarity oracle or background load failed
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A category was recorded with zero documents
    #[error("Division by zero: {0}")]
    DivideByZero(String),

    /// Analysis-related errors (tokenization, segmentation, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),
}

/// Result type alias for operations that may fail with TfcatError.
pub type Result<T> = std::result::Result<T, TfcatError>;

impl TfcatError {
    /// Create a new malformed input error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        TfcatError::MalformedInput(msg.into())
    }

    /// Create a new missing field error.
    pub fn missing_field<S: Into<String>>(field: S, index: usize) -> Self {
        TfcatError::MissingField {
            field: field.into(),
            index,
        }
    }

    /// Create a new invalid parameter error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        TfcatError::InvalidParameter(msg.into())
    }

    /// Create a new resource unavailable error.
    pub fn resource_unavailable<S: Into<String>>(msg: S) -> Self {
        TfcatError::ResourceUnavailable(msg.into())
    }

    /// Create a new divide by zero error.
    pub fn divide_by_zero<S: Into<String>>(msg: S) -> Self {
        TfcatError::DivideByZero(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TfcatError::Analysis(msg.into())
    }

    /// Whether this error came from malformed caller input.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            TfcatError::MalformedInput(_) | TfcatError::MissingField { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TfcatError::malformed("no documents");
        assert_eq!(error.to_string(), "Malformed input: no documents");

        let error = TfcatError::missing_field("Category", 3);
        assert_eq!(error.to_string(), "Missing field 'Category' in document 3");

        let error = TfcatError::invalid_parameter("min_similarity out of range");
        assert_eq!(
            error.to_string(),
            "Invalid parameter: min_similarity out of range"
        );
    }

    #[test]
    fn test_malformed_kinds() {
        assert!(TfcatError::malformed("x").is_malformed_input());
        assert!(TfcatError::missing_field("message", 0).is_malformed_input());
        assert!(!TfcatError::resource_unavailable("x").is_malformed_input());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = TfcatError::from(io_error);

        match error {
            TfcatError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
