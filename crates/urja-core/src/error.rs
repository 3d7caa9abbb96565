//! Unified error types for the urja pipeline
//!
//! This module provides a common error type [`UrjaError`] that can represent
//! errors from any stage of the pipeline. Stage-specific failures are
//! converted to `UrjaError` for uniform handling at API boundaries.

use thiserror::Error;

/// Unified error type for all pipeline operations.
///
/// Stage-local problems (one file, one city) are absorbed by the stages
/// themselves and surface only as diagnostics; these variants cover the
/// failures that must propagate.
#[derive(Error, Debug)]
pub enum UrjaError {
    /// I/O errors (file access, directory creation, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors (schema mismatch, bad values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Join-key violations (duplicate keys would fan out rows)
    #[error("Join error: {0}")]
    Join(String),

    /// Model training or prediction errors
    #[error("Model error: {0}")]
    Model(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using UrjaError.
pub type UrjaResult<T> = Result<T, UrjaError>;

impl From<anyhow::Error> for UrjaError {
    fn from(err: anyhow::Error) -> Self {
        UrjaError::Other(err.to_string())
    }
}

impl From<String> for UrjaError {
    fn from(s: String) -> Self {
        UrjaError::Other(s)
    }
}

impl From<&str> for UrjaError {
    fn from(s: &str) -> Self {
        UrjaError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for UrjaError {
    fn from(err: serde_json::Error) -> Self {
        UrjaError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UrjaError::Join("duplicate key (Pune, 2020, 3)".into());
        assert!(err.to_string().contains("Join error"));
        assert!(err.to_string().contains("Pune"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: UrjaError = io_err.into();
        assert!(matches!(err, UrjaError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> UrjaResult<()> {
            Err(UrjaError::Validation("test".into()))
        }

        fn outer() -> UrjaResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
