//! Error types for normqa.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, model services, catalog store
//! access, prompt rendering, and serialization.
//!
//! Two failure kinds from the pipeline are deliberately *not* errors:
//! a generated SQL statement that fails to execute becomes an error-text
//! value inside the result table, and a chart that cannot be built becomes
//! an absent chart. Both flow into synthesis as degraded-but-valid data.

use thiserror::Error;

/// Unified error type for normqa.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Completion or embedding service errors
    #[error("Model service error: {0}")]
    Model(String),

    /// Catalog store access errors
    #[error("Catalog store error: {0}")]
    Store(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Model("connection refused".to_string());
        assert_eq!(err.to_string(), "Model service error: connection refused");

        let err = AppError::Store("no such table".to_string());
        assert_eq!(err.to_string(), "Catalog store error: no such table");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
