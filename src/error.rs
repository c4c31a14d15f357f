//! Error types for the iris serving core

use thiserror::Error;

/// Result type alias for serving operations
pub type Result<T> = std::result::Result<T, IrisError>;

/// Main error type for the serving core
#[derive(Error, Debug)]
pub enum IrisError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("Background task error: {0}")]
    BackgroundTask(String),

    #[error("Report generation error: {0}")]
    ReportGeneration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for IrisError {
    fn from(err: serde_json::Error) -> Self {
        IrisError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrisError::ModelNotFound("svm_model".to_string());
        assert_eq!(err.to_string(), "Model not found: svm_model");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IrisError = io_err.into();
        assert!(matches!(err, IrisError::Io(_)));
    }
}
