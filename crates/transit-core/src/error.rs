//! Centralized error types for the transit graph.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for dataset and configuration handling.
#[derive(Error, Debug)]
pub enum TransitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path}: missing required columns: {}", missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("Unknown transport category: {0}")]
    UnknownCategory(String),

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for transit operations.
pub type TransitResult<T> = Result<T, TransitError>;

impl TransitError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
