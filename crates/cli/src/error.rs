//! Error types for CLI operations.

use contracts::{CodecError, ConfigError, ValidationFailure};
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Option file not found
    #[error("Option file not found: {path}")]
    ConfigNotFound { path: String },

    /// Options could not be loaded or parsed into records
    #[error("Failed to load options: {0}")]
    Config(#[from] ConfigError),

    /// Records violate their invariants
    #[error("Validation failed with {count} diagnostic(s)")]
    Validation { count: usize },

    /// Encode or decode failed
    #[error("Wire codec error: {0}")]
    Codec(#[from] CodecError),

    /// Decoded records differ from the originals
    #[error("{failures} of {total} payload(s) did not round trip")]
    RoundTrip { failures: u64, total: u64 },

    /// Worker task panicked or was cancelled
    #[error("Worker task failed: {message}")]
    Task { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<ValidationFailure> for CliError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation {
            count: failure.diagnostics.len(),
        }
    }
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
