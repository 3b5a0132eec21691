//! Error types for stavespace-detect

use thiserror::Error;

/// Errors that can occur during system detection
#[derive(Debug, Error)]
pub enum DetectError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stavespace_core::Error),

    /// Invalid detection parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for detection operations
pub type DetectResult<T> = Result<T, DetectError>;
