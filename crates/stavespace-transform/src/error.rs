//! Error types for stavespace-transform

use thiserror::Error;

/// Errors that can occur during raster transforms
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stavespace_core::Error),

    /// A crop or transform would produce a non-positive-dimension buffer.
    ///
    /// Surfaced before any buffer allocation, never silently clamped.
    #[error("invalid size: transform would produce a {width}x{height} buffer")]
    InvalidGeometry { width: i64, height: i64 },

    /// Invalid scale factor
    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(String),

    /// Invalid transform parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
