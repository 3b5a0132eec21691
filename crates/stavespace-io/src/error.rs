//! Error types for stavespace-io

use thiserror::Error;

/// Errors from the I/O boundary: page rasterization and PDF
/// composition. Failures here propagate to the caller unchanged;
/// the core never retries rasterization or composition internally.
#[derive(Debug, Error)]
pub enum IoError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stavespace_core::Error),

    /// Transform error (page rescaling between tiers)
    #[error("transform error: {0}")]
    Transform(#[from] stavespace_transform::TransformError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Page index outside the document
    #[error("page {page} out of range: document has {count} pages")]
    PageOutOfRange { page: usize, count: usize },

    /// Invalid input data
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Image decode error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Image or document encode error
    #[error("encode error: {0}")]
    EncodeError(String),
}

/// Result type alias for I/O operations
pub type IoResult<T> = std::result::Result<T, IoError>;
