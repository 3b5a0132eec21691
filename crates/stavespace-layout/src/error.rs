//! Error types for stavespace-layout

use thiserror::Error;

/// Errors that can occur during layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stavespace_core::Error),

    /// Export was requested with zero pages marked for export.
    ///
    /// Surfaced before any composition starts; no partial output is
    /// produced.
    #[error("nothing to export: no pages are marked for export")]
    EmptyExportSet,

    /// Invalid layout parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
