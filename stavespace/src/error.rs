//! Session-level error type
//!
//! Wraps the error taxonomy of the domain crates and adds the
//! precondition rejections of the editing surface. Every failure is
//! all-or-nothing at operation granularity: a failed transform,
//! edit, or export leaves the session in its previous state.

use thiserror::Error;

/// Errors surfaced by [`crate::ScoreSession`] operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stavespace_core::Error),

    /// Transform error, including invalid crop geometry
    #[error(transparent)]
    Transform(#[from] stavespace_transform::TransformError),

    /// Detection error
    #[error(transparent)]
    Detect(#[from] stavespace_detect::DetectError),

    /// Layout error, including the empty export set
    #[error(transparent)]
    Layout(#[from] stavespace_layout::LayoutError),

    /// Rasterization or composition failure, propagated unchanged
    #[error(transparent)]
    Io(#[from] stavespace_io::IoError),

    /// Page index outside the loaded document
    #[error("page {page} out of range: session has {count} pages")]
    PageOutOfRange { page: usize, count: usize },

    /// A system edit that would violate the band invariants
    #[error("invalid edit: {0}")]
    InvalidEdit(String),
}

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;
