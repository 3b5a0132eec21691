//! Error types for stavespace-core
//!
//! Provides a unified error type for the core data structures. Each
//! variant captures enough context for diagnostics without exposing
//! internal representation details.

use thiserror::Error;

/// Stavespace core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel data length does not match the declared dimensions
    #[error("pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Coordinate outside the raster bounds
    #[error("coordinate ({x}, {y}) out of bounds for {width}x{height} raster")]
    CoordinateOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    /// A row band with end before start
    #[error("invalid system band: start {start} > end {end}")]
    InvalidBand { start: u32, end: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
