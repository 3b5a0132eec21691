//! stavespace-io - External collaborator boundaries
//!
//! The two I/O seams of the pipeline:
//!
//! - **Input**: the [`PageRasterizer`] trait, through which document
//!   pages arrive as [`stavespace_core::Raster`]s, plus a
//!   [`CachingRasterizer`] wrapper and a [`PngPageSource`] backed by
//!   pre-rendered page images
//! - **Output**: [`compose`], which realizes a layout
//!   [`stavespace_layout::DrawPlan`] as PDF bytes
//!
//! Failures on either seam propagate to the caller unchanged; this
//! crate never retries.

mod error;
mod pdf;
mod png;
mod rasterizer;

pub use error::{IoError, IoResult};
pub use pdf::{PdfOptions, compose};
pub use png::{read_png, write_png};
pub use rasterizer::{
    ANALYSIS_SCALE, CachingRasterizer, PREVIEW_SCALE, PageRasterizer, PngPageSource,
};
