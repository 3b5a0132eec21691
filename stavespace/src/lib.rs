//! Stavespace - re-space scanned music scores for annotation
//!
//! Takes a rasterized score, detects the horizontal band each
//! musical system occupies on every page, lets the caller correct
//! those bands, and re-renders the score onto fresh A4 pages with
//! configurable whitespace between systems.
//!
//! # Pipeline
//!
//! ```text
//! page raster -> [rotate / crop / brightness] -> projection analysis
//!             -> manual system edits -> layout -> PDF bytes
//! ```
//!
//! # Example
//!
//! ```
//! use stavespace::{Raster, ScoreSession};
//!
//! // One blank page: no systems are detected, so it exports as a
//! // verbatim full-page image.
//! let mut session = ScoreSession::from_rasters(vec![Raster::new(400, 600).unwrap()]);
//! session.analyze_all().unwrap();
//! let pdf = session.export().unwrap();
//! assert!(pdf.starts_with(b"%PDF-"));
//! ```

mod error;
mod session;

// Re-export core types (the data structures used everywhere)
pub use stavespace_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use stavespace_detect as detect;
pub use stavespace_io as io;
pub use stavespace_layout as layout;
pub use stavespace_transform as transform;

pub use error::{SessionError, SessionResult};
pub use session::{PageAnalysis, PageSetting, ScoreSession, TransformLog};
