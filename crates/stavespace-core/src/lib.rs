//! stavespace-core - Core data structures for score re-spacing
//!
//! This crate holds the data model shared by every stavespace stage:
//!
//! - [`Raster`]: the RGBA page pixel buffer (immutable, `Arc`-shared,
//!   with an exclusive [`RasterMut`] form for construction)
//! - [`DarknessProfile`]: 1-D horizontal projection of a raster
//! - [`System`]: one detected or user-edited band of rows
//!
//! The algorithms live in the domain crates (`stavespace-transform`,
//! `stavespace-detect`, `stavespace-layout`, `stavespace-io`).

mod band;
mod error;
mod profile;
mod raster;

pub use band::{System, sort_systems};
pub use error::{Error, Result};
pub use profile::{DARK_LUMINANCE_CUTOFF, DarknessProfile};
pub use raster::{Raster, RasterMut, WHITE};
