//! stavespace-transform - Geometric and tonal transforms
//!
//! This crate provides the pre-processing transforms that feed the
//! projection analyzer:
//!
//! - Rotation with an expanded white-filled bounding box, plus
//!   rotation auto-detection (projection-variance search)
//! - Signed cropping (negative offsets add white margin) and content
//!   margin auto-detection
//! - Brightness/contrast remapping
//! - Nearest-neighbor scaling helpers
//!
//! All transforms are pure `&Raster -> Raster` functions; none
//! mutates its source, so a live preview can be rendered without
//! committing the edit.

mod crop;
mod enhance;
mod error;
mod rotate;
mod scale;

pub use crop::{CropOffsets, auto_detect_margins, crop};
pub use enhance::{ChannelLut, brightness_contrast, brightness_contrast_lut};
pub use error::{TransformError, TransformResult};
pub use rotate::{
    RotationSearchOptions, auto_detect_rotation, auto_detect_rotation_with_options, rotate,
};
pub use scale::{scale_by_sampling, scale_to_max_dim};
