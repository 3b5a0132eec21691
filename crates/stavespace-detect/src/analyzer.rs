//! Hybrid projection analysis
//!
//! The detection pipeline, in order:
//!
//! 1. Margin profile over the left fraction of the width, where
//!    system braces and brackets concentrate.
//! 2. Threshold/hysteresis segmentation of the margin profile at the
//!    scaled threshold.
//! 3. Minimum-height filtering of the resulting bands.
//! 4. Full-width profile, computed unconditionally.
//! 5. Fallback: if the margin pass produced nothing (a page without
//!    visible braces, or a single-staff part), the identical
//!    segmentation runs on the full profile at the unscaled
//!    threshold.
//! 6. Boundary refinement of every surviving band against the full
//!    profile.
//!
//! The analyzer is pure: repeated calls on the same raster and
//! options yield identical profiles and systems.

use crate::DetectResult;
use crate::options::DetectOptions;
use crate::refine::refine_boundaries;
use crate::segment::{filter_min_height, segment_bands};
use log::debug;
use stavespace_core::{DARK_LUMINANCE_CUTOFF, DarknessProfile, Raster, System};

/// Analysis output: both profiles plus the detected systems.
#[derive(Debug, Clone)]
pub struct PageProjection {
    /// Full-width darkness profile
    pub full: DarknessProfile,
    /// Left-margin darkness profile
    pub margin: DarknessProfile,
    /// Detected systems, sorted by start row, non-overlapping
    pub systems: Vec<System>,
}

impl PageProjection {
    /// Full profile as percentages of the page width.
    pub fn normalized_full(&self) -> Vec<f32> {
        self.full.normalized()
    }

    /// Margin profile as percentages of the margin width.
    pub fn normalized_margin(&self) -> Vec<f32> {
        self.margin.normalized()
    }
}

/// Count dark pixels per row over the left `ratio` fraction of the
/// width.
fn margin_profile(raster: &Raster, ratio: f32) -> DarknessProfile {
    let width = raster.width();
    let margin_width = ((width as f32 * ratio) as u32).clamp(1, width);
    profile_over_columns(raster, margin_width)
}

/// Count dark pixels per row over the full width.
fn full_profile(raster: &Raster) -> DarknessProfile {
    profile_over_columns(raster, raster.width())
}

fn profile_over_columns(raster: &Raster, columns: u32) -> DarknessProfile {
    let mut counts = Vec::with_capacity(raster.height() as usize);
    for y in 0..raster.height() {
        let mut dark = 0u32;
        for x in 0..columns {
            if raster.luminance_unchecked(x, y) < DARK_LUMINANCE_CUTOFF {
                dark += 1;
            }
        }
        counts.push(dark);
    }
    // columns >= 1 by construction
    DarknessProfile::new(counts, columns).unwrap()
}

/// Detect system bands on a page raster.
///
/// Returns the margin and full profiles alongside the refined
/// systems. Zero-dimension buffers cannot reach this function -
/// `Raster` construction already rejects them.
///
/// # Errors
///
/// Returns [`crate::DetectError::InvalidParameter`] if `options` does
/// not validate.
///
/// # Example
///
/// ```
/// use stavespace_core::Raster;
/// use stavespace_detect::{DetectOptions, analyze};
///
/// let page = Raster::new(200, 400).unwrap();
/// let projection = analyze(&page, &DetectOptions::default()).unwrap();
/// assert!(projection.systems.is_empty()); // a blank page has none
/// ```
pub fn analyze(raster: &Raster, options: &DetectOptions) -> DetectResult<PageProjection> {
    options.validate()?;

    // Steps 1-3: margin detection
    let margin = margin_profile(raster, options.left_margin_ratio);
    let margin_threshold = options.threshold_percent * options.margin_threshold_factor;
    let margin_bands = segment_bands(&margin.normalized(), margin_threshold, options.min_gap_rows);
    let mut systems = filter_min_height(margin_bands, options.min_system_height);

    // Step 4: full profile, needed for refinement regardless
    let full = full_profile(raster);

    // Step 5: full-width fallback at the unscaled threshold
    let mut from_fallback = false;
    if systems.is_empty() {
        let full_bands =
            segment_bands(&full.normalized(), options.threshold_percent, options.min_gap_rows);
        systems = filter_min_height(full_bands, options.min_system_height);
        from_fallback = true;
    }

    // Step 6: boundary refinement
    let systems = refine_boundaries(&systems, &full, options.refine_pad);

    debug!(
        "analyzed {}x{} page: {} systems{}",
        raster.width(),
        raster.height(),
        systems.len(),
        if from_fallback { " (full-profile fallback)" } else { "" }
    );

    Ok(PageProjection {
        full,
        margin,
        systems,
    })
}
