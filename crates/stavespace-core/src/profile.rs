//! Darkness profiles
//!
//! A [`DarknessProfile`] is the 1-D horizontal projection of a page
//! raster: for every row, the number of pixels whose luminance falls
//! below the darkness cutoff. Two variants exist per page - a margin
//! profile computed over only the left fraction of the width (where
//! system braces and brackets live) and a full-width profile used for
//! boundary refinement. Both are derived from the raster they
//! describe and never persisted independently.

use crate::error::{Error, Result};

/// Luminance cutoff below which a pixel counts as dark.
pub const DARK_LUMINANCE_CUTOFF: u8 = 128;

/// Per-row dark-pixel counts with the sample width they were taken over.
///
/// The sample width is the number of columns scanned per row (the
/// margin width for margin profiles, the full raster width otherwise)
/// and is the denominator for normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct DarknessProfile {
    counts: Vec<u32>,
    sample_width: u32,
}

impl DarknessProfile {
    /// Create a profile from raw per-row counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `sample_width` is 0.
    pub fn new(counts: Vec<u32>, sample_width: u32) -> Result<Self> {
        if sample_width == 0 {
            return Err(Error::InvalidParameter(
                "profile sample width must be positive".to_string(),
            ));
        }
        Ok(DarknessProfile {
            counts,
            sample_width,
        })
    }

    /// Number of rows in the profile.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if the profile covers no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The raw dark count for row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= len()`.
    #[inline]
    pub fn count(&self, y: usize) -> u32 {
        self.counts[y]
    }

    /// All raw per-row counts.
    #[inline]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The number of columns scanned per row.
    #[inline]
    pub fn sample_width(&self) -> u32 {
        self.sample_width
    }

    /// The dark count for row `y` as a percentage of the sample width.
    #[inline]
    pub fn normalized_at(&self, y: usize) -> f32 {
        self.counts[y] as f32 / self.sample_width as f32 * 100.0
    }

    /// All per-row counts as percentages of the sample width (0-100).
    pub fn normalized(&self) -> Vec<f32> {
        self.counts
            .iter()
            .map(|&c| c as f32 / self.sample_width as f32 * 100.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sample_width_rejected() {
        assert!(DarknessProfile::new(vec![1, 2, 3], 0).is_err());
    }

    #[test]
    fn test_normalization() {
        let profile = DarknessProfile::new(vec![0, 50, 200], 200).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.normalized(), vec![0.0, 25.0, 100.0]);
        assert_eq!(profile.normalized_at(1), 25.0);
        assert_eq!(profile.count(2), 200);
    }

    #[test]
    fn test_empty_profile() {
        let profile = DarknessProfile::new(Vec::new(), 10).unwrap();
        assert!(profile.is_empty());
        assert!(profile.normalized().is_empty());
    }
}
