//! Detection options

use crate::{DetectError, DetectResult};

/// Options for projection-profile system detection
///
/// The margin threshold factor, refinement pad, and minimum system
/// height are tunable rather than inlined; their defaults reproduce
/// the stock detection behavior.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Percentage of dark pixels at or above which a row counts as
    /// system content (default: 5.0). Lower is more permissive.
    pub threshold_percent: f32,

    /// Minimum run of below-threshold rows that counts as a real gap
    /// between systems rather than intra-system whitespace
    /// (default: 30).
    pub min_gap_rows: u32,

    /// Fraction of the page width scanned for the margin profile,
    /// where system braces and brackets live (default: 0.12).
    pub left_margin_ratio: f32,

    /// Multiplier applied to the threshold when segmenting the margin
    /// profile; margins carry denser ink than body staff lines, so a
    /// higher cutoff reduces false positives (default: 1.5).
    pub margin_threshold_factor: f32,

    /// Detected bands shorter than this many rows are discarded;
    /// user-created systems are exempt (default: 50).
    pub min_system_height: u32,

    /// Safety padding added above and below each refined band,
    /// clamped to the raster bounds (default: 5).
    pub refine_pad: u32,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            threshold_percent: 5.0,
            min_gap_rows: 30,
            left_margin_ratio: 0.12,
            margin_threshold_factor: 1.5,
            min_system_height: 50,
            refine_pad: 5,
        }
    }
}

impl DetectOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the detection threshold (percent)
    pub fn with_threshold_percent(mut self, threshold: f32) -> Self {
        self.threshold_percent = threshold;
        self
    }

    /// Set the minimum gap between systems (rows)
    pub fn with_min_gap_rows(mut self, rows: u32) -> Self {
        self.min_gap_rows = rows;
        self
    }

    /// Set the left margin ratio
    pub fn with_left_margin_ratio(mut self, ratio: f32) -> Self {
        self.left_margin_ratio = ratio;
        self
    }

    /// Set the margin threshold factor
    pub fn with_margin_threshold_factor(mut self, factor: f32) -> Self {
        self.margin_threshold_factor = factor;
        self
    }

    /// Set the minimum surviving system height (rows)
    pub fn with_min_system_height(mut self, rows: u32) -> Self {
        self.min_system_height = rows;
        self
    }

    /// Set the refinement safety pad (rows)
    pub fn with_refine_pad(mut self, rows: u32) -> Self {
        self.refine_pad = rows;
        self
    }

    /// Validate options
    pub fn validate(&self) -> DetectResult<()> {
        if !(self.threshold_percent > 0.0 && self.threshold_percent <= 100.0) {
            return Err(DetectError::InvalidParameter(
                "threshold_percent must be in (0, 100]".to_string(),
            ));
        }
        if self.min_gap_rows == 0 {
            return Err(DetectError::InvalidParameter(
                "min_gap_rows must be positive".to_string(),
            ));
        }
        if !(self.left_margin_ratio > 0.0 && self.left_margin_ratio <= 1.0) {
            return Err(DetectError::InvalidParameter(
                "left_margin_ratio must be in (0, 1]".to_string(),
            ));
        }
        if self.margin_threshold_factor <= 0.0 {
            return Err(DetectError::InvalidParameter(
                "margin_threshold_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = DetectOptions::default();
        assert!((opts.threshold_percent - 5.0).abs() < f32::EPSILON);
        assert_eq!(opts.min_gap_rows, 30);
        assert!((opts.left_margin_ratio - 0.12).abs() < f32::EPSILON);
        assert!((opts.margin_threshold_factor - 1.5).abs() < f32::EPSILON);
        assert_eq!(opts.min_system_height, 50);
        assert_eq!(opts.refine_pad, 5);
    }

    #[test]
    fn test_validation() {
        assert!(DetectOptions::default().validate().is_ok());
        assert!(
            DetectOptions::default()
                .with_threshold_percent(0.0)
                .validate()
                .is_err()
        );
        assert!(
            DetectOptions::default()
                .with_left_margin_ratio(1.5)
                .validate()
                .is_err()
        );
        assert!(
            DetectOptions::default()
                .with_min_gap_rows(0)
                .validate()
                .is_err()
        );
    }
}
