//! Rotation and rotation auto-detection
//!
//! Rotation resamples the source into an expanded, white-filled
//! bounding box so no content is lost at the corners. Auto-detection
//! searches for the corrective angle that maximizes the variance of
//! the rotated horizontal projection: perfectly horizontal staff
//! lines produce sharply peaked row-darkness profiles, while skew
//! smears the peaks and lowers the variance.
//!
//! # Algorithm (auto-detection)
//!
//! 1. **Coarse sweep**: scan candidate angles over the sweep range
//!    at the sweep step.
//! 2. **Refinement**: rescan a narrow span around the best candidate
//!    at a finer step.
//! 3. **Scoring**: darkness of sampled pixels is accumulated into
//!    per-row buckets after rotating the sample coordinates about the
//!    image center; the score is the variance of the bucket means.
//!
//! The search runs on a pre-shrunk copy with strided sampling purely
//! for speed; this changes the cost, not the contract.

use crate::scale::scale_to_max_dim;
use crate::{TransformError, TransformResult};
use log::debug;
use stavespace_core::Raster;

/// Below this magnitude (degrees) a rotation is treated as identity.
const MIN_ANGLE_TO_ROTATE: f32 = 0.001;

/// Options for the rotation search
#[derive(Debug, Clone)]
pub struct RotationSearchOptions {
    /// Half the sweep range in degrees (default: 3.0); the full sweep
    /// covers ±sweep_range
    pub sweep_range: f32,

    /// Angle increment for the sweep phase in degrees (default: 0.1)
    pub sweep_step: f32,

    /// Half-width of the refinement window in degrees (default: 0.2)
    pub refine_span: f32,

    /// Angle increment for the refinement phase in degrees (default: 0.05)
    pub refine_step: f32,

    /// Largest dimension of the working copy in pixels (default: 800)
    pub max_search_dim: u32,

    /// Sample every n-th pixel in both directions (default: 2)
    pub sample_stride: u32,
}

impl Default for RotationSearchOptions {
    fn default() -> Self {
        Self {
            sweep_range: 3.0,
            sweep_step: 0.1,
            refine_span: 0.2,
            refine_step: 0.05,
            max_search_dim: 800,
            sample_stride: 2,
        }
    }
}

impl RotationSearchOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep range (half the full range)
    pub fn with_sweep_range(mut self, range: f32) -> Self {
        self.sweep_range = range;
        self
    }

    /// Set the sweep step
    pub fn with_sweep_step(mut self, step: f32) -> Self {
        self.sweep_step = step;
        self
    }

    /// Set the sample stride
    pub fn with_sample_stride(mut self, stride: u32) -> Self {
        self.sample_stride = stride;
        self
    }

    /// Validate options
    pub fn validate(&self) -> TransformResult<()> {
        if self.sweep_range <= 0.0 {
            return Err(TransformError::InvalidParameters(
                "sweep_range must be positive".to_string(),
            ));
        }
        if self.sweep_step <= 0.0 || self.refine_step <= 0.0 {
            return Err(TransformError::InvalidParameters(
                "angle steps must be positive".to_string(),
            ));
        }
        if self.refine_span < self.refine_step {
            return Err(TransformError::InvalidParameters(
                "refine_span must cover at least one refine_step".to_string(),
            ));
        }
        if self.max_search_dim == 0 || self.sample_stride == 0 {
            return Err(TransformError::InvalidParameters(
                "max_search_dim and sample_stride must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rotate a raster about its center by `angle_deg` degrees.
///
/// The output bounding box expands to `w·|cos| + h·|sin|` by
/// `w·|sin| + h·|cos|` and uncovered pixels are white. Resampling is
/// bilinear. The transform itself accepts any angle; the ±5° limit of
/// the editing surface is a caller concern.
pub fn rotate(raster: &Raster, angle_deg: f32) -> TransformResult<Raster> {
    if angle_deg.abs() < MIN_ANGLE_TO_ROTATE {
        return Ok(raster.deep_clone());
    }

    let w = raster.width();
    let h = raster.height();
    let theta = angle_deg.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    let new_w = (w as f32 * cos_t.abs() + h as f32 * sin_t.abs()).ceil() as u32;
    let new_h = (w as f32 * sin_t.abs() + h as f32 * cos_t.abs()).ceil() as u32;

    let src_cx = w as f32 / 2.0;
    let src_cy = h as f32 / 2.0;
    let dst_cx = new_w as f32 / 2.0;
    let dst_cy = new_h as f32 / 2.0;

    let mut out = Raster::new(new_w, new_h)?.try_into_mut().unwrap();

    for dy in 0..new_h {
        let rel_y = dy as f32 + 0.5 - dst_cy;
        for dx in 0..new_w {
            let rel_x = dx as f32 + 0.5 - dst_cx;
            // Inverse mapping: rotate the destination coordinate back
            // into source space and sample there.
            let sx = cos_t * rel_x + sin_t * rel_y + src_cx - 0.5;
            let sy = -sin_t * rel_x + cos_t * rel_y + src_cy - 0.5;
            out.set_rgba_unchecked(dx, dy, sample_bilinear(raster, sx, sy));
        }
    }

    Ok(out.into())
}

/// Bilinear sample at fractional coordinates; neighbors outside the
/// raster contribute white.
fn sample_bilinear(raster: &Raster, x: f32, y: f32) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let fetch = |ix: f32, iy: f32| -> [f32; 4] {
        if ix < 0.0 || iy < 0.0 {
            return [255.0, 255.0, 255.0, 255.0];
        }
        match raster.get_rgba(ix as u32, iy as u32) {
            Some((r, g, b, a)) => [r as f32, g as f32, b as f32, a as f32],
            None => [255.0, 255.0, 255.0, 255.0],
        }
    };

    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1.0, y0);
    let p01 = fetch(x0, y0 + 1.0);
    let p11 = fetch(x0 + 1.0, y0 + 1.0);

    let mut result = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - fx) + p10[c] * fx;
        let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
        result[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    result
}

/// Search for the corrective rotation angle of a skewed page.
///
/// Returns the angle (degrees) that, applied through [`rotate`],
/// best aligns the page content horizontally. A page rotated by +2°
/// yields a result near −2°.
pub fn auto_detect_rotation(raster: &Raster) -> TransformResult<f32> {
    auto_detect_rotation_with_options(raster, &RotationSearchOptions::default())
}

/// [`auto_detect_rotation`] with explicit search options.
pub fn auto_detect_rotation_with_options(
    raster: &Raster,
    options: &RotationSearchOptions,
) -> TransformResult<f32> {
    options.validate()?;

    let working = scale_to_max_dim(raster, options.max_search_dim)?;
    let stride = options.sample_stride;

    // Phase 1: coarse sweep
    let steps = (2.0 * options.sweep_range / options.sweep_step).round() as i32;
    let mut best_angle = 0.0f32;
    let mut best_score = f64::MIN;
    for i in 0..=steps {
        let angle = -options.sweep_range + i as f32 * options.sweep_step;
        let score = projection_variance(&working, angle, stride);
        if score > best_score {
            best_score = score;
            best_angle = angle;
        }
    }

    // Phase 2: refinement around the sweep winner
    let refine_steps = (2.0 * options.refine_span / options.refine_step).round() as i32;
    let refine_start = best_angle - options.refine_span;
    for i in 0..=refine_steps {
        let angle = refine_start + i as f32 * options.refine_step;
        let score = projection_variance(&working, angle, stride);
        if score > best_score {
            best_score = score;
            best_angle = angle;
        }
    }

    debug!(
        "rotation search: best {:.2} deg (score {:.1}) on {}x{} working copy",
        best_angle,
        best_score,
        working.width(),
        working.height()
    );
    Ok(best_angle)
}

/// Variance of the horizontal projection after rotating the sample
/// coordinates by `angle_deg` about the image center.
fn projection_variance(raster: &Raster, angle_deg: f32, stride: u32) -> f64 {
    let w = raster.width();
    let h = raster.height();
    let theta = angle_deg.to_radians();
    let (sin_t, cos_t) = (theta.sin() as f64, theta.cos() as f64);
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;

    let mut sums = vec![0.0f64; h as usize];
    let mut counts = vec![0u32; h as usize];

    let mut y = 0;
    while y < h {
        let dy = y as f64 - cy;
        let mut x = 0;
        while x < w {
            let dx = x as f64 - cx;
            let rotated_row = cy + dx * sin_t + dy * cos_t;
            let bucket = rotated_row.round();
            if bucket >= 0.0 && (bucket as u32) < h {
                let darkness = 255.0 - raster.luminance_unchecked(x, y) as f64;
                sums[bucket as usize] += darkness;
                counts[bucket as usize] += 1;
            }
            x += stride;
        }
        y += stride;
    }

    // Variance of the per-bucket means, over buckets that received samples
    let mut means = Vec::with_capacity(h as usize);
    for (sum, count) in sums.iter().zip(counts.iter()) {
        if *count > 0 {
            means.push(sum / *count as f64);
        }
    }
    if means.len() < 2 {
        return 0.0;
    }
    let mean = means.iter().sum::<f64>() / means.len() as f64;
    means.iter().map(|m| (m - mean) * (m - mean)).sum::<f64>() / means.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_page(w: u32, h: u32, line_spacing: u32) -> Raster {
        Raster::from_fn(w, h, |x, y| {
            let in_margin = x < w / 10 || x >= w * 9 / 10;
            if !in_margin && y % line_spacing == 0 && y > 0 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        })
        .unwrap()
    }

    #[test]
    fn test_rotate_zero_angle_is_identity() {
        let raster = Raster::new(50, 60).unwrap();
        let rotated = rotate(&raster, 0.0).unwrap();
        assert_eq!(rotated.width(), 50);
        assert_eq!(rotated.height(), 60);
    }

    #[test]
    fn test_rotate_expands_bounding_box() {
        let raster = Raster::new(100, 200).unwrap();
        let rotated = rotate(&raster, 2.0).unwrap();
        assert!(rotated.width() > 100);
        assert!(rotated.height() > 200);

        // Exact expansion formula
        let theta = 2.0f32.to_radians();
        let expected_w = (100.0 * theta.cos().abs() + 200.0 * theta.sin().abs()).ceil() as u32;
        assert_eq!(rotated.width(), expected_w);
    }

    #[test]
    fn test_rotate_fills_corners_white() {
        // An all-black page rotated by 10 degrees leaves white wedges
        // in the expanded corners.
        let raster = Raster::from_fn(100, 100, |_, _| [0, 0, 0, 255]).unwrap();
        let rotated = rotate(&raster, 10.0).unwrap();
        assert_eq!(rotated.get_rgba(0, 0), Some((255, 255, 255, 255)));
        let center = rotated.get_rgba(rotated.width() / 2, rotated.height() / 2);
        assert_eq!(center, Some((0, 0, 0, 255)));
    }

    #[test]
    fn test_search_options_validation() {
        assert!(RotationSearchOptions::default().validate().is_ok());
        assert!(
            RotationSearchOptions::default()
                .with_sweep_range(-1.0)
                .validate()
                .is_err()
        );
        assert!(
            RotationSearchOptions::default()
                .with_sample_stride(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_detect_zero_rotation_on_level_page() {
        let page = staff_page(400, 400, 30);
        let angle = auto_detect_rotation(&page).unwrap();
        assert!(
            angle.abs() < 0.1,
            "expected near-zero angle, got {angle}"
        );
    }

    #[test]
    fn test_detect_corrective_angle_for_skewed_page() {
        let page = staff_page(400, 400, 30);
        let skewed = rotate(&page, 2.0).unwrap();
        let angle = auto_detect_rotation(&skewed).unwrap();
        assert!(
            (angle + 2.0).abs() <= 0.1,
            "expected about -2 degrees, got {angle}"
        );
    }

    #[test]
    fn test_rotation_roundtrip_realigns_content() {
        let page = staff_page(300, 300, 30);
        let there = rotate(&page, 2.0).unwrap();
        let back = rotate(&there, -2.0).unwrap();
        // The restored page should again score as level.
        let angle = auto_detect_rotation(&back).unwrap();
        assert!(
            angle.abs() <= 0.1,
            "round-trip should realign content, residual angle {angle}"
        );
    }
}
