//! Brightness and contrast remapping
//!
//! Both controls are percentages centered at 100 (no change). The
//! mapping is built once as a 256-entry lookup table and applied to
//! the color channels of every pixel; alpha is untouched.

use crate::{TransformError, TransformResult};
use stavespace_core::Raster;

/// A 256-entry lookup table mapping input to output channel values.
pub type ChannelLut = [u8; 256];

/// Build the brightness/contrast lookup table.
///
/// Brightness maps to an additive offset `(brightness - 100) * 2.55`;
/// contrast maps to the factor `f = 259(C + 255) / (255(259 - C))`
/// with `C = (contrast - 100) / 100 * 255`. Each channel becomes
/// `f * (v + offset - 128) + 128`, clamped to [0, 255].
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] unless both values
/// lie in [0, 200].
pub fn brightness_contrast_lut(brightness: f32, contrast: f32) -> TransformResult<ChannelLut> {
    if !(0.0..=200.0).contains(&brightness) {
        return Err(TransformError::InvalidParameters(format!(
            "brightness must be in 0..=200, got {brightness}"
        )));
    }
    if !(0.0..=200.0).contains(&contrast) {
        return Err(TransformError::InvalidParameters(format!(
            "contrast must be in 0..=200, got {contrast}"
        )));
    }

    let offset = (brightness - 100.0) * 2.55;
    let c = (contrast - 100.0) / 100.0 * 255.0;
    let factor = 259.0 * (c + 255.0) / (255.0 * (259.0 - c));

    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let mapped = factor * (i as f32 + offset - 128.0) + 128.0;
        *entry = mapped.round().clamp(0.0, 255.0) as u8;
    }
    Ok(lut)
}

/// Apply a brightness/contrast remap, returning a new raster.
///
/// Applied uniformly to every pixel's R, G, and B, independent of
/// alpha.
pub fn brightness_contrast(
    raster: &Raster,
    brightness: f32,
    contrast: f32,
) -> TransformResult<Raster> {
    let lut = brightness_contrast_lut(brightness, contrast)?;

    let mut out = raster.to_mut();
    for px in out.data_mut().chunks_exact_mut(4) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_settings_are_identity() {
        let lut = brightness_contrast_lut(100.0, 100.0).unwrap();
        for (i, &v) in lut.iter().enumerate() {
            assert_eq!(v as usize, i);
        }
    }

    #[test]
    fn test_brightness_shifts_values() {
        // +20% brightness adds 51 to every channel (pre-clamp)
        let lut = brightness_contrast_lut(120.0, 100.0).unwrap();
        assert_eq!(lut[100], 151);
        assert_eq!(lut[250], 255); // clamped
    }

    #[test]
    fn test_contrast_spreads_around_midpoint() {
        let lut = brightness_contrast_lut(100.0, 150.0).unwrap();
        // Midpoint is fixed, darks get darker, lights lighter
        assert_eq!(lut[128], 128);
        assert!(lut[64] < 64);
        assert!(lut[192] > 192);
    }

    #[test]
    fn test_parameters_out_of_range() {
        assert!(brightness_contrast_lut(-1.0, 100.0).is_err());
        assert!(brightness_contrast_lut(100.0, 201.0).is_err());
    }

    #[test]
    fn test_apply_leaves_alpha_untouched() {
        let raster = Raster::from_fn(2, 1, |_, _| [100, 100, 100, 200]).unwrap();
        let adjusted = brightness_contrast(&raster, 120.0, 100.0).unwrap();
        assert_eq!(adjusted.get_rgba(0, 0), Some((151, 151, 151, 200)));
    }

    #[test]
    fn test_source_raster_is_not_mutated() {
        let raster = Raster::from_fn(2, 2, |_, _| [100, 100, 100, 255]).unwrap();
        let _adjusted = brightness_contrast(&raster, 150.0, 100.0).unwrap();
        assert_eq!(raster.get_rgba(0, 0), Some((100, 100, 100, 255)));
    }
}
