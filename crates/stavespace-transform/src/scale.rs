//! Scaling by pixel sampling
//!
//! Nearest-neighbor scaling, used for preview-tier rasters and to
//! shrink the working copy for the rotation search. Quality is not a
//! concern at these call sites; speed is.

use crate::{TransformError, TransformResult};
use stavespace_core::Raster;

/// Scale a raster by independent x/y factors using nearest-neighbor
/// sampling.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] unless both factors
/// are finite and positive.
pub fn scale_by_sampling(raster: &Raster, sx: f32, sy: f32) -> TransformResult<Raster> {
    if !(sx.is_finite() && sx > 0.0 && sy.is_finite() && sy > 0.0) {
        return Err(TransformError::InvalidScaleFactor(format!(
            "factors must be positive: ({sx}, {sy})"
        )));
    }

    let src_w = raster.width();
    let src_h = raster.height();
    let dst_w = ((src_w as f32 * sx).round() as u32).max(1);
    let dst_h = ((src_h as f32 * sy).round() as u32).max(1);

    let mut out = Raster::new(dst_w, dst_h)?.try_into_mut().unwrap();
    for dy in 0..dst_h {
        let sy_px = ((dy as f32 / sy) as u32).min(src_h - 1);
        for dx in 0..dst_w {
            let sx_px = ((dx as f32 / sx) as u32).min(src_w - 1);
            let (r, g, b, a) = raster.get_rgba_unchecked(sx_px, sy_px);
            out.set_rgba_unchecked(dx, dy, [r, g, b, a]);
        }
    }

    Ok(out.into())
}

/// Shrink a raster so that its larger dimension does not exceed
/// `max_dim`, preserving aspect ratio. Rasters already within the
/// limit are returned as an independent copy.
pub fn scale_to_max_dim(raster: &Raster, max_dim: u32) -> TransformResult<Raster> {
    if max_dim == 0 {
        return Err(TransformError::InvalidScaleFactor(
            "max dimension must be positive".to_string(),
        ));
    }
    let largest = raster.width().max(raster.height());
    if largest <= max_dim {
        return Ok(raster.deep_clone());
    }
    let factor = max_dim as f32 / largest as f32;
    scale_by_sampling(raster, factor, factor)
}
