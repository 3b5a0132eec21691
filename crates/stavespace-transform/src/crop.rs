//! Cropping and margin auto-detection
//!
//! Crop offsets are signed: positive values remove rows/columns from
//! the corresponding edge, negative values add that much white margin
//! instead. A crop that would produce a non-positive dimension is
//! rejected before any allocation.

use crate::{TransformError, TransformResult};
use log::debug;
use stavespace_core::Raster;

/// Channel value at or above which a pixel counts as background white
/// during margin auto-detection.
const NON_WHITE_CUTOFF: u8 = 250;

/// Padding added around the detected content box, in pixels.
const CONTENT_BOX_PAD: u32 = 20;

/// Signed per-edge crop amounts in pixels.
///
/// Positive trims, negative adds white margin. Cropping by an offset
/// set and then by its negation restores the original dimensions
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropOffsets {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl CropOffsets {
    /// Create offsets for all four edges.
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Offsets that undo these offsets.
    pub fn negated(&self) -> Self {
        Self {
            top: -self.top,
            bottom: -self.bottom,
            left: -self.left,
            right: -self.right,
        }
    }

    /// True if applying these offsets is the identity.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Crop a raster by signed per-edge offsets.
///
/// # Errors
///
/// Returns [`TransformError::InvalidGeometry`] if the resulting
/// width or height would not be strictly positive. The check runs
/// before any buffer allocation and is never silently clamped.
pub fn crop(raster: &Raster, offsets: CropOffsets) -> TransformResult<Raster> {
    let new_w = raster.width() as i64 - offsets.left as i64 - offsets.right as i64;
    let new_h = raster.height() as i64 - offsets.top as i64 - offsets.bottom as i64;
    if new_w <= 0 || new_h <= 0 {
        return Err(TransformError::InvalidGeometry {
            width: new_w,
            height: new_h,
        });
    }

    let src_w = raster.width() as i64;
    let src_h = raster.height() as i64;
    let mut out = Raster::new(new_w as u32, new_h as u32)?.try_into_mut().unwrap();

    for dy in 0..new_h {
        let sy = dy + offsets.top as i64;
        if sy < 0 || sy >= src_h {
            continue; // added margin row stays white
        }
        for dx in 0..new_w {
            let sx = dx + offsets.left as i64;
            if sx < 0 || sx >= src_w {
                continue;
            }
            let (r, g, b, a) = raster.get_rgba_unchecked(sx as u32, sy as u32);
            out.set_rgba_unchecked(dx as u32, dy as u32, [r, g, b, a]);
        }
    }

    Ok(out.into())
}

/// Find the crop offsets that trim a page to its content.
///
/// Scans for the bounding box of non-white content (any color channel
/// below 250), pads it by 20 px per side clamped to the raster
/// bounds, and reports the four positive crop values that would trim
/// to exactly that padded box. An all-white page reports zero
/// offsets.
pub fn auto_detect_margins(raster: &Raster) -> CropOffsets {
    let w = raster.width();
    let h = raster.height();

    let mut min_x = w;
    let mut max_x = 0u32;
    let mut min_y = h;
    let mut max_y = 0u32;
    let mut found = false;

    for y in 0..h {
        let row = raster.row(y);
        for x in 0..w {
            let i = x as usize * 4;
            if row[i] < NON_WHITE_CUTOFF
                || row[i + 1] < NON_WHITE_CUTOFF
                || row[i + 2] < NON_WHITE_CUTOFF
            {
                found = true;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    if !found {
        return CropOffsets::default();
    }

    let box_left = min_x.saturating_sub(CONTENT_BOX_PAD);
    let box_top = min_y.saturating_sub(CONTENT_BOX_PAD);
    let box_right = (max_x + CONTENT_BOX_PAD).min(w - 1);
    let box_bottom = (max_y + CONTENT_BOX_PAD).min(h - 1);

    let offsets = CropOffsets {
        top: box_top as i32,
        bottom: (h - 1 - box_bottom) as i32,
        left: box_left as i32,
        right: (w - 1 - box_right) as i32,
    };
    debug!(
        "content box ({min_x},{min_y})..({max_x},{max_y}) on {w}x{h} -> {offsets:?}"
    );
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_trims_edges() {
        let raster = Raster::from_fn(100, 80, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
        let cropped = crop(&raster, CropOffsets::new(10, 10, 5, 5)).unwrap();
        assert_eq!(cropped.width(), 90);
        assert_eq!(cropped.height(), 60);
        // Pixel (0, 0) of the crop is pixel (5, 10) of the source
        assert_eq!(cropped.get_rgba(0, 0), Some((5, 10, 0, 255)));
    }

    #[test]
    fn test_negative_offsets_add_white_margin() {
        let raster = Raster::from_fn(10, 10, |_, _| [0, 0, 0, 255]).unwrap();
        let padded = crop(&raster, CropOffsets::new(-5, -5, -5, -5)).unwrap();
        assert_eq!(padded.width(), 20);
        assert_eq!(padded.height(), 20);
        assert_eq!(padded.get_rgba(0, 0), Some((255, 255, 255, 255)));
        assert_eq!(padded.get_rgba(7, 7), Some((0, 0, 0, 255)));
    }

    #[test]
    fn test_crop_uncrop_restores_dimensions() {
        let raster = Raster::new(200, 300).unwrap();
        let offsets = CropOffsets::new(10, 10, 5, 5);
        let cropped = crop(&raster, offsets).unwrap();
        let restored = crop(&cropped, offsets.negated()).unwrap();
        assert_eq!(restored.width(), 200);
        assert_eq!(restored.height(), 300);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let raster = Raster::new(20, 20).unwrap();
        let err = crop(&raster, CropOffsets::new(10, 10, 0, 0));
        assert!(matches!(
            err,
            Err(TransformError::InvalidGeometry { height: 0, .. })
        ));

        let err = crop(&raster, CropOffsets::new(0, 0, 15, 15));
        assert!(matches!(
            err,
            Err(TransformError::InvalidGeometry { width: -10, .. })
        ));
    }

    #[test]
    fn test_auto_detect_margins_pads_content_box() {
        // Content occupies x 100..=199, y 150..=249 on a 400x500 page
        let raster = Raster::from_fn(400, 500, |x, y| {
            if (100..200).contains(&x) && (150..250).contains(&y) {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        })
        .unwrap();

        let offsets = auto_detect_margins(&raster);
        assert_eq!(offsets.left, 80); // 100 - 20
        assert_eq!(offsets.top, 130); // 150 - 20
        assert_eq!(offsets.right, 400 - 1 - (199 + 20)); // 180
        assert_eq!(offsets.bottom, 500 - 1 - (249 + 20)); // 230
    }

    #[test]
    fn test_auto_detect_margins_blank_page() {
        let raster = Raster::new(100, 100).unwrap();
        assert!(auto_detect_margins(&raster).is_zero());
    }

    #[test]
    fn test_auto_detect_margins_content_at_edge() {
        // Content touching the corner: padding clamps to the bounds
        let raster = Raster::from_fn(100, 100, |x, y| {
            if x < 10 && y < 10 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        })
        .unwrap();
        let offsets = auto_detect_margins(&raster);
        assert_eq!(offsets.left, 0);
        assert_eq!(offsets.top, 0);
        assert_eq!(offsets.right, 100 - 1 - 29);
        assert_eq!(offsets.bottom, 100 - 1 - 29);
    }
}
