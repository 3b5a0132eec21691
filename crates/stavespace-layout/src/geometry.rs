//! Output page geometry and layout options

use crate::{LayoutError, LayoutResult};

/// ISO A4 width in PDF points (210 mm at 72 points per inch).
pub const A4_WIDTH_PT: f32 = 595.28;

/// ISO A4 height in PDF points (297 mm at 72 points per inch).
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Default margin on all four sides, in points.
pub const DEFAULT_MARGIN_PT: f32 = 40.0;

/// Fixed output page dimensions and margins, in points.
///
/// The content area (page minus margins) is what systems are fitted
/// into; its width is the fit target, its height bounds each page's
/// packing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margin_top: DEFAULT_MARGIN_PT,
            margin_bottom: DEFAULT_MARGIN_PT,
            margin_left: DEFAULT_MARGIN_PT,
            margin_right: DEFAULT_MARGIN_PT,
        }
    }
}

impl PageGeometry {
    /// A4 with the default margins.
    pub fn a4() -> Self {
        Self::default()
    }

    /// Set all four margins to the same value.
    pub fn with_margins(mut self, margin: f32) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }

    /// Usable width between the left and right margins.
    #[inline]
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Usable height between the top and bottom margins.
    #[inline]
    pub fn content_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Validate the geometry
    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(LayoutError::InvalidParameters(format!(
                "page size must be positive: {}x{}",
                self.width, self.height
            )));
        }
        if self.margin_top < 0.0
            || self.margin_bottom < 0.0
            || self.margin_left < 0.0
            || self.margin_right < 0.0
        {
            return Err(LayoutError::InvalidParameters(
                "margins must be non-negative".to_string(),
            ));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(LayoutError::InvalidParameters(
                "margins leave no content area".to_string(),
            ));
        }
        Ok(())
    }
}

/// Layout options
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    /// Whitespace inserted between consecutive systems on the same
    /// output page, in source pixels at detection scale. Converted to
    /// points through the same width-fit factor applied to the
    /// systems themselves.
    pub spacing_px: f32,

    /// Watermark text, rendered bottom-right on every output page;
    /// `None` disables the watermark.
    pub watermark: Option<String>,
}

/// Default inter-system spacing in source pixels.
pub const DEFAULT_SPACING_PX: f32 = 150.0;

impl LayoutOptions {
    /// Options with the default spacing and no watermark.
    pub fn new() -> Self {
        Self {
            spacing_px: DEFAULT_SPACING_PX,
            watermark: None,
        }
    }

    /// Set the inter-system spacing (source pixels)
    pub fn with_spacing_px(mut self, spacing: f32) -> Self {
        self.spacing_px = spacing;
        self
    }

    /// Enable the watermark with the given text
    pub fn with_watermark(mut self, text: impl Into<String>) -> Self {
        self.watermark = Some(text.into());
        self
    }

    /// Validate the options
    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.spacing_px >= 0.0 && self.spacing_px.is_finite()) {
            return Err(LayoutError::InvalidParameters(format!(
                "spacing must be non-negative, got {}",
                self.spacing_px
            )));
        }
        Ok(())
    }
}
