//! Draw plans
//!
//! The layout engine's output: an ordered list of output pages, each
//! holding images placed in output-page points. Coordinates follow
//! the PDF convention (origin bottom-left, y increasing upward), so
//! the composer can consume placements verbatim. A plan is consumed
//! once by the PDF composer and then discarded.

use stavespace_core::Raster;

/// One image placed on an output page, in page points.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub image: Raster,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One output page of the plan.
#[derive(Debug, Clone, Default)]
pub struct PlannedPage {
    pub images: Vec<PlacedImage>,
}

/// Watermark styling, uniform across every page of a plan.
#[derive(Debug, Clone)]
pub struct Watermark {
    /// The text drawn bottom-right near the page edge
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Text gray level, 0.0 black to 1.0 white
    pub gray: f32,
    /// Fill opacity, 0.0 transparent to 1.0 opaque
    pub opacity: f32,
    /// Baseline height above the page bottom, in points
    pub baseline: f32,
}

impl Watermark {
    /// Standard small, low-opacity watermark.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 7.0,
            gray: 0.65,
            opacity: 0.7,
            baseline: 12.0,
        }
    }
}

/// The complete page-by-page draw plan for one export run.
#[derive(Debug, Clone)]
pub struct DrawPlan {
    /// Output page size in points (uniform across the plan)
    pub page_width: f32,
    pub page_height: f32,
    /// Right margin, used to anchor the watermark
    pub margin_right: f32,
    /// The output pages, in order
    pub pages: Vec<PlannedPage>,
    /// Watermark applied to every page, if enabled
    pub watermark: Option<Watermark>,
}

impl DrawPlan {
    /// Total number of placed images across all pages.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }
}
