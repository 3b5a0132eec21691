//! Layout input and the items the packer consumes
//!
//! A [`PageContent`] record is what the application hands over per
//! source page. The engine flattens the exported records into
//! [`LayoutItem`]s: one image strip per system, or a single verbatim
//! full-page image where detection was disabled.

use stavespace_core::{Raster, System};

/// Per-source-page layout input.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// The page raster at export scale
    pub raster: Raster,
    /// Detected or user-edited systems, sorted by start row
    pub systems: Vec<System>,
    /// False marks the page as verbatim: embedded whole rather than
    /// decomposed into systems
    pub detect: bool,
    /// False excludes the page from the output entirely
    pub export: bool,
}

impl PageContent {
    /// A page carried verbatim (no system decomposition).
    pub fn verbatim(raster: Raster) -> Self {
        Self {
            raster,
            systems: Vec::new(),
            detect: false,
            export: true,
        }
    }

    /// A page with detected systems.
    pub fn with_systems(raster: Raster, systems: Vec<System>) -> Self {
        Self {
            raster,
            systems,
            detect: true,
            export: true,
        }
    }
}

/// One unit of packing work, constructed fresh per export run.
#[derive(Debug)]
pub enum LayoutItem {
    /// A system extracted as its own image strip with its height
    /// already fitted to output units
    Strip { image: Raster, fitted_height: f32 },
    /// An entire source page embedded verbatim
    FullPage { image: Raster },
}

/// Extract a system band as a full-width image strip.
///
/// Rows `start..=end` (clamped to the raster) are copied and
/// alpha-composited over white, so transparent rasterizer output
/// cannot leave artifacts in the assembled PDF.
pub fn extract_strip(raster: &Raster, system: &System) -> Raster {
    let last_row = raster.height() - 1;
    let start = system.start.min(last_row);
    let end = system.end.min(last_row);
    let width = raster.width();

    let mut strip = Raster::new(width, end - start + 1).unwrap().try_into_mut().unwrap();
    for (dy, sy) in (start..=end).enumerate() {
        for x in 0..width {
            let (r, g, b, a) = raster.get_rgba_unchecked(x, sy);
            strip.set_rgba_unchecked(x, dy as u32, composite_over_white(r, g, b, a));
        }
    }
    strip.into()
}

#[inline]
fn composite_over_white(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 255 {
        return [r, g, b, 255];
    }
    let a16 = a as u16;
    let blend = |c: u8| -> u8 { ((c as u16 * a16 + 255 * (255 - a16)) / 255) as u8 };
    [blend(r), blend(g), blend(b), 255]
}
