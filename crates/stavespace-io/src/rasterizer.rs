//! The page rasterizer contract
//!
//! The core never renders document pages itself; it consumes a
//! [`PageRasterizer`]. Two scale tiers are used in practice: a low
//! scale for fast previews and a higher scale for analysis and
//! export-quality extraction. Rasterization is the expensive step,
//! so a [`CachingRasterizer`] keyed by (page, scale) wraps whatever
//! backend is in use.

use crate::png::read_png;
use crate::{IoError, IoResult};
use log::debug;
use stavespace_core::Raster;
use stavespace_transform::scale_by_sampling;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Preview-tier render scale.
pub const PREVIEW_SCALE: f32 = 0.3;

/// Analysis/export-tier render scale.
pub const ANALYSIS_SCALE: f32 = 2.0;

/// Renders document pages to rasters.
///
/// Page indices are 1-based. A page rendered at `scale` measures
/// `source_width x scale` by `source_height x scale` pixels.
pub trait PageRasterizer {
    /// Number of pages in the source document.
    fn page_count(&self) -> usize;

    /// Render page `page` (1-based) at the given scale.
    ///
    /// # Errors
    ///
    /// [`IoError::PageOutOfRange`] for indices outside
    /// `1..=page_count()`; backend failures propagate unchanged.
    fn rasterize(&mut self, page: usize, scale: f32) -> IoResult<Raster>;
}

/// Caches rendered pages by (page, scale).
///
/// Cache hits clone the shared raster, which is allocation-free.
pub struct CachingRasterizer<R> {
    inner: R,
    cache: HashMap<(usize, u32), Raster>,
}

impl<R: PageRasterizer> CachingRasterizer<R> {
    /// Wrap a rasterizer with an empty cache.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    /// Drop every cached page.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached renders.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl<R: PageRasterizer> PageRasterizer for CachingRasterizer<R> {
    fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    fn rasterize(&mut self, page: usize, scale: f32) -> IoResult<Raster> {
        let key = (page, scale.to_bits());
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }
        let raster = self.inner.rasterize(page, scale)?;
        self.cache.insert(key, raster.clone());
        Ok(raster)
    }
}

/// A rasterizer backed by a directory of pre-rendered page PNGs.
///
/// Files are ordered by name; each is treated as its page rendered at
/// scale 1.0, and other scales are produced by resampling.
pub struct PngPageSource {
    pages: Vec<PathBuf>,
}

impl PngPageSource {
    /// Scan `dir` for `.png` files, ordered by file name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidData`] if the directory holds no PNG
    /// files.
    pub fn from_dir(dir: impl AsRef<Path>) -> IoResult<Self> {
        let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        pages.sort();
        Self::from_paths(pages)
    }

    /// Use an explicit ordered list of page image paths.
    pub fn from_paths(pages: Vec<PathBuf>) -> IoResult<Self> {
        if pages.is_empty() {
            return Err(IoError::InvalidData(
                "no page images provided".to_string(),
            ));
        }
        debug!("png page source: {} pages", pages.len());
        Ok(Self { pages })
    }
}

impl PageRasterizer for PngPageSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn rasterize(&mut self, page: usize, scale: f32) -> IoResult<Raster> {
        if page == 0 || page > self.pages.len() {
            return Err(IoError::PageOutOfRange {
                page,
                count: self.pages.len(),
            });
        }
        let raster = read_png(&self.pages[page - 1])?;
        if (scale - 1.0).abs() < f32::EPSILON {
            return Ok(raster);
        }
        Ok(scale_by_sampling(&raster, scale, scale)?)
    }
}
