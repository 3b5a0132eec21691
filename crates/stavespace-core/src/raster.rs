//! Raster - the page pixel buffer
//!
//! `Raster` is the fundamental image type in stavespace: an RGBA
//! pixel grid produced by a page rasterizer and consumed by the
//! transform, detection, and layout stages.
//!
//! # Pixel layout
//!
//! - 8 bits per channel, four channels (R, G, B, A), row-major
//! - Row `y` occupies bytes `y * width * 4 .. (y + 1) * width * 4`
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for efficient cloning (shared ownership), which
//! keeps page-cache hits allocation-free. A raster is immutable once
//! produced; transforms allocate new buffers instead of mutating in
//! place. To fill pixel data during construction, use [`RasterMut`]
//! via [`Raster::try_into_mut`] or [`Raster::to_mut`], then convert
//! back with `Into<Raster>`.

use crate::error::{Error, Result};
use std::sync::Arc;

/// Opaque white in RGBA byte order.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Internal raster data
#[derive(Debug)]
struct RasterData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// RGBA samples, `width * height * 4` bytes
    data: Vec<u8>,
}

impl RasterData {
    #[inline]
    fn byte_index(&self, x: u32, y: u32) -> usize {
        ((y as usize * self.width as usize) + x as usize) * 4
    }
}

/// Raster - RGBA page image
///
/// # Examples
///
/// ```
/// use stavespace_core::Raster;
///
/// // A new raster is filled with opaque white
/// let raster = Raster::new(640, 480).unwrap();
/// assert_eq!(raster.width(), 640);
/// assert_eq!(raster.get_rgba(0, 0), Some((255, 255, 255, 255)));
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new raster filled with opaque white.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let data = vec![255u8; width as usize * height as usize * 4];
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                data,
            }),
        })
    }

    /// Create a raster from raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for zero dimensions and
    /// [`Error::BufferSizeMismatch`] if `data` is not exactly
    /// `width * height * 4` bytes long.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                data,
            }),
        })
    }

    /// Create a raster by evaluating `f(x, y)` for every pixel.
    ///
    /// Convenient for synthesizing test pages.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                data,
            }),
        })
    }

    /// Get the raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get raw access to the RGBA samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the RGBA samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.inner.width as usize * 4;
        let end = start + self.inner.width as usize * 4;
        &self.inner.data[start..end]
    }

    /// Get the RGBA values at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.get_rgba_unchecked(x, y))
    }

    /// Get the RGBA values at (x, y) without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_rgba_unchecked(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let i = self.inner.byte_index(x, y);
        let d = &self.inner.data;
        (d[i], d[i + 1], d[i + 2], d[i + 3])
    }

    /// Grayscale luminance at (x, y): the mean of R, G, and B.
    ///
    /// This is the darkness definition used throughout detection;
    /// a pixel is "dark" when its luminance is below 128.
    #[inline]
    pub fn luminance_unchecked(&self, x: u32, y: u32) -> u8 {
        let i = self.inner.byte_index(x, y);
        let d = &self.inner.data;
        ((d[i] as u16 + d[i + 1] as u16 + d[i + 2] as u16) / 3) as u8
    }

    /// Get the number of strong references to this raster.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Create a completely independent copy of this raster.
    ///
    /// Unlike `clone()`, which shares data via `Arc`, this duplicates
    /// the pixel data.
    pub fn deep_clone(&self) -> Self {
        Raster {
            inner: Arc::new(RasterData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            }),
        }
    }

    /// Try to get mutable access to the pixel data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create a mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: RasterData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            },
        }
    }
}

/// Mutable raster
///
/// Allows modification of pixel data while construction is in
/// progress. Convert back to an immutable [`Raster`] with
/// `Into<Raster>`; exclusive access is enforced at compile time.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the raster width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the raster height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get raw access to the RGBA samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable raw access to the RGBA samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Get mutable access to the RGBA samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.inner.width as usize * 4;
        let end = start + self.inner.width as usize * 4;
        &mut self.inner.data[start..end]
    }

    /// Get the RGBA values at (x, y) without bounds checking.
    #[inline]
    pub fn get_rgba_unchecked(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let i = self.inner.byte_index(x, y);
        let d = &self.inner.data;
        (d[i], d[i + 1], d[i + 2], d[i + 3])
    }

    /// Set the RGBA values at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinateOutOfBounds`] if (x, y) is outside
    /// the raster.
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::CoordinateOutOfBounds {
                x,
                y,
                width: self.inner.width,
                height: self.inner.height,
            });
        }
        self.set_rgba_unchecked(x, y, rgba);
        Ok(())
    }

    /// Set the RGBA values at (x, y) without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_rgba_unchecked(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.inner.byte_index(x, y);
        self.inner.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Fill the whole raster with opaque white.
    pub fn fill_white(&mut self) {
        self.inner.data.fill(255);
    }
}

impl From<RasterMut> for Raster {
    fn from(raster_mut: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster_mut.inner),
        }
    }
}
