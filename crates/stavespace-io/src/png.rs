//! PNG read/write for page rasters
//!
//! Pre-rendered page images and debug dumps travel as PNG. Decoding
//! normalizes every supported color type to the RGBA layout of
//! [`Raster`]; encoding always writes 8-bit RGBA.

use crate::{IoError, IoResult};
use stavespace_core::Raster;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Read a PNG file into a raster.
///
/// Supports 8-bit grayscale, grayscale+alpha, RGB, and RGBA images.
///
/// # Errors
///
/// Returns [`IoError::DecodeError`] for unsupported bit depths or
/// color types and for malformed files.
pub fn read_png(path: impl AsRef<Path>) -> IoResult<Raster> {
    let decoder = png::Decoder::new(std::io::BufReader::new(File::open(path)?));
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::DecodeError(format!(
            "unsupported bit depth: {:?}",
            info.bit_depth
        )));
    }

    let pixels = info.width as usize * info.height as usize;
    let bytes = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => bytes.to_vec(),
        png::ColorType::Rgb => {
            let mut out = Vec::with_capacity(pixels * 4);
            for px in bytes.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            out
        }
        png::ColorType::Grayscale => {
            let mut out = Vec::with_capacity(pixels * 4);
            for &g in bytes {
                out.extend_from_slice(&[g, g, g, 255]);
            }
            out
        }
        png::ColorType::GrayscaleAlpha => {
            let mut out = Vec::with_capacity(pixels * 4);
            for px in bytes.chunks_exact(2) {
                out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
            out
        }
        other => {
            return Err(IoError::DecodeError(format!(
                "unsupported color type: {other:?}"
            )));
        }
    };

    Ok(Raster::from_rgba(info.width, info.height, rgba)?)
}

/// Write a raster to a PNG file as 8-bit RGBA.
pub fn write_png(raster: &Raster, path: impl AsRef<Path>) -> IoResult<()> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), raster.width(), raster.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    writer
        .write_image_data(raster.data())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}
