//! PDF composition (write-only)
//!
//! Realizes a [`DrawPlan`] as PDF bytes with the `pdf-writer` crate.
//! Every placed image becomes an RGB image XObject compressed with
//! zlib Flate (lossless), drawn at its plan rectangle; the optional
//! watermark is drawn bottom-right on every page in Helvetica with a
//! transparency graphics state.

use crate::{IoError, IoResult};
use log::debug;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use stavespace_core::Raster;
use stavespace_layout::{DrawPlan, Watermark};

/// PDF output options
#[derive(Debug, Clone, Default)]
pub struct PdfOptions {
    /// Document title
    pub title: Option<String>,
}

impl PdfOptions {
    /// Create options with a specific title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// Zlib compression level for image streams.
const FLATE_LEVEL: u8 = 6;

/// Resource names used on every page.
const FONT_NAME: &[u8] = b"F0";
const GSTATE_NAME: &[u8] = b"GS0";

/// Sequential PDF object id allocator.
struct RefAllocator {
    next: i32,
}

impl RefAllocator {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

/// Compose a draw plan into PDF bytes.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] for a plan without pages;
/// encoding problems surface as [`IoError::EncodeError`].
pub fn compose(plan: &DrawPlan, options: &PdfOptions) -> IoResult<Vec<u8>> {
    if plan.pages.is_empty() {
        return Err(IoError::InvalidData("draw plan has no pages".to_string()));
    }

    let mut pdf = Pdf::new();
    let mut ids = RefAllocator::new();

    let catalog_id = ids.alloc();
    let pages_id = ids.alloc();

    // Shared watermark resources
    let watermark_ids = plan.watermark.as_ref().map(|_| (ids.alloc(), ids.alloc()));

    // Per page: one page object, one content stream, one XObject per image
    let mut page_ids = Vec::with_capacity(plan.pages.len());
    let mut image_ids = Vec::with_capacity(plan.pages.len());
    for page in &plan.pages {
        page_ids.push((ids.alloc(), ids.alloc()));
        image_ids.push((0..page.images.len()).map(|_| ids.alloc()).collect::<Vec<_>>());
    }

    pdf.catalog(catalog_id).pages(pages_id);

    if let Some(ref title) = options.title {
        let info_id = ids.alloc();
        pdf.document_info(info_id).title(TextStr(title));
    }

    pdf.pages(pages_id)
        .kids(page_ids.iter().map(|&(page_id, _)| page_id))
        .count(plan.pages.len() as i32);

    if let Some((font_id, gstate_id)) = watermark_ids {
        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
        let opacity = plan.watermark.as_ref().map(|w| w.opacity).unwrap_or(1.0);
        pdf.ext_graphics(gstate_id).non_stroking_alpha(opacity);
    }

    for (page_index, page) in plan.pages.iter().enumerate() {
        let (page_id, contents_id) = page_ids[page_index];

        // Image XObjects
        let mut names = Vec::with_capacity(page.images.len());
        for (image_index, placed) in page.images.iter().enumerate() {
            let data = rgb_bytes(&placed.image);
            let compressed = compress_to_vec_zlib(&data, FLATE_LEVEL);

            let mut xobject = pdf.image_xobject(image_ids[page_index][image_index], &compressed);
            xobject.filter(Filter::FlateDecode);
            xobject.width(placed.image.width() as i32);
            xobject.height(placed.image.height() as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            xobject.finish();

            names.push(format!("Im{image_index}"));
        }

        // Content stream: draw each image at its plan rectangle
        let mut content = Content::new();
        for (placed, name) in page.images.iter().zip(&names) {
            content.save_state();
            content.transform([
                placed.width,
                0.0,
                0.0,
                placed.height,
                placed.x,
                placed.y,
            ]);
            content.x_object(Name(name.as_bytes()));
            content.restore_state();
        }
        if let Some(ref watermark) = plan.watermark {
            draw_watermark(&mut content, watermark, plan.page_width, plan.margin_right);
        }
        let content_data = content.finish();
        pdf.stream(contents_id, &content_data);

        // Page object with its resources
        let mut page_writer = pdf.page(page_id);
        page_writer.parent(pages_id);
        page_writer.media_box(Rect::new(0.0, 0.0, plan.page_width, plan.page_height));
        page_writer.contents(contents_id);

        let mut resources = page_writer.resources();
        {
            let mut xobjects = resources.x_objects();
            for (name, &id) in names.iter().zip(&image_ids[page_index]) {
                xobjects.pair(Name(name.as_bytes()), id);
            }
        }
        if let Some((font_id, gstate_id)) = watermark_ids {
            resources.fonts().pair(Name(FONT_NAME), font_id);
            resources.ext_g_states().pair(Name(GSTATE_NAME), gstate_id);
        }
        resources.finish();
        page_writer.finish();
    }

    let bytes = pdf.finish();
    debug!(
        "composed {} pages, {} images, {} bytes",
        plan.pages.len(),
        plan.image_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// Right-aligned low-opacity text near the bottom page edge.
fn draw_watermark(content: &mut Content, watermark: &Watermark, page_width: f32, margin_right: f32) {
    let text_width = helvetica_text_width(&watermark.text, watermark.font_size);
    let x = page_width - margin_right - text_width;

    content.save_state();
    content.set_parameters(Name(GSTATE_NAME));
    content.begin_text();
    content.set_font(Name(FONT_NAME), watermark.font_size);
    content.set_fill_gray(watermark.gray);
    content.next_line(x, watermark.baseline);
    content.show(Str(watermark.text.as_bytes()));
    content.end_text();
    content.restore_state();
}

/// Flatten a raster to packed RGB, compositing any transparency over
/// white so the (alpha-less) PDF image matches what the layout
/// engine assumed.
fn rgb_bytes(raster: &Raster) -> Vec<u8> {
    let mut data = Vec::with_capacity(raster.width() as usize * raster.height() as usize * 3);
    for px in raster.data().chunks_exact(4) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        if a == 255 {
            data.extend_from_slice(&[r, g, b]);
        } else {
            let a16 = a as u16;
            let blend = |c: u8| -> u8 { ((c as u16 * a16 + 255 * (255 - a16)) / 255) as u8 };
            data.extend_from_slice(&[blend(r), blend(g), blend(b)]);
        }
    }
    data
}

/// Standard Helvetica advance widths for ASCII 32..=126, in
/// thousandths of the font size (Adobe AFM metrics).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Width of `text` at `font_size` points in Helvetica. Characters
/// outside the metrics table count as a digit width.
fn helvetica_text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|ch| {
            let code = ch as u32;
            if (32..=126).contains(&code) {
                HELVETICA_WIDTHS[(code - 32) as usize] as u32
            } else {
                556
            }
        })
        .sum();
    units as f32 / 1000.0 * font_size
}
