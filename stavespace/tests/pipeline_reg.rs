//! End-to-end pipeline regression test
//!
//! Synthetic score pages go through the full flow: load, analysis,
//! per-page settings, manual edits, and export to PDF bytes.

use stavespace::io::{CachingRasterizer, PageRasterizer, PdfOptions};
use stavespace::layout::LayoutOptions;
use stavespace::{Raster, ScoreSession, SessionError};
use stavespace_test::RegParams;
use stavespace_test::synth::{band_page, page_with_margin_braces};

/// A rasterizer serving prebuilt synthetic pages.
struct SynthRasterizer {
    pages: Vec<Raster>,
}

impl PageRasterizer for SynthRasterizer {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn rasterize(&mut self, page: usize, _scale: f32) -> stavespace::io::IoResult<Raster> {
        if page == 0 || page > self.pages.len() {
            return Err(stavespace::io::IoError::PageOutOfRange {
                page,
                count: self.pages.len(),
            });
        }
        Ok(self.pages[page - 1].clone())
    }
}

fn score_rasterizer() -> SynthRasterizer {
    SynthRasterizer {
        pages: vec![
            // Page 1: two systems with margin braces
            page_with_margin_braces(1000, 1500, &[(200, 500), (700, 1000)], true),
            // Page 2: three full-width systems
            band_page(1000, 1800, &[(100, 350), (550, 800), (1000, 1250)]),
            // Page 3: a title page with a small centered block
            band_page(1000, 1500, &[(700, 760)]),
        ],
    }
}

#[test]
fn pipeline_reg() {
    let mut rp = RegParams::new("pipeline");

    let mut rasterizer = CachingRasterizer::new(score_rasterizer());
    let mut session = ScoreSession::load(&mut rasterizer, 1.0).expect("load");
    rp.compare_values(3.0, session.page_count() as f64, 0.0);

    // Page 3 is a title page: keep it verbatim but exported
    session.set_detect(2, false).expect("set detect");
    session.analyze_all().expect("analyze");

    rp.compare_values(2.0, session.page(0).unwrap().systems().len() as f64, 0.0);
    rp.compare_values(3.0, session.page(1).unwrap().systems().len() as f64, 0.0);
    rp.compare_values(0.0, session.page(2).unwrap().systems().len() as f64, 0.0);

    // A manual correction: merge nothing, just nudge a band edge
    let first = session.page(0).unwrap().systems()[0];
    session
        .resize_system(0, 0, first.start, first.end + 10)
        .expect("resize");
    rp.compare_values(
        (first.end + 10) as f64,
        session.page(0).unwrap().systems()[0].end as f64,
        0.0,
    );

    // Export with spacing and a watermark
    session.set_layout_options(
        LayoutOptions::new()
            .with_spacing_px(150.0)
            .with_watermark("stavespace"),
    );
    let bytes = session
        .export_with(&PdfOptions::with_title("Re-spaced score"))
        .expect("export");

    rp.check("pdf header", bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    rp.check("flate images", text.contains("FlateDecode"));
    rp.check("watermark font", text.contains("Helvetica"));
    rp.check("watermark text", text.contains("stavespace"));

    assert!(rp.cleanup(), "pipeline regression test failed");
}

#[test]
fn empty_export_reg() {
    let mut rp = RegParams::new("empty_export");

    let mut rasterizer = score_rasterizer();
    let mut session = ScoreSession::load(&mut rasterizer, 1.0).expect("load");
    session.analyze_all().expect("analyze");

    // All three pages deselected: the export fails fast, before any
    // composition, and produces no bytes.
    for page in 0..3 {
        session.set_export(page, false).expect("set export");
    }
    let result = session.export();
    rp.check(
        "empty export set reported",
        matches!(
            result,
            Err(SessionError::Layout(
                stavespace::layout::LayoutError::EmptyExportSet
            ))
        ),
    );

    assert!(rp.cleanup(), "empty export regression test failed");
}
