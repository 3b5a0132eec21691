//! Layout regression test
//!
//! Packs synthetic system sets through the real A4 geometry and
//! checks page breaks, spacing accounting, and the no-split
//! guarantee.

use stavespace_core::System;
use stavespace_layout::{
    LayoutOptions, PageContent, PageGeometry, build_plan,
};
use stavespace_test::RegParams;
use stavespace_test::synth::band_page;

/// A source page whose systems all have the given pixel heights,
/// stacked with 100-row gaps.
fn page_with_heights(width: u32, heights: &[u32]) -> PageContent {
    let mut bands = Vec::new();
    let mut row = 0u32;
    for &h in heights {
        bands.push((row, row + h - 1));
        row += h + 100;
    }
    let raster = band_page(width, row + 100, &bands);
    let systems = bands
        .iter()
        .map(|&(start, end)| System::new(start, end).unwrap())
        .collect();
    PageContent::with_systems(raster, systems)
}

#[test]
fn layout_reg() {
    let mut rp = RegParams::new("layout");

    let geometry = PageGeometry::a4();
    let content_height = geometry.content_height(); // 761.89pt

    // --- A4 fill: four systems of 200pt each with 50pt spacing ---
    // 200*3 + 50*2 = 700 fits; the fourth needs 250 more and breaks.
    // Raster is 1030 px wide over 515.28pt of content, so a 400-row
    // strip lands at ~200pt and 100px of spacing at ~50pt.
    let page = page_with_heights(1030, &[400, 400, 400, 400]);
    let options = LayoutOptions::new().with_spacing_px(100.0);
    let plan = build_plan(&[page], &geometry, &options).expect("plan");

    rp.compare_values(2.0, plan.pages.len() as f64, 0.0);
    rp.compare_values(3.0, plan.pages[0].images.len() as f64, 0.0);
    rp.compare_values(1.0, plan.pages[1].images.len() as f64, 0.0);

    // Every placement stays inside the content area
    for page in &plan.pages {
        for placed in &page.images {
            rp.check(
                "inside bottom margin",
                placed.y >= geometry.margin_bottom - 0.01,
            );
            rp.check(
                "inside top margin",
                placed.y + placed.height <= geometry.height - geometry.margin_top + 0.01,
            );
        }
    }

    // --- No-split guarantee across a mixed system set ---
    // Heights chosen to force breaks at several points; every placed
    // image must still carry one complete system's fitted height.
    let mixed = page_with_heights(1030, &[700, 300, 500, 900, 250, 250, 250]);
    let fit = geometry.content_width() / 1030.0;
    let plan = build_plan(&[mixed], &geometry, &options).expect("mixed plan");
    let total_images: usize = plan.pages.iter().map(|p| p.images.len()).sum();
    rp.compare_values(7.0, total_images as f64, 0.0);
    for page in &plan.pages {
        for placed in &page.images {
            let expected = placed.image.height() as f32 * fit;
            rp.compare_values(expected as f64, placed.height as f64, 0.01);
            rp.check(
                "fits content height",
                placed.height <= content_height + 0.01,
            );
        }
    }

    // --- Verbatim page sandwiched between system pages ---
    let before = page_with_heights(1030, &[400, 400]);
    let verbatim = PageContent::verbatim(band_page(1030, 1456, &[(0, 99)]));
    let after = page_with_heights(1030, &[400]);
    let plan =
        build_plan(&[before, verbatim, after], &geometry, &options).expect("verbatim plan");
    rp.compare_values(3.0, plan.pages.len() as f64, 0.0);
    rp.compare_values(1.0, plan.pages[1].images.len() as f64, 0.0);
    // The verbatim page is width-fit and top-anchored
    let full = &plan.pages[1].images[0];
    rp.compare_values(
        geometry.content_width() as f64,
        full.width as f64,
        0.01,
    );
    rp.compare_values(
        (geometry.height - geometry.margin_top - full.height) as f64,
        full.y as f64,
        0.01,
    );

    assert!(rp.cleanup(), "layout regression test failed");
}
