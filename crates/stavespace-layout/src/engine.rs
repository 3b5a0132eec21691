//! The greedy packing engine
//!
//! Systems flow in source order - page 1 top to bottom, then page 2,
//! and so on - onto fixed-size output pages. A running cursor moves
//! down from the top margin; a system that no longer fits above the
//! bottom margin opens a new page and is placed there whole. There is
//! no backtracking and no lookahead: a single pass with one cursor.
//! A system is never split across a page break.

use crate::geometry::{LayoutOptions, PageGeometry};
use crate::item::{LayoutItem, PageContent, extract_strip};
use crate::plan::{DrawPlan, PlacedImage, PlannedPage, Watermark};
use crate::{LayoutError, LayoutResult};
use log::debug;

/// Build the draw plan for one export run.
///
/// Pages with `export == false` are excluded before anything else
/// happens. Pages with `detect == false`, or with no systems at all,
/// are embedded verbatim on a dedicated output page; the remaining
/// pages contribute one image strip per system.
///
/// # Errors
///
/// - [`LayoutError::EmptyExportSet`] if no page is marked for export
///   (surfaced before any composition work)
/// - [`LayoutError::InvalidParameters`] if geometry or options do not
///   validate
pub fn build_plan(
    contents: &[PageContent],
    geometry: &PageGeometry,
    options: &LayoutOptions,
) -> LayoutResult<DrawPlan> {
    geometry.validate()?;
    options.validate()?;

    let exported: Vec<&PageContent> = contents.iter().filter(|c| c.export).collect();
    if exported.is_empty() {
        return Err(LayoutError::EmptyExportSet);
    }

    let content_width = geometry.content_width();

    // Spacing converts to points through the same width-fit factor
    // applied to the systems themselves, taken from the first
    // exported page that contributes any. With no systems anywhere
    // the spacing never matters.
    let spacing_pt = exported
        .iter()
        .find(|c| c.detect && !c.systems.is_empty())
        .map(|c| options.spacing_px * content_width / c.raster.width() as f32)
        .unwrap_or(0.0);

    // Flatten the exported pages into packing items, in source order.
    let mut items = Vec::new();
    for content in &exported {
        if !content.detect || content.systems.is_empty() {
            items.push(LayoutItem::FullPage {
                image: content.raster.clone(),
            });
            continue;
        }
        let fit = content_width / content.raster.width() as f32;
        for system in &content.systems {
            let image = extract_strip(&content.raster, system);
            let fitted_height = image.height() as f32 * fit;
            items.push(LayoutItem::Strip {
                image,
                fitted_height,
            });
        }
    }

    // Single-pass greedy packing.
    let mut pages: Vec<PlannedPage> = Vec::new();
    let mut page_open = false;
    let mut cursor_y = 0.0f32;
    let mut systems_on_page = 0usize;

    for item in items {
        match item {
            LayoutItem::FullPage { image } => {
                // Verbatim pages always get a dedicated output page:
                // width-fit, anchored to the top margin, height
                // clipped to the content area if it overflows.
                let aspect = image.height() as f32 / image.width() as f32;
                let draw_width = content_width;
                let draw_height = draw_width * aspect;
                let y = (geometry.height - geometry.margin_top - draw_height)
                    .max(geometry.margin_bottom);

                pages.push(PlannedPage {
                    images: vec![PlacedImage {
                        image,
                        x: geometry.margin_left,
                        y,
                        width: draw_width,
                        height: draw_height.min(geometry.content_height()),
                    }],
                });

                // The next system starts on a fresh page.
                page_open = false;
                systems_on_page = 0;
            }
            LayoutItem::Strip {
                image,
                fitted_height,
            } => {
                let needed = fitted_height + if systems_on_page > 0 { spacing_pt } else { 0.0 };
                let available = cursor_y - geometry.margin_bottom;

                if !page_open || needed > available {
                    pages.push(PlannedPage::default());
                    page_open = true;
                    cursor_y = geometry.height - geometry.margin_top;
                    systems_on_page = 0;
                }

                if systems_on_page > 0 {
                    cursor_y -= spacing_pt;
                }
                cursor_y -= fitted_height;

                // `pages` cannot be empty here
                pages.last_mut().unwrap().images.push(PlacedImage {
                    image,
                    x: geometry.margin_left,
                    y: cursor_y,
                    width: content_width,
                    height: fitted_height,
                });
                systems_on_page += 1;
            }
        }
    }

    debug!(
        "layout: {} source pages -> {} output pages, {} images, spacing {:.1}pt",
        exported.len(),
        pages.len(),
        pages.iter().map(|p| p.images.len()).sum::<usize>(),
        spacing_pt
    );

    Ok(DrawPlan {
        page_width: geometry.width,
        page_height: geometry.height,
        margin_right: geometry.margin_right,
        pages,
        watermark: options.watermark.as_deref().map(Watermark::new),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stavespace_core::{Raster, System};
    use stavespace_test::synth::band_page;

    /// Geometry with a bare 200x700 content area so fitted sizes can
    /// be read off directly (fit factor 1.0 for 200 px wide rasters).
    fn flat_geometry() -> PageGeometry {
        PageGeometry {
            width: 200.0,
            height: 700.0,
            margin_top: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            margin_right: 0.0,
        }
    }

    fn three_system_page() -> PageContent {
        // Three 300-row systems on a 200x1100 raster
        let raster = band_page(200, 1100, &[(0, 299), (350, 649), (700, 999)]);
        let systems = vec![
            System::new(0, 299).unwrap(),
            System::new(350, 649).unwrap(),
            System::new(700, 999).unwrap(),
        ];
        PageContent::with_systems(raster, systems)
    }

    #[test]
    fn test_pagination_boundary() {
        // 700pt content height, 20pt spacing, three 300pt systems:
        // 300 + 20 + 300 = 620 fits, the third needs 320 more and
        // starts page 2.
        let contents = vec![three_system_page()];
        let options = LayoutOptions::new().with_spacing_px(20.0);
        let plan = build_plan(&contents, &flat_geometry(), &options).unwrap();

        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[0].images.len(), 2);
        assert_eq!(plan.pages[1].images.len(), 1);

        // Cursor positions: first at the top, second below the gap
        let first = &plan.pages[0].images[0];
        let second = &plan.pages[0].images[1];
        assert!((first.y - 400.0).abs() < 0.01); // 700 - 300
        assert!((second.y - 80.0).abs() < 0.01); // 400 - 20 - 300
        let third = &plan.pages[1].images[0];
        assert!((third.y - 400.0).abs() < 0.01);
    }

    #[test]
    fn test_no_spacing_before_first_or_after_last() {
        let contents = vec![three_system_page()];
        let options = LayoutOptions::new().with_spacing_px(20.0);
        let plan = build_plan(&contents, &flat_geometry(), &options).unwrap();

        // First image on each page is flush with the top margin
        for page in &plan.pages {
            let top = &page.images[0];
            assert!((top.y + top.height - 700.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_systems_are_never_split() {
        let contents = vec![three_system_page()];
        let options = LayoutOptions::new().with_spacing_px(20.0);
        let plan = build_plan(&contents, &flat_geometry(), &options).unwrap();

        // Every placed image carries its full fitted height: strip
        // pixel rows match the placement height under fit factor 1.0.
        for page in &plan.pages {
            for placed in &page.images {
                assert!((placed.height - placed.image.height() as f32).abs() < 0.01);
            }
        }
    }

    #[test]
    fn test_empty_export_set() {
        let mut content = three_system_page();
        content.export = false;
        let err = build_plan(&[content], &flat_geometry(), &LayoutOptions::new());
        assert!(matches!(err, Err(LayoutError::EmptyExportSet)));

        let err = build_plan(&[], &flat_geometry(), &LayoutOptions::new());
        assert!(matches!(err, Err(LayoutError::EmptyExportSet)));
    }

    #[test]
    fn test_verbatim_page_is_alone_and_top_anchored() {
        let verbatim = PageContent::verbatim(Raster::new(200, 350).unwrap());
        let contents = vec![three_system_page(), verbatim, three_system_page()];
        let options = LayoutOptions::new().with_spacing_px(20.0);
        let plan = build_plan(&contents, &flat_geometry(), &options).unwrap();

        // pages: [s1 s2], [s3], [verbatim], [s1 s2], [s3]
        assert_eq!(plan.pages.len(), 5);
        assert_eq!(plan.pages[2].images.len(), 1);
        let full = &plan.pages[2].images[0];
        assert!((full.height - 350.0).abs() < 0.01);
        assert!((full.y - (700.0 - 350.0)).abs() < 0.01);
    }

    #[test]
    fn test_oversized_verbatim_page_clips_to_content_height() {
        // 200x1600 raster fits width 200 -> draw height 1600 > 700
        let verbatim = PageContent::verbatim(Raster::new(200, 1600).unwrap());
        let plan = build_plan(&[verbatim], &flat_geometry(), &LayoutOptions::new()).unwrap();

        let placed = &plan.pages[0].images[0];
        assert!((placed.height - 700.0).abs() < 0.01);
        assert!((placed.y - 0.0).abs() < 0.01); // clamped to the bottom margin
    }

    #[test]
    fn test_page_without_systems_is_verbatim() {
        let content = PageContent::with_systems(Raster::new(200, 350).unwrap(), Vec::new());
        let plan = build_plan(&[content], &flat_geometry(), &LayoutOptions::new()).unwrap();
        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.pages[0].images.len(), 1);
    }

    #[test]
    fn test_fit_scales_width_to_content_area() {
        // A 400 px wide raster on a 200 pt content area: fit 0.5, so
        // a 300-row system lands at 150 pt.
        let raster = band_page(400, 600, &[(0, 299)]);
        let content =
            PageContent::with_systems(raster, vec![System::new(0, 299).unwrap()]);
        let plan = build_plan(&[content], &flat_geometry(), &LayoutOptions::new()).unwrap();

        let placed = &plan.pages[0].images[0];
        assert!((placed.width - 200.0).abs() < 0.01);
        assert!((placed.height - 150.0).abs() < 0.01);
    }

    #[test]
    fn test_watermark_attached_to_plan() {
        let plan = build_plan(
            &[three_system_page()],
            &flat_geometry(),
            &LayoutOptions::new().with_watermark("stavespace"),
        )
        .unwrap();
        let watermark = plan.watermark.unwrap();
        assert_eq!(watermark.text, "stavespace");
        assert!((watermark.font_size - 7.0).abs() < f32::EPSILON);
    }
}
