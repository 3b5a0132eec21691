//! Synthetic score pages
//!
//! Builders for the raster shapes the detection and layout tests
//! need: pages with solid system bands, pages with margin braces and
//! body staves, and pages of ruled staff lines. These stand in for
//! scanned fixtures so the test suite carries no binary data.

use stavespace_core::{Raster, WHITE};

const BLACK: [u8; 4] = [0, 0, 0, 255];

/// How many rows each margin brace is inset from its band edge in
/// [`page_with_margin_braces`].
pub const BRACE_INSET_ROWS: u32 = 30;

/// A page whose `bands` (inclusive row ranges) are solid black across
/// the full width, the rest white.
pub fn band_page(width: u32, height: u32, bands: &[(u32, u32)]) -> Raster {
    Raster::from_fn(width, height, |_, y| {
        if bands.iter().any(|&(start, end)| y >= start && y <= end) {
            BLACK
        } else {
            WHITE
        }
    })
    .unwrap()
}

/// A score-like page: body content spans 15%..90% of the width for
/// every band's rows, and, when `with_braces` is set, a margin brace
/// (2%..8% of the width) covers each band inset by
/// [`BRACE_INSET_ROWS`] rows at both ends - braces are shorter than
/// the staves they mark, which is what boundary refinement exists to
/// recover from.
///
/// # Panics
///
/// Panics if a band is too short to hold an inset brace.
pub fn page_with_margin_braces(
    width: u32,
    height: u32,
    bands: &[(u32, u32)],
    with_braces: bool,
) -> Raster {
    if with_braces {
        for &(start, end) in bands {
            assert!(
                end - start > 2 * BRACE_INSET_ROWS,
                "band {start}..={end} too short for an inset brace"
            );
        }
    }

    let body_left = width * 15 / 100;
    let body_right = width * 90 / 100;
    let brace_left = width * 2 / 100;
    let brace_right = width * 8 / 100;

    Raster::from_fn(width, height, |x, y| {
        for &(start, end) in bands {
            if y >= start && y <= end && x >= body_left && x < body_right {
                return BLACK;
            }
            if with_braces
                && y >= start + BRACE_INSET_ROWS
                && y <= end - BRACE_INSET_ROWS
                && x >= brace_left
                && x < brace_right
            {
                return BLACK;
            }
        }
        WHITE
    })
    .unwrap()
}

/// A page ruled with horizontal staff lines every `line_spacing`
/// rows, spanning 10%..90% of the width.
pub fn staff_line_page(width: u32, height: u32, line_spacing: u32) -> Raster {
    Raster::from_fn(width, height, |x, y| {
        let in_body = x >= width / 10 && x < width * 9 / 10;
        if in_body && y > 0 && y % line_spacing == 0 {
            BLACK
        } else {
            WHITE
        }
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_page_rows() {
        let page = band_page(100, 50, &[(10, 20)]);
        assert_eq!(page.get_rgba(50, 15), Some((0, 0, 0, 255)));
        assert_eq!(page.get_rgba(50, 9), Some((255, 255, 255, 255)));
        assert_eq!(page.get_rgba(50, 21), Some((255, 255, 255, 255)));
    }

    #[test]
    fn test_braces_are_inset_and_in_margin() {
        let page = page_with_margin_braces(400, 300, &[(50, 250)], true);
        // Brace column inside the inset rows
        assert_eq!(page.get_rgba(20, 150), Some((0, 0, 0, 255)));
        // Brace column outside the inset rows: white
        assert_eq!(page.get_rgba(20, 60), Some((255, 255, 255, 255)));
        // Body column at the band edge: black
        assert_eq!(page.get_rgba(200, 50), Some((0, 0, 0, 255)));
    }

    #[test]
    fn test_staff_line_page_spacing() {
        let page = staff_line_page(200, 100, 25);
        assert_eq!(page.get_rgba(100, 25), Some((0, 0, 0, 255)));
        assert_eq!(page.get_rgba(100, 26), Some((255, 255, 255, 255)));
        // Margin columns stay white
        assert_eq!(page.get_rgba(5, 25), Some((255, 255, 255, 255)));
    }
}
