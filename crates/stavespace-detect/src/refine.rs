//! Boundary refinement
//!
//! Margin braces are typically shorter than the staff content they
//! mark, so bands detected from the margin profile start too low and
//! end too high. Refinement grows each band outward while the
//! full-width profile still shows ink, then pads both ends by a
//! safety margin, clamped to the raster bounds.

use stavespace_core::{DarknessProfile, System};

/// Refine band boundaries against the full-width profile.
pub fn refine_boundaries(
    systems: &[System],
    full_profile: &DarknessProfile,
    pad: u32,
) -> Vec<System> {
    if full_profile.is_empty() {
        return systems.to_vec();
    }
    let last_row = full_profile.len() as u32 - 1;

    systems
        .iter()
        .map(|system| {
            let mut start = system.start.min(last_row);
            let mut end = system.end.min(last_row);

            // Grow upward over any connected ink
            while start > 0 && full_profile.count(start as usize - 1) > 0 {
                start -= 1;
            }

            // Grow downward over any connected ink
            while end < last_row && full_profile.count(end as usize + 1) > 0 {
                end += 1;
            }

            System {
                start: start.saturating_sub(pad),
                end: (end + pad).min(last_row),
            }
        })
        .collect()
}
