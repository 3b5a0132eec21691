//! Threshold/hysteresis segmentation
//!
//! Splits a normalized darkness profile into bands of consecutive
//! above-threshold rows. A dip below the threshold only closes a band
//! once it has lasted `min_gap` rows (or reaches the end of the
//! profile); shorter dips - the thin white gaps between staves inside
//! one system - are treated as noise and the band continues through
//! them. This two-sided hysteresis is what keeps a single system with
//! internal whitespace from being read as several.

use stavespace_core::System;

/// Scanner state. `PendingGap` carries the band being interrupted and
/// the number of below-threshold rows seen so far.
enum ScanState {
    Outside,
    Inside { start: u32 },
    PendingGap { start: u32, band_end: u32, gap: u32 },
}

/// Segment a normalized profile (percent values) into inclusive row
/// bands.
///
/// `min_gap` must be positive; callers validate it through
/// `DetectOptions`.
pub fn segment_bands(normalized: &[f32], threshold: f32, min_gap: u32) -> Vec<System> {
    let mut bands = Vec::new();
    let mut state = ScanState::Outside;

    for (y, &value) in normalized.iter().enumerate() {
        let y = y as u32;
        let is_content = value >= threshold;

        state = match state {
            ScanState::Outside => {
                if is_content {
                    ScanState::Inside { start: y }
                } else {
                    ScanState::Outside
                }
            }
            ScanState::Inside { start } => {
                if is_content {
                    ScanState::Inside { start }
                } else {
                    ScanState::PendingGap {
                        start,
                        band_end: y - 1,
                        gap: 1,
                    }
                }
            }
            ScanState::PendingGap {
                start,
                band_end,
                gap,
            } => {
                if is_content {
                    // The dip ended before qualifying as a gap: noise,
                    // the band continues through it.
                    ScanState::Inside { start }
                } else if gap + 1 >= min_gap {
                    // A real inter-system gap: close the band.
                    bands.push(System {
                        start,
                        end: band_end,
                    });
                    ScanState::Outside
                } else {
                    ScanState::PendingGap {
                        start,
                        band_end,
                        gap: gap + 1,
                    }
                }
            }
        };
    }

    // A band running into the end of the profile closes there, even
    // if the trailing gap never reached min_gap.
    match state {
        ScanState::Inside { start } => bands.push(System {
            start,
            end: normalized.len() as u32 - 1,
        }),
        ScanState::PendingGap {
            start, band_end, ..
        } => bands.push(System {
            start,
            end: band_end,
        }),
        ScanState::Outside => {}
    }

    bands
}

/// Drop bands shorter than the minimum system height.
///
/// Applies to freshly detected bands only; user-created systems never
/// pass through this filter.
pub fn filter_min_height(bands: Vec<System>, min_height: u32) -> Vec<System> {
    bands.into_iter().filter(|b| b.height() >= min_height).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(spans: &[(usize, f32)]) -> Vec<f32> {
        let mut p = Vec::new();
        for &(len, value) in spans {
            p.extend(std::iter::repeat_n(value, len));
        }
        p
    }

    #[test]
    fn test_single_band() {
        let p = profile(&[(10, 0.0), (20, 50.0), (40, 0.0)]);
        let bands = segment_bands(&p, 5.0, 5);
        assert_eq!(bands, vec![System { start: 10, end: 29 }]);
    }

    #[test]
    fn test_short_dip_is_noise() {
        // A 3-row dip inside a band, min_gap 5: the band continues
        let p = profile(&[(10, 50.0), (3, 0.0), (10, 50.0), (20, 0.0)]);
        let bands = segment_bands(&p, 5.0, 5);
        assert_eq!(bands, vec![System { start: 0, end: 22 }]);
    }

    #[test]
    fn test_qualifying_gap_splits_bands() {
        let p = profile(&[(10, 50.0), (5, 0.0), (10, 50.0), (20, 0.0)]);
        let bands = segment_bands(&p, 5.0, 5);
        assert_eq!(
            bands,
            vec![System { start: 0, end: 9 }, System { start: 15, end: 24 }]
        );
    }

    #[test]
    fn test_band_running_to_profile_end() {
        let p = profile(&[(10, 0.0), (15, 50.0)]);
        let bands = segment_bands(&p, 5.0, 30);
        assert_eq!(bands, vec![System { start: 10, end: 24 }]);
    }

    #[test]
    fn test_trailing_dip_shorter_than_gap_still_closes() {
        // The profile ends inside a 4-row dip (min_gap 10): the band
        // closes at its last content row.
        let p = profile(&[(10, 50.0), (4, 0.0)]);
        let bands = segment_bands(&p, 5.0, 10);
        assert_eq!(bands, vec![System { start: 0, end: 9 }]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let p = profile(&[(10, 5.0), (30, 0.0)]);
        let bands = segment_bands(&p, 5.0, 5);
        assert_eq!(bands, vec![System { start: 0, end: 9 }]);
    }

    #[test]
    fn test_all_quiet_yields_no_bands() {
        let p = profile(&[(100, 0.0)]);
        assert!(segment_bands(&p, 5.0, 30).is_empty());
    }

    #[test]
    fn test_min_height_filter() {
        let bands = vec![System { start: 0, end: 30 }, System { start: 100, end: 200 }];
        let kept = filter_min_height(bands, 50);
        assert_eq!(kept, vec![System { start: 100, end: 200 }]);
    }
}
