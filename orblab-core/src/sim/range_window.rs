//! Range window calculator — high/low extremes of the session window.

use chrono::NaiveDate;

use crate::domain::{Bar, OpeningRange, SessionWindow, SimError};

/// Compute the opening range for one (day, session) from an ordered bar
/// slice.
///
/// Bars are selected by the half-open window `[start, end)` resolved against
/// the trading day (midnight crossing handled by `SessionWindow::bounds`).
/// Zero bars in the window means the range is undefined: `Ok(None)`, which
/// downstream resolves to `SKIPPED_NO_RANGE`.
pub fn compute_range(
    bars: &[Bar],
    day: NaiveDate,
    window: &SessionWindow,
) -> Result<Option<OpeningRange>, SimError> {
    let (start, end) = window.bounds(day);

    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut seen = false;

    for bar in bars {
        if bar.ts < start {
            continue;
        }
        if bar.ts >= end {
            break;
        }
        if !bar.is_sane() {
            return Err(SimError::InsaneBar { ts: bar.ts });
        }
        high = high.max(bar.high);
        low = low.min(bar.low);
        seen = true;
    }

    if !seen {
        return Ok(None);
    }

    OpeningRange::new(high, low, start, end).map(Some)
}

/// Index of the first bar strictly after the window end for the given day.
///
/// The breakout scan starts here; everything before it belongs to the range
/// window or the pre-session.
pub fn first_index_after_window(bars: &[Bar], day: NaiveDate, window: &SessionWindow) -> usize {
    let (_, end) = window.bounds(day);
    bars.partition_point(|b| b.ts < end)
}
