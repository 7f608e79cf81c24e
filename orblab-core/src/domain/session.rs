//! Session window — the local time-of-day window whose extremes form the
//! opening range.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A named session window in the series' local time base.
///
/// The window is half-open `[start, end)`. If `end <= start` the window
/// crosses midnight: for trading day D it runs from D at `start` to D+1 at
/// `end` (e.g. a 23:00–01:00 overnight open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    /// Short session code, e.g. "RTH" or "LONDON". Part of the output key.
    pub code: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SessionWindow {
    pub fn new(code: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            code: code.into(),
            start,
            end,
        }
    }

    /// Resolve the window to concrete instants for one trading day.
    ///
    /// Returns `(start, end)` with `end` on the following calendar date when
    /// the window crosses midnight, so boundary bars are neither double
    /// counted nor dropped.
    pub fn bounds(&self, day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = day.and_time(self.start);
        let end = if self.end <= self.start {
            (day + chrono::Duration::days(1)).and_time(self.end)
        } else {
            day.and_time(self.end)
        };
        (start, end)
    }
}
