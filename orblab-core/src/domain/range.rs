//! OpeningRange — the high/low extremes of the session window.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::SimError;

/// High/low of one (day, session) window, immutable once computed.
///
/// A window with zero bars has no range at all — that case is `None` at the
/// call site, never a zero-sized `OpeningRange`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningRange {
    pub high: f64,
    pub low: f64,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
}

impl OpeningRange {
    /// Build a range, rejecting inverted extremes.
    pub fn new(
        high: f64,
        low: f64,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> Result<Self, SimError> {
        if high < low {
            return Err(SimError::InvertedRange { high, low });
        }
        Ok(Self {
            high,
            low,
            window_start,
            window_end,
        })
    }

    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}
