//! Per-unit simulation errors.
//!
//! These are *data* errors: fatal for the affected (day, session, config)
//! unit only. The batch driver catches them, logs the offending key, and
//! moves on. Skip conditions are not errors — they are classified outcomes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("opening range inverted: high {high} < low {low}")]
    InvertedRange { high: f64, low: f64 },

    #[error("bar series is not strictly ordered by timestamp")]
    UnorderedBars,

    #[error("bar with inconsistent OHLC at {ts}")]
    InsaneBar { ts: chrono::NaiveDateTime },

    #[error("risk distance is not positive: entry {entry}, stop {stop}")]
    ZeroRisk { entry: f64, stop: f64 },
}
