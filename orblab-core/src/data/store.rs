//! Bar store trait and structured error types.
//!
//! The store is a narrow, read-only capability: fetch timestamp-ordered bars
//! by instrument, resolution, and half-open time range. The simulator holds
//! no connection or global state — callers pass a `&dyn BarStore` in.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::Bar;

/// Structured error types for bar access.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no data for instrument '{instrument}' at {resolution_min}m resolution")]
    UnknownSeries {
        instrument: String,
        resolution_min: u32,
    },

    #[error("bar series for '{instrument}' is not strictly ordered by timestamp")]
    UnorderedSeries { instrument: String },

    #[error("malformed bar in '{instrument}': {detail}")]
    MalformedBar { instrument: String, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read-only access to persisted bar series.
///
/// Implementations must return bars sorted by timestamp with no duplicates;
/// the range is half-open `[start, end)`.
pub trait BarStore: Send + Sync {
    /// Human-readable name of this store.
    fn name(&self) -> &str;

    /// Fetch bars for one instrument/resolution over `[start, end)`.
    fn fetch(
        &self,
        instrument: &str,
        resolution_min: u32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Bar>, StoreError>;
}

/// In-memory store keyed by (instrument, resolution). Test double, and the
/// backing for pre-loaded batch runs.
#[derive(Debug, Default)]
pub struct InMemoryBarStore {
    series: HashMap<(String, u32), Vec<Bar>>,
}

impl InMemoryBarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series, verifying the ordering and sanity contracts once at
    /// load, the same checks the CSV store applies.
    pub fn insert(
        &mut self,
        instrument: impl Into<String>,
        resolution_min: u32,
        bars: Vec<Bar>,
    ) -> Result<(), StoreError> {
        let instrument = instrument.into();
        if !crate::domain::is_strictly_ordered(&bars) {
            return Err(StoreError::UnorderedSeries { instrument });
        }
        if let Some(bad) = bars.iter().find(|b| !b.is_sane()) {
            return Err(StoreError::MalformedBar {
                instrument,
                detail: format!("inconsistent OHLC at {}", bad.ts),
            });
        }
        self.series.insert((instrument, resolution_min), bars);
        Ok(())
    }
}

impl BarStore for InMemoryBarStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        instrument: &str,
        resolution_min: u32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Bar>, StoreError> {
        let bars = self
            .series
            .get(&(instrument.to_string(), resolution_min))
            .ok_or_else(|| StoreError::UnknownSeries {
                instrument: instrument.to_string(),
                resolution_min,
            })?;
        Ok(slice_range(bars, start, end).to_vec())
    }
}

/// Binary-search the half-open `[start, end)` range of a sorted series.
pub(crate) fn slice_range(bars: &[Bar], start: NaiveDateTime, end: NaiveDateTime) -> &[Bar] {
    let lo = bars.partition_point(|b| b.ts < start);
    let hi = bars.partition_point(|b| b.ts < end);
    &bars[lo..hi]
}
