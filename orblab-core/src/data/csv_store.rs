//! CSV-backed bar store.
//!
//! Layout: one file per series under a data directory, named
//! `{instrument}_{resolution}m.csv`, with a header row of
//! `ts,open,high,low,close,volume` and ISO-8601 timestamps
//! (`2024-01-02T09:30:00`). Files are loaded and validated once at first
//! access, then served from memory by binary search.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::data::store::{slice_range, BarStore, StoreError};
use crate::domain::{is_strictly_ordered, Bar};

#[derive(Debug, Deserialize)]
struct CsvRow {
    ts: NaiveDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Directory-of-CSV-files bar store with a per-series memory cache.
pub struct CsvBarStore {
    data_dir: PathBuf,
    cache: RwLock<HashMap<(String, u32), Vec<Bar>>>,
}

impl CsvBarStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn series_path(&self, instrument: &str, resolution_min: u32) -> PathBuf {
        self.data_dir
            .join(format!("{instrument}_{resolution_min}m.csv"))
    }

    fn load_series(&self, instrument: &str, resolution_min: u32) -> Result<Vec<Bar>, StoreError> {
        let path = self.series_path(instrument, resolution_min);
        if !path.exists() {
            return Err(StoreError::UnknownSeries {
                instrument: instrument.to_string(),
                resolution_min,
            });
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let bar = Bar {
                ts: row.ts,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            };
            if !bar.is_sane() {
                return Err(StoreError::MalformedBar {
                    instrument: instrument.to_string(),
                    detail: format!("inconsistent OHLC at {}", bar.ts),
                });
            }
            bars.push(bar);
        }

        if !is_strictly_ordered(&bars) {
            return Err(StoreError::UnorderedSeries {
                instrument: instrument.to_string(),
            });
        }
        Ok(bars)
    }
}

impl BarStore for CsvBarStore {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        instrument: &str,
        resolution_min: u32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Bar>, StoreError> {
        let key = (instrument.to_string(), resolution_min);

        {
            let cache = self.cache.read().expect("cache lock poisoned");
            if let Some(bars) = cache.get(&key) {
                return Ok(slice_range(bars, start, end).to_vec());
            }
        }

        let bars = self.load_series(instrument, resolution_min)?;
        let slice = slice_range(&bars, start, end).to_vec();
        self.cache
            .write()
            .expect("cache lock poisoned")
            .insert(key, bars);
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_series(dir: &Path, name: &str, rows: &[&str]) {
        let mut content = String::from("ts,open,high,low,close,volume\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn loads_and_serves_range_queries() {
        let dir = tempfile::tempdir().unwrap();
        write_series(
            dir.path(),
            "NQ_5m.csv",
            &[
                "2024-01-02T09:30:00,2495.0,2500.0,2490.0,2498.0,1200",
                "2024-01-02T09:35:00,2498.0,2499.0,2492.0,2494.0,900",
                "2024-01-02T09:40:00,2494.0,2503.0,2493.0,2502.0,1500",
            ],
        );

        let store = CsvBarStore::new(dir.path());
        let bars = store
            .fetch("NQ", 5, ts("2024-01-02T09:30:00"), ts("2024-01-02T09:40:00"))
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 2498.0);

        // Second fetch hits the memory cache; same answer.
        let again = store
            .fetch("NQ", 5, ts("2024-01-02T09:30:00"), ts("2024-01-02T09:40:00"))
            .unwrap();
        assert_eq!(bars, again);
    }

    #[test]
    fn missing_series_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvBarStore::new(dir.path());
        let err = store.fetch("ES", 5, ts("2024-01-02T09:30:00"), ts("2024-01-02T10:00:00"));
        assert!(matches!(err, Err(StoreError::UnknownSeries { .. })));
    }

    #[test]
    fn unordered_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_series(
            dir.path(),
            "NQ_5m.csv",
            &[
                "2024-01-02T09:35:00,2498.0,2499.0,2492.0,2494.0,900",
                "2024-01-02T09:30:00,2495.0,2500.0,2490.0,2498.0,1200",
            ],
        );
        let store = CsvBarStore::new(dir.path());
        let err = store.fetch("NQ", 5, ts("2024-01-02T09:30:00"), ts("2024-01-02T10:00:00"));
        assert!(matches!(err, Err(StoreError::UnorderedSeries { .. })));
    }

    #[test]
    fn insane_row_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_series(
            dir.path(),
            "NQ_5m.csv",
            &["2024-01-02T09:30:00,2495.0,2480.0,2490.0,2498.0,1200"],
        );
        let store = CsvBarStore::new(dir.path());
        let err = store.fetch("NQ", 5, ts("2024-01-02T09:30:00"), ts("2024-01-02T10:00:00"));
        assert!(matches!(err, Err(StoreError::MalformedBar { .. })));
    }
}
