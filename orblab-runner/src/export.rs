//! Result export — one CSV row per (day, session, config) key.
//!
//! Writes are merges: existing rows are loaded, rows for re-simulated keys
//! are replaced in place, and the file is rewritten sorted. The same key can
//! never appear twice.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use orblab_core::domain::SimulatedTrade;

/// Flat persisted form of a `SimulatedTrade`. Skipped keys leave the price,
/// risk, and excursion columns empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRow {
    pub key_hash: String,
    pub date: String,
    pub session: String,

    // ── Config (part of the primary key) ──
    pub resolution_min: u32,
    pub confirm_bars: u32,
    pub risk_reward: f64,
    pub stop_mode: String,
    pub buffer_ticks: f64,
    pub max_stop_ticks: Option<f64>,
    pub risk_anchor: String,
    pub timeout_policy: String,

    // ── Outcome ──
    pub outcome: String,
    pub direction: Option<String>,
    pub entry_ts: Option<String>,
    pub entry_price: Option<f64>,
    pub entry_delay_bars: Option<u32>,
    pub stop_price: Option<f64>,
    pub target_price: Option<f64>,
    pub risk_ticks: Option<f64>,
    pub exit_reason: Option<String>,
    pub exit_price: Option<f64>,
    pub bars_held: Option<u32>,
    pub r_multiple: Option<f64>,
    pub mae_r: Option<f64>,
    pub mfe_r: Option<f64>,
}

impl From<&SimulatedTrade> for ResultRow {
    fn from(trade: &SimulatedTrade) -> Self {
        let config = &trade.config;
        Self {
            key_hash: trade.key().hash().to_string(),
            date: trade.day.to_string(),
            session: trade.session.clone(),
            resolution_min: config.resolution_min,
            confirm_bars: config.confirm_bars,
            risk_reward: config.risk_reward,
            stop_mode: enum_label(&config.stop_mode),
            buffer_ticks: config.buffer_ticks,
            max_stop_ticks: config.max_stop_ticks,
            risk_anchor: enum_label(&config.risk_anchor),
            timeout_policy: enum_label(&config.timeout_policy),
            outcome: trade.outcome.label().to_string(),
            direction: trade.direction.as_ref().map(enum_label),
            entry_ts: trade.entry_ts.map(|ts| ts.to_string()),
            entry_price: trade.entry_price,
            entry_delay_bars: trade.entry_delay_bars,
            stop_price: trade.stop_price,
            target_price: trade.target_price,
            risk_ticks: trade.risk_ticks,
            exit_reason: trade.exit_reason.as_ref().map(enum_label),
            exit_price: trade.exit_price,
            bars_held: trade.bars_held,
            r_multiple: trade.r_multiple,
            mae_r: trade.mae_r,
            mfe_r: trade.mfe_r,
        }
    }
}

/// Serde rename string of a unit enum variant (e.g. `StopMode::Half` →
/// `"half"`).
fn enum_label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Merge `trades` into the CSV at `path`, replacing rows whose key already
/// exists. Rows are written sorted by (date, session, key hash) so output is
/// deterministic regardless of worker scheduling.
pub fn write_results(path: &Path, trades: &[SimulatedTrade]) -> Result<usize> {
    let mut by_key: BTreeMap<(String, String, String), ResultRow> = BTreeMap::new();

    if path.exists() {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open results {}", path.display()))?;
        for row in reader.deserialize::<ResultRow>() {
            let row = row.context("malformed existing results row")?;
            by_key.insert(
                (row.date.clone(), row.session.clone(), row.key_hash.clone()),
                row,
            );
        }
    }

    for trade in trades {
        let row = ResultRow::from(trade);
        by_key.insert(
            (row.date.clone(), row.session.clone(), row.key_hash.clone()),
            row,
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create results {}", path.display()))?;
    for row in by_key.values() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(by_key.len())
}
