//! SimulatedTrade — the immutable output record, one per (day, session,
//! config) key.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::config::TradeConfig;
use super::key::SimKey;

/// Breakout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

/// Which terminal state ended the forward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Stop,
    Target,
    Timeout,
}

/// Why a key resolved without a trade before the simulator ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// The session window contained zero bars.
    NoRange,
    /// Risk distance in ticks exceeded the configured cap.
    StopTooWide,
}

/// Final label for a key. Exactly one per record.
///
/// `NoTrade` is the no-confirmed-breakout case (scan exhausted without N
/// qualifying closes); `Skipped` covers the pre-entry short circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    NoTrade,
    Skipped(SkipReason),
}

impl Outcome {
    /// Stable string label used in exported rows and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
            Outcome::NoTrade => "NO_TRADE",
            Outcome::Skipped(SkipReason::NoRange) => "SKIPPED_NO_RANGE",
            Outcome::Skipped(SkipReason::StopTooWide) => "SKIPPED_STOP_TOO_WIDE",
        }
    }
}

/// One labeled trade outcome per (day, session, config) key.
///
/// Skip records carry no price/risk/excursion fields; non-skip records carry
/// all of them. Re-simulating a key supersedes the prior record wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedTrade {
    // ── Key ──
    pub day: NaiveDate,
    pub session: String,
    pub config: TradeConfig,

    // ── Classification ──
    pub outcome: Outcome,
    pub direction: Option<Direction>,

    // ── Entry ──
    pub entry_ts: Option<NaiveDateTime>,
    pub entry_price: Option<f64>,
    /// Bars between the window end and the entry bar (1-based).
    pub entry_delay_bars: Option<u32>,

    // ── Risk ──
    pub stop_price: Option<f64>,
    pub target_price: Option<f64>,
    pub risk_price: Option<f64>,
    pub risk_ticks: Option<f64>,

    // ── Exit ──
    pub exit_reason: Option<ExitReason>,
    pub exit_price: Option<f64>,
    pub bars_held: Option<u32>,

    // ── Performance ──
    pub r_multiple: Option<f64>,
    pub mae_r: Option<f64>,
    pub mfe_r: Option<f64>,
}

impl SimulatedTrade {
    /// A terminal skip record: no price or R fields.
    pub fn skipped(key: &SimKey, reason: SkipReason) -> Self {
        Self::empty(key, Outcome::Skipped(reason))
    }

    /// A no-trade record: breakout never confirmed within the session.
    pub fn no_trade(key: &SimKey) -> Self {
        Self::empty(key, Outcome::NoTrade)
    }

    fn empty(key: &SimKey, outcome: Outcome) -> Self {
        Self {
            day: key.day,
            session: key.session.clone(),
            config: key.config.clone(),
            outcome,
            direction: None,
            entry_ts: None,
            entry_price: None,
            entry_delay_bars: None,
            stop_price: None,
            target_price: None,
            risk_price: None,
            risk_ticks: None,
            exit_reason: None,
            exit_price: None,
            bars_held: None,
            r_multiple: None,
            mae_r: None,
            mfe_r: None,
        }
    }

    pub fn key(&self) -> SimKey {
        SimKey {
            day: self.day,
            session: self.session.clone(),
            config: self.config.clone(),
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self.outcome, Outcome::Skipped(_))
    }
}
