//! Serializable run configuration (TOML).
//!
//! A run file names the instrument, date range, sessions, and the parameter
//! grid. The risk-anchoring convention and timeout policy are whole-run
//! scalars, not grid axes — one run can never mix anchoring conventions.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use orblab_core::domain::{ConfigError, RiskAnchor, SessionWindow, TimeoutPolicy};

use crate::grid::ParamGrid;

/// Errors raised while loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum RunConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid trade config: {0}")]
    Trade(#[from] ConfigError),

    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no sessions configured")]
    NoSessions,

    #[error("duplicate session code '{0}'")]
    DuplicateSession(String),

    #[error("session '{0}' closes before its range window ends")]
    CloseInsideWindow(String),

    #[error("parameter grid is empty")]
    EmptyGrid,
}

/// One session table in the run file.
///
/// `[start, end)` is the range window; `close` is the session's hard
/// horizon — the scan stops there and anything still open times out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub code: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub close: NaiveTime,
}

impl SessionConfig {
    pub fn to_window(&self) -> SessionWindow {
        SessionWindow::new(self.code.clone(), self.start, self.end)
    }

    /// The horizon instant for one trading day, on the same midnight-crossing
    /// rules as the window itself.
    pub fn close_instant(&self, day: chrono::NaiveDate) -> chrono::NaiveDateTime {
        if self.close <= self.start {
            (day + chrono::Duration::days(1)).and_time(self.close)
        } else {
            day.and_time(self.close)
        }
    }
}

/// The `[run]` table: instrument, pricing, and date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    pub instrument: String,
    pub tick_size: f64,
    /// Inclusive.
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub risk_anchor: RiskAnchor,
    pub timeout_policy: TimeoutPolicy,
}

/// Complete configuration of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub run: RunSection,
    pub sessions: Vec<SessionConfig>,
    pub grid: ParamGrid,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, RunConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, RunConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject illegal values before any bar is read.
    pub fn validate(&self) -> Result<(), RunConfigError> {
        if self.run.start_date > self.run.end_date {
            return Err(RunConfigError::InvertedDateRange {
                start: self.run.start_date,
                end: self.run.end_date,
            });
        }
        if !self.run.tick_size.is_finite() || self.run.tick_size <= 0.0 {
            return Err(ConfigError::NonPositiveTickSize(self.run.tick_size).into());
        }
        if self.sessions.is_empty() {
            return Err(RunConfigError::NoSessions);
        }
        let mut codes: Vec<&str> = self.sessions.iter().map(|s| s.code.as_str()).collect();
        codes.sort_unstable();
        if let Some(dup) = codes.windows(2).find(|w| w[0] == w[1]) {
            return Err(RunConfigError::DuplicateSession(dup[0].to_string()));
        }
        for session in &self.sessions {
            let probe = self.run.start_date;
            let (_, window_end) = session.to_window().bounds(probe);
            if session.close_instant(probe) < window_end {
                return Err(RunConfigError::CloseInsideWindow(session.code.clone()));
            }
        }

        let configs = self
            .grid
            .generate(self.run.risk_anchor, self.run.timeout_policy);
        if configs.is_empty() {
            return Err(RunConfigError::EmptyGrid);
        }
        for config in &configs {
            config.validate()?;
        }
        Ok(())
    }

    /// All calendar days in the configured range, inclusive.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut day = self.run.start_date;
        while day <= self.run.end_date {
            days.push(day);
            day += chrono::Duration::days(1);
        }
        days
    }
}
