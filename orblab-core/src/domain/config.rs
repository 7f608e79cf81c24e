//! TradeConfig — the full parameter set for one simulation, validated before
//! any bar is read.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the protective stop sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMode {
    /// Opposite range boundary (low for UP, high for DOWN).
    Full,
    /// Range midpoint, offset by the buffer toward the entry side and
    /// clamped at the opposite boundary.
    Half,
}

/// How risk distance is measured.
///
/// The two conventions diverge when entry slippage is large relative to the
/// range; one convention applies per run, never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAnchor {
    /// risk = |breakout boundary - stop|, independent of entry price.
    Range,
    /// risk = |entry price - stop|.
    Entry,
}

/// How a timed-out trade (no stop or target touched) is accounted.
///
/// Required configuration with no default: the accounting choice changes
/// every summary statistic, so it must be explicit in the run file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Timeout counts as a full loss: R = -1.
    FullLoss,
    /// Timeout realizes the actual price delta in R units (any sign).
    RealizedR,
}

/// Validation errors for a `TradeConfig`. Fatal: raised at setup, before any
/// simulation runs.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("risk:reward must be positive and finite, got {0}")]
    NonPositiveRiskReward(f64),
    #[error("buffer ticks must be non-negative and finite, got {0}")]
    NegativeBuffer(f64),
    #[error("max stop ticks must be positive and finite, got {0}")]
    NonPositiveMaxStop(f64),
    #[error("bar resolution must be at least 1 minute")]
    ZeroResolution,
    #[error("tick size must be positive and finite, got {0}")]
    NonPositiveTickSize(f64),
}

/// Immutable parameter set for one simulation, supplied whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Bar resolution in minutes.
    pub resolution_min: u32,
    /// Consecutive confirming closes required. 0 means the first close
    /// beyond either boundary triggers immediately.
    pub confirm_bars: u32,
    /// Target distance as a multiple of risk distance.
    pub risk_reward: f64,
    pub stop_mode: StopMode,
    /// Half-mode stop offset, in ticks, applied toward the entry side.
    pub buffer_ticks: f64,
    /// Optional cap on risk distance in ticks; wider setups are skipped.
    pub max_stop_ticks: Option<f64>,
    pub risk_anchor: RiskAnchor,
    pub timeout_policy: TimeoutPolicy,
}

impl TradeConfig {
    /// Reject illegal parameter values before any bar is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution_min == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !self.risk_reward.is_finite() || self.risk_reward <= 0.0 {
            return Err(ConfigError::NonPositiveRiskReward(self.risk_reward));
        }
        if !self.buffer_ticks.is_finite() || self.buffer_ticks < 0.0 {
            return Err(ConfigError::NegativeBuffer(self.buffer_ticks));
        }
        if let Some(max_stop) = self.max_stop_ticks {
            if !max_stop.is_finite() || max_stop <= 0.0 {
                return Err(ConfigError::NonPositiveMaxStop(max_stop));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_config() -> TradeConfig {
        TradeConfig {
            resolution_min: 5,
            confirm_bars: 1,
            risk_reward: 2.0,
            stop_mode: StopMode::Full,
            buffer_ticks: 0.0,
            max_stop_ticks: None,
            risk_anchor: RiskAnchor::Range,
            timeout_policy: TimeoutPolicy::FullLoss,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(sample_config().validate(), Ok(()));
    }

    #[test]
    fn zero_confirm_bars_is_legal() {
        let mut cfg = sample_config();
        cfg.confirm_bars = 0;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn non_positive_risk_reward_rejected() {
        let mut cfg = sample_config();
        cfg.risk_reward = 0.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositiveRiskReward(0.0))
        );
        cfg.risk_reward = -1.5;
        assert!(cfg.validate().is_err());
        cfg.risk_reward = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_buffer_rejected() {
        let mut cfg = sample_config();
        cfg.buffer_ticks = -1.0;
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeBuffer(-1.0)));
    }

    #[test]
    fn non_positive_max_stop_rejected() {
        let mut cfg = sample_config();
        cfg.max_stop_ticks = Some(0.0);
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveMaxStop(0.0)));
    }

    #[test]
    fn timeout_policy_has_no_serde_default() {
        // A config file that omits timeout_policy must fail to parse.
        let json = r#"{
            "resolution_min": 5,
            "confirm_bars": 1,
            "risk_reward": 2.0,
            "stop_mode": "full",
            "buffer_ticks": 0.0,
            "max_stop_ticks": null,
            "risk_anchor": "range"
        }"#;
        assert!(serde_json::from_str::<TradeConfig>(json).is_err());
    }

    #[test]
    fn config_serialization_roundtrip() {
        let cfg = sample_config();
        let json = serde_json::to_string(&cfg).unwrap();
        let deser: TradeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, deser);
    }
}
