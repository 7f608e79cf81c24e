//! Risk model — stop, target, and risk distance from the range and config.

use crate::domain::{Direction, OpeningRange, RiskAnchor, SimError, StopMode, TradeConfig};

/// Priced risk plan for a confirmed breakout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPlan {
    pub stop: f64,
    pub target: f64,
    /// Risk distance in price units, per the configured anchoring convention.
    pub risk_price: f64,
    pub risk_ticks: f64,
}

impl RiskPlan {
    /// True when the configured cap (if any) rejects this plan.
    pub fn exceeds_cap(&self, config: &TradeConfig) -> bool {
        config
            .max_stop_ticks
            .is_some_and(|cap| self.risk_ticks > cap)
    }
}

/// Compute stop, target, and risk distance.
///
/// Half-mode stops are clamped at the opposite range boundary by
/// construction: a buffer wider than the half-range cannot silently widen
/// risk past the range.
pub fn plan(
    range: &OpeningRange,
    direction: Direction,
    entry_price: f64,
    config: &TradeConfig,
    tick_size: f64,
) -> Result<RiskPlan, SimError> {
    let buffer = config.buffer_ticks * tick_size;

    let stop = match (config.stop_mode, direction) {
        (StopMode::Full, Direction::Up) => range.low,
        (StopMode::Full, Direction::Down) => range.high,
        (StopMode::Half, Direction::Up) => range.low.max(range.midpoint() - buffer),
        (StopMode::Half, Direction::Down) => range.high.min(range.midpoint() + buffer),
    };

    let risk_price = match config.risk_anchor {
        RiskAnchor::Range => match direction {
            Direction::Up => range.high - stop,
            Direction::Down => stop - range.low,
        },
        RiskAnchor::Entry => match direction {
            Direction::Up => entry_price - stop,
            Direction::Down => stop - entry_price,
        },
    };

    if risk_price <= 0.0 {
        return Err(SimError::ZeroRisk {
            entry: entry_price,
            stop,
        });
    }

    let target = match direction {
        Direction::Up => entry_price + config.risk_reward * risk_price,
        Direction::Down => entry_price - config.risk_reward * risk_price,
    };

    Ok(RiskPlan {
        stop,
        target,
        risk_price,
        risk_ticks: risk_price / tick_size,
    })
}
