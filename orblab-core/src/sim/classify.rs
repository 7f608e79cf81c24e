//! Outcome classifier — folds the stage results into one trade record.
//!
//! Pure mapping: no side effects beyond record construction.

use chrono::NaiveDateTime;

use crate::domain::{
    Direction, ExitReason, Outcome, RiskAnchor, SimKey, SimulatedTrade, TimeoutPolicy,
};
use crate::sim::executor::ScanResult;
use crate::sim::risk::RiskPlan;

/// Entry details carried from the breakout detector into classification.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub direction: Direction,
    pub ts: NaiveDateTime,
    pub price: f64,
    /// 1-based count of bars between the window end and the entry bar.
    pub delay_bars: u32,
}

/// Build the full (non-skip) trade record for a completed scan.
pub fn classify(key: &SimKey, entry: Entry, plan: RiskPlan, scan: ScanResult) -> SimulatedTrade {
    let signed_delta = match entry.direction {
        Direction::Up => scan.exit_price - entry.price,
        Direction::Down => entry.price - scan.exit_price,
    };

    let (outcome, r_multiple) = match scan.exit_reason {
        ExitReason::Target => (Outcome::Win, key.config.risk_reward),
        ExitReason::Stop => {
            // Entry-anchored risk makes a stop exactly -1R; range-anchored
            // risk scales by how far the entry actually sat from the stop.
            let r = match key.config.risk_anchor {
                RiskAnchor::Entry => -1.0,
                RiskAnchor::Range => signed_delta / plan.risk_price,
            };
            (Outcome::Loss, r)
        }
        ExitReason::Timeout => match key.config.timeout_policy {
            TimeoutPolicy::FullLoss => (Outcome::Loss, -1.0),
            TimeoutPolicy::RealizedR => {
                let r = signed_delta / plan.risk_price;
                let outcome = if r > 0.0 { Outcome::Win } else { Outcome::Loss };
                (outcome, r)
            }
        },
    };

    SimulatedTrade {
        day: key.day,
        session: key.session.clone(),
        config: key.config.clone(),
        outcome,
        direction: Some(entry.direction),
        entry_ts: Some(entry.ts),
        entry_price: Some(entry.price),
        entry_delay_bars: Some(entry.delay_bars),
        stop_price: Some(plan.stop),
        target_price: Some(plan.target),
        risk_price: Some(plan.risk_price),
        risk_ticks: Some(plan.risk_ticks),
        exit_reason: Some(scan.exit_reason),
        exit_price: Some(scan.exit_price),
        bars_held: Some(scan.bars_held),
        r_multiple: Some(r_multiple),
        mae_r: Some(scan.mae_r),
        mfe_r: Some(scan.mfe_r),
    }
}
