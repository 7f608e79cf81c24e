//! Trade executor — the forward scan from entry to stop, target, or timeout.

use crate::domain::{Bar, Direction, ExitReason};

/// Result of the forward scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanResult {
    pub exit_reason: ExitReason,
    pub exit_price: f64,
    /// Bars from the entry bar (inclusive) to the exit bar (inclusive).
    pub bars_held: u32,
    /// Worst excursion against the position, in R units. Never negative.
    pub mae_r: f64,
    /// Best excursion in favor of the position, in R units. Never negative.
    pub mfe_r: f64,
}

/// Walk bars forward from the entry bar (inclusive) until stop, target, or
/// the end of the horizon.
///
/// Excursions are taken from each bar's high/low and accumulate monotonically
/// before the touch check, so the exit bar's adverse/favorable extent is
/// included. If a single bar's range contains both stop and target, the stop
/// executes first: the conservative tie-break, applied unconditionally.
///
/// The first element of `bars` is the entry bar. A scan that reaches the end
/// of the slice without a touch times out and exits at the last bar's close;
/// an empty horizon times out immediately at the entry price.
pub fn scan(
    bars: &[Bar],
    direction: Direction,
    entry_price: f64,
    stop: f64,
    target: f64,
    risk_price: f64,
) -> ScanResult {
    debug_assert!(risk_price > 0.0);

    if bars.is_empty() {
        return ScanResult {
            exit_reason: ExitReason::Timeout,
            exit_price: entry_price,
            bars_held: 0,
            mae_r: 0.0,
            mfe_r: 0.0,
        };
    }

    let mut mae_r: f64 = 0.0;
    let mut mfe_r: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let (adverse, favorable, stop_hit, target_hit) = match direction {
            Direction::Up => (
                entry_price - bar.low,
                bar.high - entry_price,
                bar.low <= stop,
                bar.high >= target,
            ),
            Direction::Down => (
                bar.high - entry_price,
                entry_price - bar.low,
                bar.high >= stop,
                bar.low <= target,
            ),
        };

        mae_r = mae_r.max(adverse / risk_price);
        mfe_r = mfe_r.max(favorable / risk_price);

        // Stop before target on the same bar.
        if stop_hit {
            return ScanResult {
                exit_reason: ExitReason::Stop,
                exit_price: stop,
                bars_held: (i + 1) as u32,
                mae_r,
                mfe_r,
            };
        }
        if target_hit {
            return ScanResult {
                exit_reason: ExitReason::Target,
                exit_price: target,
                bars_held: (i + 1) as u32,
                mae_r,
                mfe_r,
            };
        }
    }

    let last = &bars[bars.len() - 1];
    ScanResult {
        exit_reason: ExitReason::Timeout,
        exit_price: last.close,
        bars_held: bars.len() as u32,
        mae_r,
        mfe_r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(specs: &[(f64, f64, f64)]) -> Vec<Bar> {
        // (high, low, close) per bar, one minute apart.
        let base = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        specs
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close))| Bar {
                ts: base + chrono::Duration::minutes(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 100,
            })
            .collect()
    }

    #[test]
    fn target_touch_exits_at_target() {
        let bars = bars(&[(2505.0, 2500.0, 2503.0), (2527.0, 2502.0, 2520.0)]);
        let r = scan(&bars, Direction::Up, 2502.0, 2490.0, 2526.0, 12.0);
        assert_eq!(r.exit_reason, ExitReason::Target);
        assert_eq!(r.exit_price, 2526.0);
        assert_eq!(r.bars_held, 2);
    }

    #[test]
    fn stop_touch_exits_at_stop() {
        let bars = bars(&[(2505.0, 2489.0, 2495.0)]);
        let r = scan(&bars, Direction::Up, 2502.0, 2490.0, 2526.0, 12.0);
        assert_eq!(r.exit_reason, ExitReason::Stop);
        assert_eq!(r.exit_price, 2490.0);
        assert_eq!(r.bars_held, 1);
    }

    #[test]
    fn same_bar_ambiguity_resolves_to_stop() {
        // One bar spans both the stop (2490) and the target (2526).
        let bars = bars(&[(2530.0, 2489.0, 2500.0)]);
        let r = scan(&bars, Direction::Up, 2502.0, 2490.0, 2526.0, 12.0);
        assert_eq!(r.exit_reason, ExitReason::Stop);
    }

    #[test]
    fn empty_horizon_times_out_at_entry() {
        let r = scan(&[], Direction::Up, 2502.0, 2490.0, 2526.0, 12.0);
        assert_eq!(r.exit_reason, ExitReason::Timeout);
        assert_eq!(r.exit_price, 2502.0);
        assert_eq!(r.bars_held, 0);
        assert_eq!(r.mae_r, 0.0);
        assert_eq!(r.mfe_r, 0.0);
    }

    #[test]
    fn timeout_exits_at_last_close() {
        let bars = bars(&[(2505.0, 2500.0, 2503.0), (2506.0, 2501.0, 2504.5)]);
        let r = scan(&bars, Direction::Up, 2502.0, 2490.0, 2526.0, 12.0);
        assert_eq!(r.exit_reason, ExitReason::Timeout);
        assert_eq!(r.exit_price, 2504.5);
        assert_eq!(r.bars_held, 2);
    }

    #[test]
    fn excursions_are_nonnegative_and_monotone() {
        let specs = [
            (2505.0, 2499.0, 2503.0),
            (2508.0, 2497.0, 2505.0),
            (2510.0, 2495.0, 2507.0),
        ];
        let all = bars(&specs);
        let mut prev_mae = 0.0;
        let mut prev_mfe = 0.0;
        for n in 1..=all.len() {
            let r = scan(&all[..n], Direction::Up, 2502.0, 2490.0, 2600.0, 12.0);
            assert!(r.mae_r >= prev_mae);
            assert!(r.mfe_r >= prev_mfe);
            assert!(r.mae_r >= 0.0 && r.mfe_r >= 0.0);
            prev_mae = r.mae_r;
            prev_mfe = r.mfe_r;
        }
    }

    #[test]
    fn down_direction_mirrors() {
        let bars = bars(&[(2489.0, 2480.0, 2485.0), (2491.0, 2463.0, 2470.0)]);
        // Down entry 2488, stop 2500, target 2464, risk 12.
        let r = scan(&bars, Direction::Down, 2488.0, 2500.0, 2464.0, 12.0);
        assert_eq!(r.exit_reason, ExitReason::Target);
        assert_eq!(r.exit_price, 2464.0);
    }

    #[test]
    fn exit_bar_excursion_is_included() {
        // The stop bar also makes a new favorable extreme first.
        let bars = bars(&[(2514.0, 2489.0, 2500.0)]);
        let r = scan(&bars, Direction::Up, 2502.0, 2490.0, 2600.0, 12.0);
        assert_eq!(r.exit_reason, ExitReason::Stop);
        assert!((r.mfe_r - 1.0).abs() < 1e-12); // (2514-2502)/12
        assert!((r.mae_r - (2502.0 - 2489.0) / 12.0).abs() < 1e-12);
    }
}
