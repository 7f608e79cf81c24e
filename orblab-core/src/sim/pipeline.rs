//! Pipeline — wires the five stages for one (day, session, config) key.

use crate::domain::{
    is_strictly_ordered, Bar, SessionWindow, SimError, SimKey, SimulatedTrade, SkipReason,
};
use crate::sim::classify::{classify, Entry};
use crate::sim::{breakout, executor, range_window, risk};

/// Run the full range → breakout → risk → scan → classify pipeline.
///
/// `bars` is the pre-fetched, timestamp-ordered slice covering the session
/// window and the scan horizon (typically through the session close); the
/// end of the slice is the timeout horizon. Reads nothing else: the same key
/// over the same bars always reproduces the identical record.
///
/// Skip conditions come back as `Ok` records; only data errors (unordered
/// bars, inconsistent OHLC, degenerate risk) are `Err`.
pub fn simulate_session(
    key: &SimKey,
    window: &SessionWindow,
    bars: &[Bar],
    tick_size: f64,
) -> Result<SimulatedTrade, SimError> {
    if !is_strictly_ordered(bars) {
        return Err(SimError::UnorderedBars);
    }
    // Whole-slice sanity check: a bad bar anywhere (window, entry, or scan
    // path) is a data error for this unit.
    if let Some(bad) = bars.iter().find(|b| !b.is_sane()) {
        return Err(SimError::InsaneBar { ts: bad.ts });
    }

    let Some(range) = range_window::compute_range(bars, key.day, window)? else {
        return Ok(SimulatedTrade::skipped(key, SkipReason::NoRange));
    };

    let scan_start = range_window::first_index_after_window(bars, key.day, window);
    let scan_bars = &bars[scan_start..];

    let Some(hit) = breakout::detect(&range, scan_bars, key.config.confirm_bars) else {
        return Ok(SimulatedTrade::no_trade(key));
    };

    let entry_bar = &scan_bars[hit.bar_index];
    let entry = Entry {
        direction: hit.direction,
        ts: entry_bar.ts,
        price: entry_bar.close,
        delay_bars: (hit.bar_index + 1) as u32,
    };

    let plan = risk::plan(&range, entry.direction, entry.price, &key.config, tick_size)?;
    if plan.exceeds_cap(&key.config) {
        return Ok(SimulatedTrade::skipped(key, SkipReason::StopTooWide));
    }

    let scan = executor::scan(
        &scan_bars[hit.bar_index..],
        entry.direction,
        entry.price,
        plan.stop,
        plan.target,
        plan.risk_price,
    );

    Ok(classify(key, entry, plan, scan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Outcome, RiskAnchor, StopMode, TimeoutPolicy, TradeConfig};
    use chrono::{NaiveDate, NaiveTime};

    const TICK: f64 = 0.1;

    fn window() -> SessionWindow {
        SessionWindow::new(
            "RTH",
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
    }

    fn key(confirm: u32) -> SimKey {
        SimKey {
            day: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            session: "RTH".into(),
            config: TradeConfig {
                resolution_min: 5,
                confirm_bars: confirm,
                risk_reward: 2.0,
                stop_mode: StopMode::Full,
                buffer_ticks: 0.0,
                max_stop_ticks: None,
                risk_anchor: RiskAnchor::Entry,
                timeout_policy: TimeoutPolicy::FullLoss,
            },
        }
    }

    /// (hour, minute, high, low, close) bars with open = close.
    fn bars(specs: &[(u32, u32, f64, f64, f64)]) -> Vec<Bar> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        specs
            .iter()
            .map(|&(h, m, high, low, close)| Bar {
                ts: day.and_hms_opt(h, m, 0).unwrap(),
                open: close,
                high,
                low,
                close,
                volume: 100,
            })
            .collect()
    }

    fn winning_day() -> Vec<Bar> {
        bars(&[
            // Window bars → range [2490, 2500].
            (9, 30, 2500.0, 2492.0, 2498.0),
            (9, 45, 2499.0, 2490.0, 2495.0),
            // Breakout close above the high.
            (10, 0, 2503.0, 2496.0, 2502.0),
            // Runs to the 2526 target.
            (10, 5, 2530.0, 2501.0, 2528.0),
        ])
    }

    #[test]
    fn full_winning_trade() {
        let rec = simulate_session(&key(1), &window(), &winning_day(), TICK).unwrap();
        assert_eq!(rec.outcome, Outcome::Win);
        assert_eq!(rec.direction, Some(crate::domain::Direction::Up));
        assert_eq!(rec.entry_price, Some(2502.0));
        assert_eq!(rec.stop_price, Some(2490.0));
        // entry-anchored: risk 12.0 → 120 ticks, target 2526.
        assert_eq!(rec.risk_ticks, Some(120.0));
        assert_eq!(rec.target_price, Some(2526.0));
        assert_eq!(rec.entry_delay_bars, Some(1));
        assert_eq!(rec.r_multiple, Some(2.0));
    }

    #[test]
    fn no_window_bars_skips_no_range() {
        let day_bars = bars(&[(11, 0, 2500.0, 2490.0, 2495.0)]);
        let rec = simulate_session(&key(1), &window(), &day_bars, TICK).unwrap();
        assert_eq!(rec.outcome, Outcome::Skipped(SkipReason::NoRange));
    }

    #[test]
    fn no_breakout_is_no_trade() {
        let day_bars = bars(&[
            (9, 30, 2500.0, 2490.0, 2495.0),
            (10, 0, 2499.0, 2491.0, 2495.0),
            (10, 5, 2498.0, 2492.0, 2494.0),
        ]);
        let rec = simulate_session(&key(1), &window(), &day_bars, TICK).unwrap();
        assert_eq!(rec.outcome, Outcome::NoTrade);
        assert!(rec.entry_price.is_none());
    }

    #[test]
    fn wide_stop_skips_before_simulating() {
        let mut k = key(1);
        k.config.max_stop_ticks = Some(100.0); // risk is 120 ticks
        let rec = simulate_session(&k, &window(), &winning_day(), TICK).unwrap();
        assert_eq!(rec.outcome, Outcome::Skipped(SkipReason::StopTooWide));
        assert!(rec.r_multiple.is_none());
    }

    #[test]
    fn insane_bar_in_scan_path_is_a_data_error() {
        // The bad bar sits after the entry bar, on the scan path only.
        let mut day_bars = winning_day();
        day_bars[3].high = day_bars[3].low - 1.0;
        let err = simulate_session(&key(1), &window(), &day_bars, TICK);
        assert!(matches!(err, Err(SimError::InsaneBar { .. })));
    }

    #[test]
    fn unordered_bars_are_a_data_error() {
        let mut day_bars = winning_day();
        day_bars.swap(0, 1);
        let err = simulate_session(&key(1), &window(), &day_bars, TICK);
        assert_eq!(err, Err(SimError::UnorderedBars));
    }

    #[test]
    fn rerun_is_byte_identical() {
        let day_bars = winning_day();
        let a = simulate_session(&key(1), &window(), &day_bars, TICK).unwrap();
        let b = simulate_session(&key(1), &window(), &day_bars, TICK).unwrap();
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn bars_after_exit_do_not_change_outcome() {
        let mut day_bars = winning_day();
        let baseline = simulate_session(&key(1), &window(), &day_bars, TICK).unwrap();

        // Mutate everything strictly after the exit bar.
        day_bars.push(Bar {
            ts: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(10, 10, 0)
                .unwrap(),
            open: 1000.0,
            high: 1000.0,
            low: 1.0,
            close: 500.0,
            volume: 1,
        });
        let mutated = simulate_session(&key(1), &window(), &day_bars, TICK).unwrap();
        assert_eq!(baseline, mutated);
    }
}
