//! Property tests for parameter grid expansion.

use proptest::prelude::*;

use orblab_core::domain::{RiskAnchor, StopMode, TimeoutPolicy};
use orblab_runner::ParamGrid;

/// Axes are generated as sets so no axis carries duplicate values.
fn arb_grid() -> impl Strategy<Value = ParamGrid> {
    (
        prop::collection::btree_set(1u32..=60, 1..4),
        prop::collection::btree_set(0u32..=5, 1..4),
        prop::collection::btree_set(1u32..=20, 1..4),
        prop::sample::subsequence(vec![StopMode::Full, StopMode::Half], 1..=2),
        prop::collection::btree_set(0u32..=100, 1..4),
        prop::collection::btree_set(1u32..=500, 0..3),
    )
        .prop_map(
            |(resolutions, confirms, rr_quarters, stop_modes, buffers, caps)| ParamGrid {
                resolutions_min: resolutions.into_iter().collect(),
                confirm_bars: confirms.into_iter().collect(),
                risk_rewards: rr_quarters.into_iter().map(|q| q as f64 * 0.25).collect(),
                stop_modes,
                buffer_ticks: buffers.into_iter().map(f64::from).collect(),
                max_stop_ticks: caps.into_iter().map(f64::from).collect(),
            },
        )
}

proptest! {
    /// `size()` always agrees with the number of configs `generate` emits.
    #[test]
    fn size_agrees_with_generate(grid in arb_grid()) {
        let configs = grid.generate(RiskAnchor::Entry, TimeoutPolicy::FullLoss);
        prop_assert_eq!(configs.len(), grid.size());
    }

    /// Every generated config passes validation, and the expansion never
    /// emits two configs with the same key content.
    #[test]
    fn generated_configs_are_valid_and_distinct(grid in arb_grid()) {
        let configs = grid.generate(RiskAnchor::Range, TimeoutPolicy::RealizedR);
        for config in &configs {
            prop_assert!(config.validate().is_ok());
        }
        let mut encodings: Vec<String> = configs
            .iter()
            .map(|c| serde_json::to_string(c).unwrap())
            .collect();
        encodings.sort();
        let before = encodings.len();
        encodings.dedup();
        prop_assert_eq!(encodings.len(), before, "duplicate configs in expansion");
    }
}
