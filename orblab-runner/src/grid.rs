//! Parameter grid — the cross product of trade-config axes for a sweep.

use serde::{Deserialize, Serialize};

use orblab_core::domain::{RiskAnchor, StopMode, TimeoutPolicy, TradeConfig};

/// Grid axes for the sweep. Risk anchor and timeout policy are deliberately
/// absent: they are run-level scalars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamGrid {
    /// Bar resolutions in minutes.
    pub resolutions_min: Vec<u32>,
    pub confirm_bars: Vec<u32>,
    pub risk_rewards: Vec<f64>,
    pub stop_modes: Vec<StopMode>,
    /// Half-mode buffers. Full-mode configs always use a zero buffer: the
    /// buffer has no effect there, and crossing it would emit duplicate
    /// rows under distinct keys.
    pub buffer_ticks: Vec<f64>,
    /// Risk caps in ticks. Empty means uncapped only.
    #[serde(default)]
    pub max_stop_ticks: Vec<f64>,
}

impl ParamGrid {
    /// Expand the grid into concrete configs under the run's conventions.
    pub fn generate(&self, anchor: RiskAnchor, timeout: TimeoutPolicy) -> Vec<TradeConfig> {
        let caps: Vec<Option<f64>> = if self.max_stop_ticks.is_empty() {
            vec![None]
        } else {
            self.max_stop_ticks.iter().copied().map(Some).collect()
        };

        let mut configs = Vec::new();
        for &resolution_min in &self.resolutions_min {
            for &confirm_bars in &self.confirm_bars {
                for &risk_reward in &self.risk_rewards {
                    for &stop_mode in &self.stop_modes {
                        let buffers: &[f64] = match stop_mode {
                            StopMode::Full => &[0.0],
                            StopMode::Half => &self.buffer_ticks,
                        };
                        for &buffer_ticks in buffers {
                            for &max_stop_ticks in &caps {
                                configs.push(TradeConfig {
                                    resolution_min,
                                    confirm_bars,
                                    risk_reward,
                                    stop_mode,
                                    buffer_ticks,
                                    max_stop_ticks,
                                    risk_anchor: anchor,
                                    timeout_policy: timeout,
                                });
                            }
                        }
                    }
                }
            }
        }
        configs
    }

    /// Number of configs `generate` will produce.
    pub fn size(&self) -> usize {
        let caps = self.max_stop_ticks.len().max(1);
        let per_mode: usize = self
            .stop_modes
            .iter()
            .map(|mode| match mode {
                StopMode::Full => 1,
                StopMode::Half => self.buffer_ticks.len(),
            })
            .sum();
        self.resolutions_min.len()
            * self.confirm_bars.len()
            * self.risk_rewards.len()
            * per_mode
            * caps
    }
}
