//! Batch summary — per-outcome counts so data gaps are observable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use orblab_core::domain::SimulatedTrade;

/// One failed unit: the offending key and the error it raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitError {
    pub key: String,
    pub message: String,
}

/// Counts for a completed batch run.
///
/// Every simulated key lands in exactly one outcome bucket; data errors are
/// counted separately; checkpointed keys are reported as skipped so a resumed
/// run's arithmetic adds up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub outcome_counts: BTreeMap<String, usize>,
    pub errors: Vec<UnitError>,
    pub already_done: usize,
}

impl BatchSummary {
    pub fn tally(&mut self, trade: &SimulatedTrade) {
        *self
            .outcome_counts
            .entry(trade.outcome.label().to_string())
            .or_insert(0) += 1;
    }

    pub fn simulated(&self) -> usize {
        self.outcome_counts.values().sum()
    }

    pub fn merge(&mut self, other: BatchSummary) {
        for (label, count) in other.outcome_counts {
            *self.outcome_counts.entry(label).or_insert(0) += count;
        }
        self.errors.extend(other.errors);
        self.already_done += other.already_done;
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Batch Summary ===")?;
        writeln!(f, "Simulated:      {}", self.simulated())?;
        writeln!(f, "From checkpoint:{}", self.already_done)?;
        for (label, count) in &self.outcome_counts {
            writeln!(f, "  {label:<22} {count}")?;
        }
        writeln!(f, "Errors:         {}", self.errors.len())?;
        for err in &self.errors {
            writeln!(f, "  {}: {}", err.key, err.message)?;
        }
        Ok(())
    }
}
