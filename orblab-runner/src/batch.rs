//! Batch driver — checkpointed, embarrassingly parallel sweep over
//! (day, session, config) keys.
//!
//! Work unit: one (day, session, resolution). Bars are fetched once per unit
//! and every config at that resolution runs against the same slice. Units
//! are independent and run on the rayon pool; a unit's data error is caught,
//! attributed to its key, and recorded without halting siblings. Keys found
//! in the checkpoint are skipped entirely.
//!
//! The driver never writes the checkpoint itself: completed hashes come back
//! in `BatchOutput` and the caller records them only after the rows are
//! durably exported. A key can therefore never be marked done while its row
//! is missing from disk; the worst crash window re-simulates keys whose rows
//! the export merge then replaces.

use rayon::prelude::*;

use orblab_core::data::BarStore;
use orblab_core::domain::{KeyHash, SimKey, SimulatedTrade, TradeConfig};
use orblab_core::sim::simulate_session;

use crate::checkpoint::Checkpoint;
use crate::config::{RunConfig, SessionConfig};
use crate::report::{BatchSummary, UnitError};

/// Progress callback for batch runs.
pub trait BatchProgress: Send + Sync {
    /// Called when a work unit finishes (successfully or not).
    fn on_unit_complete(&self, unit: &str, index: usize, total: usize);

    /// Called once when the whole batch is done.
    fn on_batch_complete(&self, summary: &BatchSummary);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl BatchProgress for StdoutProgress {
    fn on_unit_complete(&self, unit: &str, index: usize, total: usize) {
        println!("[{}/{}] {unit}", index + 1, total);
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        println!("{summary}");
    }
}

/// Silent progress reporter for tests and library callers.
pub struct NullProgress;

impl BatchProgress for NullProgress {
    fn on_unit_complete(&self, _unit: &str, _index: usize, _total: usize) {}
    fn on_batch_complete(&self, _summary: &BatchSummary) {}
}

/// Everything a completed batch hands back to the caller.
#[derive(Debug)]
pub struct BatchOutput {
    pub trades: Vec<SimulatedTrade>,
    /// Hashes of keys simulated without error. Record these in the
    /// checkpoint only after `trades` has been exported.
    pub completed: Vec<KeyHash>,
    pub summary: BatchSummary,
}

/// One unit's worth of results, merged after the parallel phase.
struct UnitOutput {
    trades: Vec<SimulatedTrade>,
    completed: Vec<KeyHash>,
    summary: BatchSummary,
}

/// Run the full batch described by `config` against `store`.
///
/// The checkpoint is consulted before simulating; keys already listed are
/// skipped. Newly completed hashes are returned, not recorded — the caller
/// records them once the corresponding rows are on disk.
pub fn run_batch(
    store: &dyn BarStore,
    config: &RunConfig,
    checkpoint: &Checkpoint,
    progress: &dyn BatchProgress,
) -> anyhow::Result<BatchOutput> {
    let configs = config
        .grid
        .generate(config.run.risk_anchor, config.run.timeout_policy);

    let mut resolutions: Vec<u32> = configs.iter().map(|c| c.resolution_min).collect();
    resolutions.sort_unstable();
    resolutions.dedup();

    // (day, session, resolution) units; bars are fetched once per unit.
    let mut units = Vec::new();
    for day in config.days() {
        for session in &config.sessions {
            for &resolution in &resolutions {
                units.push((day, session, resolution));
            }
        }
    }
    let total = units.len();

    let counter = std::sync::atomic::AtomicUsize::new(0);
    let outputs: Vec<UnitOutput> = units
        .par_iter()
        .map(|&(day, session, resolution)| {
            let out = run_unit(store, config, &configs, day, session, resolution, checkpoint);
            let index = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            progress.on_unit_complete(&format!("{day}/{}/{}m", session.code, resolution), index, total);
            out
        })
        .collect();

    let mut trades = Vec::new();
    let mut summary = BatchSummary::default();
    let mut completed = Vec::new();
    for out in outputs {
        trades.extend(out.trades);
        completed.extend(out.completed);
        summary.merge(out.summary);
    }

    progress.on_batch_complete(&summary);
    Ok(BatchOutput {
        trades,
        completed,
        summary,
    })
}

/// Simulate every non-checkpointed config of one (day, session, resolution).
fn run_unit(
    store: &dyn BarStore,
    run_config: &RunConfig,
    configs: &[TradeConfig],
    day: chrono::NaiveDate,
    session: &SessionConfig,
    resolution: u32,
    checkpoint: &Checkpoint,
) -> UnitOutput {
    let mut out = UnitOutput {
        trades: Vec::new(),
        completed: Vec::new(),
        summary: BatchSummary::default(),
    };

    // Build the keys for this unit, dropping already-checkpointed ones.
    let mut pending: Vec<(SimKey, KeyHash)> = Vec::new();
    for config in configs.iter().filter(|c| c.resolution_min == resolution) {
        let key = SimKey {
            day,
            session: session.code.clone(),
            config: config.clone(),
        };
        let hash = key.hash();
        if checkpoint.contains(&hash) {
            out.summary.already_done += 1;
        } else {
            pending.push((key, hash));
        }
    }
    if pending.is_empty() {
        return out;
    }

    // One fetch per unit: window start through the session close horizon.
    let window = session.to_window();
    let (fetch_start, _) = window.bounds(day);
    let fetch_end = session.close_instant(day);
    let bars = match store.fetch(&run_config.run.instrument, resolution, fetch_start, fetch_end) {
        Ok(bars) => bars,
        Err(err) => {
            // The whole unit fails; none of its keys are checkpointed, so a
            // re-run retries them once the data is fixed.
            out.summary.errors.push(UnitError {
                key: format!("{day}/{}/{}m", session.code, resolution),
                message: err.to_string(),
            });
            return out;
        }
    };

    for (key, hash) in pending {
        match simulate_session(&key, &window, &bars, run_config.run.tick_size) {
            Ok(trade) => {
                out.summary.tally(&trade);
                out.trades.push(trade);
                out.completed.push(hash);
            }
            Err(err) => {
                out.summary.errors.push(UnitError {
                    key: key.to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
    out
}
