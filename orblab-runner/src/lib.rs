//! ORB Lab Runner — batch orchestration over the core simulator.
//!
//! - TOML run configuration (instrument, sessions, parameter grid)
//! - Grid expansion into concrete trade configs
//! - Checkpointed, rayon-parallel batch driver with per-unit failure
//!   isolation
//! - CSV result export with replace-not-duplicate merge semantics
//! - Per-outcome batch summary

pub mod batch;
pub mod checkpoint;
pub mod config;
pub mod export;
pub mod grid;
pub mod report;

pub use batch::{run_batch, BatchOutput, BatchProgress, NullProgress, StdoutProgress};
pub use checkpoint::Checkpoint;
pub use config::{RunConfig, RunConfigError, SessionConfig};
pub use export::{write_results, ResultRow};
pub use grid::ParamGrid;
pub use report::{BatchSummary, UnitError};
