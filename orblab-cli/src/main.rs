//! ORB Lab CLI — batch sweep and single-key debugging commands.
//!
//! Commands:
//! - `run` — execute a checkpointed batch sweep from a TOML run file and
//!   merge the results CSV
//! - `simulate` — run one (day, session, config) key and print the full
//!   trade record as JSON

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orblab_core::data::{BarStore, CsvBarStore};
use orblab_core::domain::{SimKey, StopMode, TradeConfig};
use orblab_core::sim::simulate_session;
use orblab_runner::{
    run_batch, write_results, BatchProgress, Checkpoint, NullProgress, RunConfig, StdoutProgress,
};

#[derive(Parser)]
#[command(name = "orblab", about = "ORB Lab — opening range breakout workbench")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a batch sweep from a TOML run file.
    Run {
        /// Path to the TOML run file.
        #[arg(long)]
        config: PathBuf,

        /// Directory of bar CSVs ({instrument}_{resolution}m.csv).
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Output directory for results.csv and the checkpoint.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Discard the checkpoint and recompute every key.
        #[arg(long, default_value_t = false)]
        no_resume: bool,

        /// Suppress per-unit progress lines.
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Simulate one (day, session, config) key and print it as JSON.
    Simulate {
        /// Path to the TOML run file (instrument, sessions, conventions).
        #[arg(long)]
        config: PathBuf,

        /// Directory of bar CSVs.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Trading day (YYYY-MM-DD).
        #[arg(long)]
        day: String,

        /// Session code from the run file (e.g. RTH).
        #[arg(long)]
        session: String,

        /// Bar resolution in minutes.
        #[arg(long, default_value_t = 5)]
        resolution: u32,

        /// Confirmation closes required (0 means first qualifying close).
        #[arg(long, default_value_t = 1)]
        confirm: u32,

        /// Reward-to-risk multiple for the target.
        #[arg(long, default_value_t = 2.0)]
        rr: f64,

        /// Stop placement: full or half.
        #[arg(long, default_value = "full")]
        stop_mode: String,

        /// Half-mode stop buffer in ticks.
        #[arg(long, default_value_t = 0.0)]
        buffer_ticks: f64,

        /// Skip the trade when risk exceeds this many ticks.
        #[arg(long)]
        max_stop_ticks: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            output_dir,
            no_resume,
            quiet,
        } => run_cmd(&config, data_dir, output_dir, no_resume, quiet),
        Commands::Simulate {
            config,
            data_dir,
            day,
            session,
            resolution,
            confirm,
            rr,
            stop_mode,
            buffer_ticks,
            max_stop_ticks,
        } => simulate_cmd(
            &config,
            data_dir,
            &day,
            &session,
            resolution,
            confirm,
            rr,
            &stop_mode,
            buffer_ticks,
            max_stop_ticks,
        ),
    }
}

fn run_cmd(
    config_path: &PathBuf,
    data_dir: PathBuf,
    output_dir: PathBuf,
    no_resume: bool,
    quiet: bool,
) -> Result<()> {
    let config = RunConfig::from_file(config_path)
        .with_context(|| format!("failed to load run file {}", config_path.display()))?;

    let checkpoint_path = output_dir.join("checkpoint.jsonl");
    if no_resume && checkpoint_path.exists() {
        std::fs::remove_file(&checkpoint_path)
            .with_context(|| format!("failed to remove {}", checkpoint_path.display()))?;
    }
    let mut checkpoint = Checkpoint::load(&checkpoint_path)?;

    let store = CsvBarStore::new(&data_dir);
    let progress: &dyn BatchProgress = if quiet { &NullProgress } else { &StdoutProgress };

    let output = run_batch(&store, &config, &checkpoint, progress)?;

    // Rows reach disk before their keys are marked done: a crash in between
    // re-simulates those keys and the export merge replaces the rows.
    let results_path = output_dir.join("results.csv");
    let total_rows = write_results(&results_path, &output.trades)?;
    checkpoint.record(&output.completed)?;
    println!(
        "Results: {} ({total_rows} rows)",
        results_path.display()
    );
    println!("Checkpoint: {}", checkpoint_path.display());

    if !output.summary.errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn simulate_cmd(
    config_path: &PathBuf,
    data_dir: PathBuf,
    day: &str,
    session_code: &str,
    resolution: u32,
    confirm: u32,
    rr: f64,
    stop_mode: &str,
    buffer_ticks: f64,
    max_stop_ticks: Option<f64>,
) -> Result<()> {
    let run_config = RunConfig::from_file(config_path)
        .with_context(|| format!("failed to load run file {}", config_path.display()))?;

    let day = NaiveDate::parse_from_str(day, "%Y-%m-%d")?;
    let session = run_config
        .sessions
        .iter()
        .find(|s| s.code == session_code)
        .with_context(|| format!("session '{session_code}' is not in the run file"))?;

    let stop_mode = match stop_mode {
        "full" => StopMode::Full,
        "half" => StopMode::Half,
        other => bail!("unknown stop mode '{other}'. Valid: full, half"),
    };

    let config = TradeConfig {
        resolution_min: resolution,
        confirm_bars: confirm,
        risk_reward: rr,
        stop_mode,
        buffer_ticks,
        max_stop_ticks,
        risk_anchor: run_config.run.risk_anchor,
        timeout_policy: run_config.run.timeout_policy,
    };
    config.validate()?;

    let key = SimKey {
        day,
        session: session.code.clone(),
        config,
    };

    let window = session.to_window();
    let (fetch_start, _) = window.bounds(day);
    let fetch_end = session.close_instant(day);

    let store = CsvBarStore::new(&data_dir);
    let bars = store.fetch(
        &run_config.run.instrument,
        resolution,
        fetch_start,
        fetch_end,
    )?;

    let trade = simulate_session(&key, &window, &bars, run_config.run.tick_size)?;
    println!("{}", serde_json::to_string_pretty(&trade)?);
    Ok(())
}
