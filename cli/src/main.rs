//! Network Simulator CLI
//!
//! Drive the slot-based packet simulator from the command line and print
//! snapshots as JSON.
//!
//! # Example
//!
//! ```bash
//! # Simulate the full reference day and print each snapshot
//! netsim run --slots 4 --pretty
//!
//! # Replay one rush-hour slot with a different seed
//! netsim run --seed 7 --slot 08:30
//!
//! # Let the driver advance every 500ms for ten seconds
//! netsim auto --interval-ms 500 --duration-secs 10
//!
//! # Dump the reference configuration as a starting point
//! netsim config > network.json
//! ```

use clap::{Parser, Subcommand};
use network_simulator_core_rs::{SimulationEngine, SimulatorConfig, SimulatorHandle, Snapshot};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Slot-based network packet simulator
#[derive(Parser, Debug)]
#[command(name = "netsim")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Advance slots manually and print each snapshot
    Run {
        /// JSON configuration file (reference network when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of slots to advance
        #[arg(short = 'n', long, default_value = "1")]
        slots: usize,

        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Simulate this slot label instead of following the clock
        #[arg(long)]
        slot: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Run the auto-advance driver and print pushed snapshots
    Auto {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Milliseconds between slots
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Stop after this many seconds
        #[arg(short, long, default_value = "10")]
        duration_secs: u64,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the reference configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Run {
            config,
            slots,
            seed,
            slot,
            pretty,
        } => run(load_config(config.as_deref(), seed)?, slots, slot.as_deref(), pretty),
        Command::Auto {
            config,
            interval_ms,
            duration_secs,
            seed,
        } => {
            auto(
                load_config(config.as_deref(), seed)?,
                Duration::from_millis(interval_ms),
                Duration::from_secs(duration_secs),
            )
            .await
        }
        Command::Config => {
            println!("{}", SimulatorConfig::default().to_json_string()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<SimulatorConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
            SimulatorConfig::from_json_str(&json)?
        }
        None => SimulatorConfig::default(),
    };

    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn run(config: SimulatorConfig, slots: usize, slot: Option<&str>, pretty: bool) -> Result<(), Box<dyn Error>> {
    info!(slots, seed = config.rng_seed, "starting manual run");
    let mut engine = SimulationEngine::new(config)?;

    for _ in 0..slots {
        let snapshot = engine.advance_slot(slot);
        print_snapshot(&snapshot, pretty)?;
    }

    let summary = engine.snapshot();
    info!(
        generated = summary.total_generated(),
        sent = summary.total_sent(),
        queued = summary.total_queued(),
        next_slot = %summary.current_slot,
        "run complete"
    );
    Ok(())
}

async fn auto(config: SimulatorConfig, interval: Duration, duration: Duration) -> Result<(), Box<dyn Error>> {
    let handle = SimulatorHandle::new(SimulationEngine::new(config)?);
    let mut updates = handle.subscribe();

    handle.start_auto(interval)?;
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            update = updates.recv() => match update {
                Ok(snapshot) => print_snapshot(&snapshot, false)?,
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "output fell behind, snapshots dropped"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.stop_auto();
    let summary = handle.snapshot();
    info!(
        generated = summary.total_generated(),
        sent = summary.total_sent(),
        queued = summary.total_queued(),
        "auto run complete"
    );
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot, pretty: bool) -> serde_json::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    println!("{}", json);
    Ok(())
}
