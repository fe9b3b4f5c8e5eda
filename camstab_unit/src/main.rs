//! # Camera Stabilization Simulator
//!
//! Loads `camstab.toml`, activates the stabilization loop and replays the
//! configured synthetic attitude profile through it, then logs a summary.
//!
//! The loop is driven by a manual clock advanced by `tick_period_ms` per
//! tick, so the run is deterministic and not paced in real time.

use camstab_common::config::LogLevel;
use camstab_common::consts::DEFAULT_CONFIG_PATH;
use camstab_common::stab::axis::Axis;
use camstab_unit::bus::ManualClock;
use camstab_unit::config::{LoadedConfig, load_config};
use camstab_unit::cycle::ControlLoop;
use camstab_unit::sim::Simulation;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Camera stabilization simulator: replay a synthetic attitude profile
#[derive(Parser, Debug)]
#[command(name = "camstab_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Replay synthetic vehicle attitude through the camera stabilization loop")]
struct Args {
    /// Path to the configuration TOML.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of ticks to run (overrides `[simulation] ticks`).
    #[arg(long)]
    ticks: Option<u32>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let loaded = match load_config(&args.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            setup_tracing(&args, LogLevel::default());
            error!("FATAL: {}: {e}", args.config.display());
            process::exit(1);
        }
    };
    setup_tracing(&args, loaded.shared.log_level);

    info!(
        "{} v{} starting...",
        loaded.shared.service_name,
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(&args, &loaded) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("{} shutdown complete", loaded.shared.service_name);
}

fn run(args: &Args, loaded: &LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let clock = ManualClock::new(0);
    let Some(mut ctl) = ControlLoop::activate(&loaded.unit, &clock)? else {
        info!("Stabilization disabled in configuration, nothing to do");
        return Ok(());
    };

    let ticks = args.ticks.unwrap_or(loaded.simulation.ticks);
    info!(
        "Config OK: tick_period={}ms, gimbal={:?}, ticks={}",
        loaded.unit.tick_period_ms, loaded.settings.gimbal_type, ticks,
    );

    let mut sim = Simulation::new(loaded);
    let summary = sim.run(&mut ctl, &clock, ticks)?;

    info!(
        ticks = summary.ticks,
        saturated = summary.saturated_commands,
        clock_anomalies = summary.clock_anomalies,
        simulated_ms = sim.elapsed_ms(),
        "Simulation complete"
    );
    if summary.ticks > 0 {
        for axis in Axis::ALL {
            let s = summary.axis(axis);
            info!(
                axis = axis.name(),
                min = s.min_command,
                max = s.max_command,
                "Command envelope"
            );
        }
    }

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
///
/// `RUST_LOG` wins over the configured level; `--verbose` forces DEBUG.
fn setup_tracing(args: &Args, default_level: LogLevel) {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_directive()));
    if args.verbose {
        filter = filter.add_directive(Level::DEBUG.into());
    }

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
