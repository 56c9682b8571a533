//! Drone simulator - drives ticks on a timer and streams drone telemetry.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dronesim_cli::{run, JsonLinesObserver, RunOptions, TracingObserver};
use dronesim_core::{DroneSimulator, EventLog, MovementKind, SimConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulate a single drone's telemetry
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of ticks to run (runs until Ctrl-C when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Milliseconds between ticks [env: DRONESIM_INTERVAL_MS]
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Movement strategy: hovering or random [env: DRONESIM_MOVEMENT]
    #[arg(long)]
    movement: Option<String>,

    /// RNG seed for reproducible runs [env: DRONESIM_SEED]
    #[arg(long)]
    seed: Option<u64>,

    /// Toggle failure mode before this tick (repeatable)
    #[arg(long = "fail-at")]
    fail_at: Vec<u64>,

    /// Print each drone state as a JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Reject unknown movement keys and malformed env values
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn config(&self) -> Result<SimConfig> {
        let mut config = if self.strict {
            SimConfig::try_from_env()?
        } else {
            SimConfig::from_env()
        };

        if let Some(movement) = &self.movement {
            if self.strict {
                movement.parse::<MovementKind>()?;
            }
            config.movement = movement.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON telemetry on stdout stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("dronesim=info".parse()?)
            .add_directive("dronesim_core=info".parse()?))
        .init();

    let args = Args::parse();
    let config = args.config()?;

    let log = Arc::new(EventLog::new());
    let mut sim = DroneSimulator::from_config(&config, log.clone());
    if args.json {
        sim.attach(Arc::new(JsonLinesObserver::stdout()));
    } else {
        sim.attach(Arc::new(TracingObserver));
    }

    tracing::info!(
        "Starting {} simulation of {} every {}ms",
        sim.movement_name(),
        sim.drone().id,
        config.interval_ms
    );

    let options = RunOptions {
        ticks: args.ticks,
        interval: config.interval(),
        fail_at: args.fail_at.clone(),
    };
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let summary = run(&mut sim, &options, shutdown).await;
    tracing::info!(
        "Simulation finished after {} ticks (battery {:.1}%, fix {})",
        summary.ticks,
        summary.final_state.battery,
        summary.final_state.gps_fix
    );

    for line in log.logs() {
        eprintln!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "dronesim",
            "--movement",
            "hovering",
            "--interval-ms",
            "20",
            "--seed",
            "8",
            "--fail-at",
            "2",
            "--fail-at",
            "4",
        ])
        .unwrap();
        let config = args.config().unwrap();

        assert_eq!(config.movement, "hovering");
        assert_eq!(config.interval_ms, 20);
        assert_eq!(config.seed, Some(8));
        assert_eq!(args.fail_at, vec![2, 4]);
    }

    #[test]
    fn test_strict_rejects_unknown_movement_flag() {
        let args = Args::try_parse_from(["dronesim", "--strict", "--movement", "loop"]).unwrap();
        assert!(args.config().is_err());
    }
}
