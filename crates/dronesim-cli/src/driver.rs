//! Timer-driven tick loop.
//!
//! Calls [`DroneSimulator::update_drone`] on a fixed interval until the tick
//! limit is reached or the shutdown future resolves.

use std::future::Future;
use std::time::Duration;

use dronesim_core::{DroneSimulator, DroneState};
use tokio::time::{interval, MissedTickBehavior};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many ticks; run until shutdown when `None`
    pub ticks: Option<u64>,
    pub interval: Duration,
    /// 1-based tick numbers before which failure mode is toggled
    pub fail_at: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_state: DroneState,
    pub interrupted: bool,
}

/// Drive `sim` until the tick limit or `shutdown`, whichever comes first.
pub async fn run<S>(sim: &mut DroneSimulator, options: &RunOptions, shutdown: S) -> RunSummary
where
    S: Future<Output = ()>,
{
    let mut ticker = interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut interrupted = false;
    loop {
        if options.ticks.is_some_and(|limit| sim.ticks() >= limit) {
            break;
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested after {} ticks", sim.ticks());
                interrupted = true;
                break;
            }
            _ = ticker.tick() => {}
        }

        let next = sim.ticks() + 1;
        for _ in options.fail_at.iter().filter(|&&at| at == next) {
            sim.toggle_failure();
        }
        sim.update_drone();
    }

    RunSummary {
        ticks: sim.ticks(),
        final_state: sim.drone().clone(),
        interrupted,
    }
}
