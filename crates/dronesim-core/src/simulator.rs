//! Tick-driven drone simulator.
//!
//! Holds the drone state and its movement strategy, advances the state once
//! per [`DroneSimulator::update_drone`] call and fans the result out to every
//! attached observer in attachment order.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::event_log::EventLog;
use crate::models::{DroneState, GpsFix};
use crate::movement::{MovementFactory, MovementKind, MovementStrategy};

/// Battery drained per tick in normal operation.
pub const NORMAL_DRAIN: f64 = 0.1;
/// Upper bound of the random drain per tick in failure mode.
pub const MAX_FAILURE_DRAIN: f64 = 5.0;

pub const FAILURE_ACTIVATED: &str = "Failure simulation activated";
pub const FAILURE_DEACTIVATED: &str = "Failure simulation deactivated";

/// Receives the drone state after every tick.
pub trait DroneObserver: Send + Sync {
    fn update(&self, state: &DroneState);
}

impl<F> DroneObserver for F
where
    F: Fn(&DroneState) + Send + Sync,
{
    fn update(&self, state: &DroneState) {
        self(state)
    }
}

pub struct DroneSimulator {
    drone: DroneState,
    movement: Box<dyn MovementStrategy>,
    observers: Vec<Arc<dyn DroneObserver>>,
    logger: Arc<EventLog>,
    rng: StdRng,
    ticks: u64,
}

impl DroneSimulator {
    /// Create a simulator with the default drone and a random-walk strategy.
    pub fn new(logger: Arc<EventLog>) -> Self {
        Self::with_parts(
            MovementFactory::from_kind(MovementKind::RandomWalk),
            StdRng::from_os_rng(),
            logger,
        )
    }

    /// Create a simulator from configuration.
    ///
    /// The movement key goes through [`MovementFactory::create`], so unknown
    /// keys hover.
    pub fn from_config(config: &SimConfig, logger: Arc<EventLog>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_parts(MovementFactory::create(&config.movement), rng, logger)
    }

    /// Default drone and random-walk strategy with a deterministic RNG.
    pub fn with_seed(seed: u64, logger: Arc<EventLog>) -> Self {
        Self::with_parts(
            MovementFactory::from_kind(MovementKind::RandomWalk),
            StdRng::seed_from_u64(seed),
            logger,
        )
    }

    fn with_parts(movement: Box<dyn MovementStrategy>, rng: StdRng, logger: Arc<EventLog>) -> Self {
        tracing::debug!("Simulator created with {} movement", movement.name());
        Self {
            drone: DroneState::default(),
            movement,
            observers: Vec::new(),
            logger,
            rng,
            ticks: 0,
        }
    }

    /// Register an observer. Observers are never deduplicated or removed.
    pub fn attach(&mut self, observer: Arc<dyn DroneObserver>) {
        self.observers.push(observer);
    }

    /// Flip failure mode and record the transition in the event log.
    pub fn toggle_failure(&mut self) {
        self.drone.failure = !self.drone.failure;
        let message = if self.drone.failure {
            FAILURE_ACTIVATED
        } else {
            FAILURE_DEACTIVATED
        };
        self.logger.log(message);
    }

    /// Advance the simulation by one tick and notify observers.
    pub fn update_drone(&mut self) {
        let was_depleted = self.drone.is_depleted();

        if self.drone.failure {
            // Position and heading freeze while the fix is lost.
            let drain = self.rng.random_range(0.0..=MAX_FAILURE_DRAIN);
            self.drone.drain_battery(drain);
            self.drone.gps_fix = GpsFix::NoFix;
        } else {
            self.movement.apply(&mut self.drone, &mut self.rng);
            self.drone.drain_battery(NORMAL_DRAIN);
            self.drone.gps_fix = GpsFix::ThreeD;
        }

        self.ticks += 1;
        if !was_depleted && self.drone.is_depleted() {
            tracing::warn!("{} battery depleted after {} ticks", self.drone.id, self.ticks);
        }
        tracing::debug!(
            tick = self.ticks,
            lat = self.drone.latitude,
            lon = self.drone.longitude,
            battery = self.drone.battery,
            fix = %self.drone.gps_fix,
            "Drone updated"
        );

        self.notify();
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.update(&self.drone);
        }
    }

    pub fn drone(&self) -> &DroneState {
        &self.drone
    }

    pub fn is_failure(&self) -> bool {
        self.drone.failure
    }

    pub fn movement_name(&self) -> &'static str {
        self.movement.name()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn logger(&self) -> &Arc<EventLog> {
        &self.logger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn simulator() -> DroneSimulator {
        DroneSimulator::with_seed(1234, Arc::new(EventLog::new()))
    }

    #[test]
    fn test_new_uses_random_walk() {
        let sim = DroneSimulator::new(Arc::new(EventLog::new()));
        assert_eq!(sim.movement_name(), "random");
        assert_eq!(sim.drone(), &DroneState::default());
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.observer_count(), 0);
    }

    #[test]
    fn test_from_config_unknown_movement_hovers() {
        let config = SimConfig {
            movement: "spiral".to_string(),
            seed: Some(5),
            ..SimConfig::default()
        };
        let sim = DroneSimulator::from_config(&config, Arc::new(EventLog::new()));
        assert_eq!(sim.movement_name(), "hovering");
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = simulator();
        let mut b = simulator();
        for _ in 0..25 {
            a.update_drone();
            b.update_drone();
        }
        assert_eq!(a.drone(), b.drone());
    }

    #[test]
    fn test_toggle_failure_logs_each_transition() {
        let mut sim = simulator();
        sim.toggle_failure();
        assert!(sim.is_failure());
        sim.toggle_failure();
        assert!(!sim.is_failure());

        let logs = sim.logger().logs();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].ends_with(FAILURE_ACTIVATED));
        assert!(logs[1].ends_with(FAILURE_DEACTIVATED));
    }

    #[test]
    fn test_normal_tick_drains_fixed_amount() {
        let mut sim = simulator();
        sim.update_drone();
        assert!((sim.drone().battery - 99.9).abs() < 1e-9);
        assert_eq!(sim.drone().gps_fix, GpsFix::ThreeD);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_failure_tick_freezes_position() {
        let mut sim = simulator();
        sim.toggle_failure();
        let before = sim.drone().clone();

        sim.update_drone();
        let after = sim.drone();
        assert_eq!(after.latitude, before.latitude);
        assert_eq!(after.longitude, before.longitude);
        assert_eq!(after.heading, before.heading);
        assert_eq!(after.speed, before.speed);
        assert_eq!(after.gps_fix, GpsFix::NoFix);
        assert!(after.battery <= before.battery);
        assert!(before.battery - after.battery <= MAX_FAILURE_DRAIN);
    }

    #[test]
    fn test_fix_recovers_after_failure_cleared() {
        let mut sim = simulator();
        sim.toggle_failure();
        sim.update_drone();
        assert_eq!(sim.drone().gps_fix, GpsFix::NoFix);

        sim.toggle_failure();
        sim.update_drone();
        assert_eq!(sim.drone().gps_fix, GpsFix::ThreeD);
    }

    #[test]
    fn test_closure_observer_sees_every_tick() {
        let mut sim = simulator();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        sim.attach(Arc::new(move |state: &DroneState| {
            sink.lock().unwrap().push(state.battery);
        }));

        for _ in 0..3 {
            sim.update_drone();
        }
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_same_observer_attached_twice_runs_twice() {
        let mut sim = simulator();
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        let observer: Arc<dyn DroneObserver> = Arc::new(move |_: &DroneState| {
            *counter.lock().unwrap() += 1;
        });
        sim.attach(observer.clone());
        sim.attach(observer);

        sim.update_drone();
        assert_eq!(sim.observer_count(), 2);
        assert_eq!(*count.lock().unwrap(), 2);
    }
}
