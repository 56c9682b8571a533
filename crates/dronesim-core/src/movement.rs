//! Movement strategies that perturb the drone's position each tick.
//!
//! A strategy only touches `latitude`, `longitude`, `heading` and, for
//! [`RandomWalk`], `speed`. Battery, GPS fix, failure flag, id and altitude
//! belong to the simulator.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};

use crate::error::SimError;
use crate::models::DroneState;

/// Trait for movement strategy implementations.
pub trait MovementStrategy: Send + Sync {
    /// Advance the drone's position by one tick.
    fn apply(&self, drone: &mut DroneState, rng: &mut dyn RngCore);

    fn kind(&self) -> MovementKind;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Uniform sample in `[-half_width, half_width]`.
fn jitter(rng: &mut dyn RngCore, half_width: f64) -> f64 {
    rng.random_range(-half_width..=half_width)
}

/// Slight drift around the current position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hovering;

impl Hovering {
    pub const POSITION_DRIFT_DEG: f64 = 0.00005;
    pub const HEADING_DRIFT_DEG: f64 = 1.0;
}

impl MovementStrategy for Hovering {
    fn apply(&self, drone: &mut DroneState, rng: &mut dyn RngCore) {
        drone.latitude += jitter(rng, Self::POSITION_DRIFT_DEG);
        drone.longitude += jitter(rng, Self::POSITION_DRIFT_DEG);
        drone.heading += jitter(rng, Self::HEADING_DRIFT_DEG);
    }

    fn kind(&self) -> MovementKind {
        MovementKind::Hovering
    }
}

/// Larger drift with a freshly sampled speed every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWalk;

impl RandomWalk {
    pub const POSITION_DRIFT_DEG: f64 = 0.0005;
    pub const HEADING_DRIFT_DEG: f64 = 2.5;
    pub const MAX_SPEED: f64 = 10.0;
}

impl MovementStrategy for RandomWalk {
    fn apply(&self, drone: &mut DroneState, rng: &mut dyn RngCore) {
        drone.latitude += jitter(rng, Self::POSITION_DRIFT_DEG);
        drone.longitude += jitter(rng, Self::POSITION_DRIFT_DEG);
        drone.heading += jitter(rng, Self::HEADING_DRIFT_DEG);
        drone.speed = rng.random_range(0.0..=Self::MAX_SPEED);
    }

    fn kind(&self) -> MovementKind {
        MovementKind::RandomWalk
    }
}

/// Known strategy keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Hovering,
    RandomWalk,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Hovering => "hovering",
            MovementKind::RandomWalk => "random",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = SimError;

    /// Strict parse; unlike [`MovementFactory::create`] unknown keys are errors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hovering" => Ok(MovementKind::Hovering),
            "random" => Ok(MovementKind::RandomWalk),
            other => Err(SimError::UnknownMovement(other.to_string())),
        }
    }
}

/// Maps strategy keys to strategy instances.
pub struct MovementFactory;

impl MovementFactory {
    /// Create a strategy for `kind`.
    ///
    /// `"hovering"` and `"random"` are recognized; anything else falls back
    /// to [`Hovering`].
    pub fn create(kind: &str) -> Box<dyn MovementStrategy> {
        match kind.parse::<MovementKind>() {
            Ok(kind) => Self::from_kind(kind),
            Err(_) => {
                tracing::debug!("Unknown movement '{}', falling back to hovering", kind);
                Self::from_kind(MovementKind::Hovering)
            }
        }
    }

    pub fn from_kind(kind: MovementKind) -> Box<dyn MovementStrategy> {
        match kind {
            MovementKind::Hovering => Box::new(Hovering),
            MovementKind::RandomWalk => Box::new(RandomWalk),
        }
    }
}
