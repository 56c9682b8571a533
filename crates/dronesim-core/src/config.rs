//! Simulator configuration from environment.

use std::env;
use std::time::Duration;

use crate::error::{Result, SimError};
use crate::movement::MovementKind;

pub const ENV_MOVEMENT: &str = "DRONESIM_MOVEMENT";
pub const ENV_INTERVAL_MS: &str = "DRONESIM_INTERVAL_MS";
pub const ENV_SEED: &str = "DRONESIM_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Movement key handed to the factory
    pub movement: String,
    /// Time between ticks when driven on a timer
    pub interval_ms: u64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            movement: MovementKind::RandomWalk.as_str().to_string(),
            interval_ms: 1000,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Read configuration, falling back to defaults for missing or malformed values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            movement: env::var(ENV_MOVEMENT).unwrap_or(defaults.movement),
            interval_ms: env::var(ENV_INTERVAL_MS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.interval_ms),
            seed: env::var(ENV_SEED).ok().and_then(|s| s.parse().ok()),
        }
    }

    /// Read configuration, rejecting malformed values.
    pub fn try_from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(movement) = lookup(ENV_MOVEMENT) {
            movement.parse::<MovementKind>()?;
            config.movement = movement;
        }
        if let Some(raw) = lookup(ENV_INTERVAL_MS) {
            config.interval_ms = parse_value(ENV_INTERVAL_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = Some(parse_value(ENV_SEED, &raw)?);
        }

        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| SimError::InvalidConfig {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
