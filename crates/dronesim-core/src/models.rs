//! Core data models for the drone simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier given to the simulated drone at startup.
pub const DEFAULT_DRONE_ID: &str = "DRONE-001";
/// Starting latitude (San Francisco).
pub const DEFAULT_LATITUDE: f64 = 37.7749;
/// Starting longitude (San Francisco).
pub const DEFAULT_LONGITUDE: f64 = -122.4194;
pub const DEFAULT_ALTITUDE: f64 = 100.0;
/// Full charge, in percent.
pub const FULL_BATTERY: f64 = 100.0;

/// GPS fix quality reported by the drone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpsFix {
    /// Full 3D fix, normal operation
    #[default]
    #[serde(rename = "3D")]
    ThreeD,
    /// Fix lost while failure mode is active
    #[serde(rename = "No Fix")]
    NoFix,
}

impl GpsFix {
    pub fn as_str(&self) -> &'static str {
        match self {
            GpsFix::ThreeD => "3D",
            GpsFix::NoFix => "No Fix",
        }
    }
}

impl fmt::Display for GpsFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable telemetry record of the simulated drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneState {
    pub id: String,
    /// Degrees, drifts without clamping
    pub latitude: f64,
    /// Degrees, drifts without clamping
    pub longitude: f64,
    pub altitude: f64,
    /// Degrees, accumulates without wrapping to [0, 360)
    pub heading: f64,
    pub speed: f64,
    /// Percentage in [0, 100]
    pub battery: f64,
    pub gps_fix: GpsFix,
    pub failure: bool,
}

impl DroneState {
    /// Create a drone at the default location with a full battery.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            altitude: DEFAULT_ALTITUDE,
            heading: 0.0,
            speed: 0.0,
            battery: FULL_BATTERY,
            gps_fix: GpsFix::ThreeD,
            failure: false,
        }
    }

    /// Drain the battery by `amount`, never dropping below zero.
    pub fn drain_battery(&mut self, amount: f64) {
        self.battery = (self.battery - amount).max(0.0);
    }

    pub fn is_depleted(&self) -> bool {
        self.battery <= 0.0
    }
}

impl Default for DroneState {
    fn default() -> Self {
        Self::new(DEFAULT_DRONE_ID)
    }
}
