pub mod config;
pub mod error;
pub mod event_log;
pub mod models;
pub mod movement;
pub mod simulator;

pub use config::SimConfig;
pub use error::SimError;
pub use event_log::EventLog;
pub use models::{DroneState, GpsFix};
pub use movement::{Hovering, MovementFactory, MovementKind, MovementStrategy, RandomWalk};
pub use simulator::{DroneObserver, DroneSimulator};
