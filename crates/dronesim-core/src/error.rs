//! Error types for the simulator.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown movement strategy: {0}")]
    UnknownMovement(String),

    #[error("invalid value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, SimError>;
