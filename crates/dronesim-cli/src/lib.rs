//! Drone simulator CLI - tick driver and observers for the `dronesim` binary.

pub mod driver;
pub mod observers;

pub use driver::{run, RunOptions, RunSummary};
pub use observers::{JsonLinesObserver, TracingObserver};
