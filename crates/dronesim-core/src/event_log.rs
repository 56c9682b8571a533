//! Timestamped, append-only event log.
//!
//! Entries are also emitted through `tracing` so they show up in the
//! process's diagnostic output.

use chrono::Local;
use std::sync::{Mutex, MutexGuard};

/// In-memory log of human-readable event lines.
///
/// Shared behind an `Arc` between the simulator, which writes, and any
/// reader that wants to display history.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Mutex<Vec<String>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix `message` with the local time and append it.
    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        let line = format!("[{}] {}", timestamp, message);
        tracing::info!("{}", line);
        self.entries().push(line);
    }

    /// Full ordered history, oldest first.
    pub fn logs(&self) -> Vec<String> {
        self.entries().clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<String>> {
        // A panicking writer cannot leave a half-pushed entry behind.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
