//! Observers that surface drone state outside the simulator.

use std::io::Write;
use std::sync::Mutex;

use dronesim_core::{DroneObserver, DroneState};

/// Writes each state as one JSON object per line.
pub struct JsonLinesObserver {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesObserver {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    fn write_state(&self, state: &DroneState) -> anyhow::Result<()> {
        let line = serde_json::to_string(state)?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("output lock poisoned"))?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

impl DroneObserver for JsonLinesObserver {
    fn update(&self, state: &DroneState) {
        if let Err(e) = self.write_state(state) {
            tracing::error!("Failed to write telemetry line: {}", e);
        }
    }
}

/// Emits a one-line summary of each state through `tracing`.
pub struct TracingObserver;

impl DroneObserver for TracingObserver {
    fn update(&self, state: &DroneState) {
        tracing::info!(
            "{} ({:.6}, {:.6}) hdg {:.1} spd {:.1} bat {:.1}% fix {}",
            state.id,
            state.latitude,
            state.longitude,
            state.heading,
            state.speed,
            state.battery,
            state.gps_fix
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_lines_observer_writes_one_line_per_update() {
        let buf = SharedBuf::default();
        let observer = JsonLinesObserver::new(buf.clone());

        let mut state = DroneState::default();
        observer.update(&state);
        state.battery = 50.0;
        observer.update(&state);

        let bytes = buf.0.lock().unwrap().clone();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: DroneState = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.battery, 50.0);
        assert!(lines[0].contains("\"gpsFix\":\"3D\""));
    }
}
