// Path: crates/telemetry/src/time.rs
use std::time::{Duration, Instant};

/// Logs how long a scope took when dropped.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::debug!(
            target: "timing",
            label = self.label,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            "scope finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let timer = Timer::new("test");
        let first = timer.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() > first);
    }
}
