use std::time::{Duration, Instant};

/// Tracks the age of an entity's last full snapshot against a fixed
/// staleness window.
///
/// A timer that has never been reset reports as elapsed, so a freshly
/// constructed entity is stale until its first successful full refresh.
#[derive(Debug, Clone)]
pub struct Timer {
    duration: Duration,
    last_reset: Option<Instant>,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last_reset: None,
        }
    }

    /// True if the window has passed since the last reset, or if the timer
    /// was never reset.
    pub fn has_elapsed(&self) -> bool {
        match self.last_reset {
            Some(instant) => instant.elapsed() >= self.duration,
            None => true,
        }
    }

    /// Restarts the window from the current instant.
    pub fn reset(&mut self) {
        self.last_reset = Some(Instant::now());
    }

    /// Forces the timer into the elapsed state, regardless of age.
    pub fn expire_now(&mut self) {
        self.last_reset = None;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
