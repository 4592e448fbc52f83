//! Inactivity deadline that returns the display to the idle screen.

use embassy_time::{Duration, Instant};

/// Deadline check against the last user interaction.
#[derive(Debug, Clone, Copy)]
pub struct IdleTimer {
    window: Duration,
    last_activity: Instant,
}

impl IdleTimer {
    pub fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            last_activity: now,
        }
    }

    /// Restart the window from `now`.
    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// True once `now - last_activity >= window`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) >= self.window
    }
}
