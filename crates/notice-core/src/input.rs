//! Button input: edges, debouncing and the monotonic clock.

use embassy_time::{Duration, Instant};

/// A debounced button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Down,
    Up,
}

/// Monotonic time source for measuring holds.
///
/// The firmware reads the embassy timer; tests advance a manual clock.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Turns raw level samples into debounced edges.
///
/// A level change is reported once it has held steady for the configured
/// window. The button starts released.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    stable: bool,
    candidate: bool,
    candidate_since: Instant,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            stable: false,
            candidate: false,
            candidate_since: Instant::from_ticks(0),
        }
    }

    /// Last debounced level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample; returns an edge when the stable level flips.
    pub fn update(&mut self, pressed: bool, now: Instant) -> Option<ButtonEdge> {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.candidate_since = now;
        }

        if self.candidate == self.stable {
            return None;
        }

        if now.saturating_duration_since(self.candidate_since) < self.window {
            return None;
        }

        self.stable = self.candidate;
        Some(if self.stable {
            ButtonEdge::Down
        } else {
            ButtonEdge::Up
        })
    }
}
