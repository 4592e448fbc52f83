//! Press session: all mutable state of the poll loop in one place.
//!
//! The controller owns exactly one [`Session`] and passes it by reference
//! to the classifier and dispatcher, so there is a single writer and no
//! ambient globals.

use embassy_time::{Duration, Instant};

use crate::config::Timings;
use crate::gesture::{self, Gesture};
use crate::idle::IdleTimer;

/// Physical press lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    /// Button released
    Idle,
    /// Button held since `since`, classified so far as `gesture`
    Pressed { since: Instant, gesture: Gesture },
    /// Button held, but the press is not a gesture (it closed the debug display)
    Suppressed,
}

/// Top-level display mode of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal operation
    Idle,
    /// Diagnostics showing until the next button-down
    DebugDisplay,
}

#[derive(Debug, Clone)]
pub struct Session {
    press: PressState,
    mode: Mode,
    idle: IdleTimer,
    showing_idle: bool,
    last_frame: Instant,
}

impl Session {
    /// Fresh session at boot with the idle screen up.
    pub fn new(timings: &Timings, now: Instant) -> Self {
        Self {
            press: PressState::Idle,
            mode: Mode::Idle,
            idle: IdleTimer::new(timings.idle_timeout, now),
            showing_idle: true,
            last_frame: now,
        }
    }

    pub fn press(&self) -> PressState {
        self.press
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn showing_idle(&self) -> bool {
        self.showing_idle
    }

    pub fn last_activity(&self) -> Instant {
        self.idle.last_activity()
    }

    /// Whether the button is physically down as far as the session knows.
    pub fn is_held(&self) -> bool {
        !matches!(self.press, PressState::Idle)
    }

    /// Current gesture of an ongoing press.
    pub fn gesture(&self) -> Option<Gesture> {
        match self.press {
            PressState::Pressed { gesture, .. } => Some(gesture),
            _ => None,
        }
    }

    /// Start tracking a new press.
    pub fn begin_press(&mut self, now: Instant) {
        self.press = PressState::Pressed {
            since: now,
            gesture: Gesture::None,
        };
        self.showing_idle = false;
        self.idle.record_activity(now);
    }

    /// Swallow the current press (it only closes the debug display).
    pub fn suppress_press(&mut self, now: Instant) {
        self.press = PressState::Suppressed;
        self.idle.record_activity(now);
    }

    /// How long the tracked press has been held.
    pub fn hold_duration(&self, now: Instant) -> Option<Duration> {
        match self.press {
            PressState::Pressed { since, .. } => Some(now.saturating_duration_since(since)),
            _ => None,
        }
    }

    /// Re-classify the held press. Returns the new gesture when it escalated.
    pub fn escalate(&mut self, now: Instant, timings: &Timings) -> Option<Gesture> {
        let PressState::Pressed { since, gesture } = self.press else {
            return None;
        };
        if gesture.is_terminal() {
            return None;
        }

        let held = now.saturating_duration_since(since);
        let next = gesture::classify(held, gesture, timings);
        if next == gesture {
            return None;
        }

        self.press = PressState::Pressed {
            since,
            gesture: next,
        };
        Some(next)
    }

    /// Consume the press at button-up, yielding its final gesture.
    ///
    /// Returns `None` for a suppressed press or a stray release.
    pub fn end_press(&mut self) -> Option<Gesture> {
        let press = core::mem::replace(&mut self.press, PressState::Idle);
        match press {
            PressState::Pressed { gesture, .. } => Some(gesture.finalize()),
            PressState::Suppressed | PressState::Idle => None,
        }
    }

    /// Mark the release cycle complete.
    pub fn complete_cycle(&mut self, now: Instant) {
        self.idle.record_activity(now);
    }

    pub fn enter_debug_display(&mut self) {
        self.mode = Mode::DebugDisplay;
    }

    /// Leave the debug display and show the idle screen again.
    pub fn exit_debug_display(&mut self, now: Instant) {
        self.mode = Mode::Idle;
        self.showing_idle = true;
        self.last_frame = now;
    }

    /// Idle timeout check: expired, nothing held, not in diagnostics.
    pub fn idle_timeout_due(&self, now: Instant) -> bool {
        !self.showing_idle
            && !self.is_held()
            && self.mode == Mode::Idle
            && self.idle.is_expired(now)
    }

    pub fn show_idle(&mut self, now: Instant) {
        self.showing_idle = true;
        self.last_frame = now;
    }

    /// Whether the alive indicator is due for another frame.
    pub fn animation_due(&self, now: Instant, frame: Duration) -> bool {
        self.showing_idle && now.saturating_duration_since(self.last_frame) >= frame
    }

    pub fn frame_drawn(&mut self, now: Instant) {
        self.last_frame = now;
    }
}
