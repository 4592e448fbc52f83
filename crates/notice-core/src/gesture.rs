//! Press gesture classification
//!
//! A press escalates through gestures by how long the button is held.
//! Variants are declared in severity order so `Ord` expresses escalation:
//! the classifier only ever moves a gesture forward with [`Ord::max`], which
//! makes "never downgrade within a press" a property of the type rather
//! than of the call sites.

use embassy_time::Duration;

use crate::config::Timings;

/// Classified outcome of a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Gesture {
    /// Held, but no threshold crossed yet
    #[default]
    None,
    /// Released before any threshold; only assigned at release
    Short,
    /// Held past the privacy threshold
    PrivacyHold,
    /// Held past the debug threshold; terminal for the press
    DebugHold,
}

impl Gesture {
    /// Whether further escalation is possible.
    pub fn is_terminal(self) -> bool {
        self == Gesture::DebugHold
    }

    /// Resolve the gesture at button-up.
    ///
    /// A press that never escalated becomes [`Gesture::Short`].
    pub fn finalize(self) -> Gesture {
        match self {
            Gesture::None => Gesture::Short,
            other => other,
        }
    }
}

/// Advance `previous` given the current hold duration.
///
/// Returns `previous` unchanged below the privacy threshold, and never
/// returns anything less severe than `previous`.
pub fn classify(held: Duration, previous: Gesture, timings: &Timings) -> Gesture {
    if previous.is_terminal() {
        return previous;
    }

    let reached = if held >= timings.debug_hold {
        Gesture::DebugHold
    } else if held >= timings.privacy_hold {
        Gesture::PrivacyHold
    } else {
        Gesture::None
    };

    let next = previous.max(reached);
    debug_assert!(next >= previous, "gesture downgraded within a press");
    next
}

/// Sweep of the hold-progress ring in degrees, `0..=360`.
///
/// Full circle at the privacy threshold.
pub fn privacy_progress_degrees(held: Duration, timings: &Timings) -> u16 {
    let threshold = timings.privacy_hold.as_millis().max(1);
    let held = held.as_millis().min(threshold);
    (held * 360 / threshold) as u16
}
