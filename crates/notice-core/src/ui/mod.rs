//! Screens of the device and how they are drawn.
//!
//! [`Screen`] is the presentation command set. [`screens::render`] draws a
//! screen onto any `DrawTarget<Color = Rgb565>`, so the same code paints the
//! AtomS3 LCD, the simulator window and test framebuffers.

pub mod alive;
pub mod colors;
pub mod screens;

pub use alive::AliveIndicator;
pub use screens::render;

use crate::sink::LinkInfo;

/// Display width in pixels (AtomS3 GC9107 panel)
pub const DISPLAY_WIDTH_PX: u16 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT_PX: u16 = 128;

/// WiFi connection screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiScreen {
    /// Associating; `dots` is 0 for the first frame, then cycles 1..=3
    Connecting { dots: u8 },
    Connected,
    Failed,
}

/// Everything the controller can ask the display to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Default screen with the alive indicator
    Idle,
    /// Button just went down
    ButtonDown,
    /// Overlay while held below the privacy threshold; sweep in degrees
    HoldProgress { degrees: u16 },
    /// Short press released, webhook in flight
    Saving,
    /// Short press confirmed
    Saved,
    /// Privacy threshold crossed
    PrivacyEntered,
    /// Diagnostics
    DebugInfo(LinkInfo),
    /// WiFi connection status
    WifiState(WifiScreen),
}
