//! Hardware-independent core library for notice-rs
//!
//! This crate contains all platform-agnostic logic for the single-button
//! event tracker: gesture classification, the press session and release
//! dispatcher, the idle timeout, button debouncing, the WiFi connection
//! supervisor, and rendering of every screen the device can show.
//!
//! It is `#![no_std]` (with `alloc` for the framebuffer) so it compiles on
//! both the ESP32-S3 target and desktop hosts for the simulator and tests.
//! Hardware sits behind the sink and link traits in [`sink`] and [`wifi`].

#![no_std]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod framebuffer;
pub mod gesture;
pub mod idle;
pub mod input;
pub mod presenter;
pub mod session;
pub mod sink;
pub mod strings;
pub mod ui;
pub mod wifi;

pub use config::{Config, ConfigError, InternetConfig, Timings, WebhookConfig, WifiNetwork};
pub use controller::Controller;
pub use dispatch::Dispatcher;
pub use framebuffer::FrameBuffer;
pub use gesture::Gesture;
pub use input::{ButtonEdge, Clock, Debouncer};
pub use presenter::FramePresenter;
pub use session::{Mode, PressState, Session};
pub use sink::{EventKind, LinkInfo, NetworkError, NetworkSink, PresentationSink};
pub use ui::{Screen, WifiScreen};
pub use wifi::{LinkError, WifiLink, WifiState, WifiSupervisor};
