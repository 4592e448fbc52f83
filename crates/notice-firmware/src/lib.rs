//! ESP32-S3 firmware-specific modules for notice-rs
//!
//! Hardware glue that cannot compile on desktop targets: the GPIO button,
//! the embassy clock, the esp-radio WiFi link, the HTTP webhook client, and
//! the build-time configuration baked in from `.env`.

#![no_std]

pub mod button;
pub mod clock;
pub mod config;
pub mod webhook;
pub mod wifi_link;
