//! Color definitions for the notice display
//!
//! All colors are RGB565 (5-6-5 bits), the native format of the panel.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Idle background (#D7E845 as RGB565 0xE7E8)
pub const LIME: Rgb565 = Rgb565::new(28, 63, 8);

/// Confirmation background (0x03E0)
pub const GREEN: Rgb565 = Rgb565::new(0, 31, 0);

/// Pressed and WiFi-connecting background (0x001F)
pub const BLUE: Rgb565 = Rgb565::new(0, 0, 31);

/// Saving background, progress ring and comet tail (0xFD20)
pub const ORANGE: Rgb565 = Rgb565::new(31, 41, 0);

/// Privacy and WiFi-failure background (0xF800)
pub const RED: Rgb565 = Rgb565::new(31, 0, 0);

/// Debug background (0x781F)
pub const PURPLE: Rgb565 = Rgb565::new(15, 0, 31);

pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);

/// Linear blend per channel. `opacity` 0.0 yields `from`, 1.0 yields `to`.
pub fn blend(from: Rgb565, to: Rgb565, opacity: f32) -> Rgb565 {
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| -> u8 {
        let delta = (b as f32 - a as f32) * opacity;
        (a as i16 + delta as i16) as u8
    };

    Rgb565::new(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
    )
}
