//! Full-screen layouts for every [`Screen`].
//!
//! Each screen clears to its background color and draws centered text, except
//! [`Screen::HoldProgress`], which paints an overlay on top of the pressed
//! screen so the ring can grow frame by frame.

use core::fmt::Write as _;

use embedded_graphics::{
    geometry::AngleUnit,
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_9X15, FONT_10X20},
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Arc, PrimitiveStyle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;

use super::colors::{BLACK, BLUE, GREEN, LIME, ORANGE, PURPLE, RED, WHITE};
use super::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, Screen, WifiScreen};
use crate::sink::LinkInfo;
use crate::strings;

const CENTER_X: i32 = DISPLAY_WIDTH_PX as i32 / 2;
const CENTER_Y: i32 = DISPLAY_HEIGHT_PX as i32 / 2;

/// Half the spacing between two stacked lines of large text
const LINE_OFFSET_PX: i32 = 12;

/// Hold-progress ring geometry
const RING_CENTER_Y: i32 = 35;
const RING_DIAMETER_PX: u32 = 30;
const RING_STROKE_PX: u32 = 3;
const CAPTION_Y: i32 = 10;

/// Characters of SSID that fit across the panel in the 6x10 font
const SSID_MAX_CHARS: usize = DISPLAY_WIDTH_PX as usize / 6;

/// Draw `screen` onto `display`.
pub fn render<D>(screen: &Screen, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match screen {
        Screen::Idle => {
            display.clear(LIME)?;
            two_lines(display, strings::IDLE_LINE1, strings::IDLE_LINE2, BLACK)
        }
        Screen::ButtonDown => {
            display.clear(BLUE)?;
            centered(display, strings::BUTTON_PRESSED, CENTER_Y, &FONT_10X20, WHITE)
        }
        Screen::HoldProgress { degrees } => hold_progress(display, *degrees),
        Screen::Saving => {
            display.clear(ORANGE)?;
            centered(display, strings::SAVING, CENTER_Y, &FONT_10X20, WHITE)
        }
        Screen::Saved => {
            display.clear(GREEN)?;
            centered(display, strings::SAVED, CENTER_Y, &FONT_10X20, WHITE)
        }
        Screen::PrivacyEntered => {
            display.clear(RED)?;
            centered(display, strings::PRIVACY_MODE_LINE1, 20, &FONT_9X15, WHITE)?;
            centered(display, strings::PRIVACY_MODE_LINE2, 40, &FONT_9X15, WHITE)
        }
        Screen::DebugInfo(info) => debug_info(display, info),
        Screen::WifiState(state) => wifi_state(display, *state),
    }
}

fn hold_progress<D>(display: &mut D, degrees: u16) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    centered(
        display,
        strings::PRIVACY_HOLD_INSTRUCTION,
        CAPTION_Y,
        &FONT_6X10,
        WHITE,
    )?;

    if degrees == 0 {
        return Ok(());
    }

    Arc::with_center(
        Point::new(CENTER_X, RING_CENTER_Y),
        RING_DIAMETER_PX,
        0.0f32.deg(),
        (degrees.min(360) as f32).deg(),
    )
    .into_styled(PrimitiveStyle::with_stroke(ORANGE, RING_STROKE_PX))
    .draw(display)
}

fn debug_info<D>(display: &mut D, info: &LinkInfo) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(PURPLE)?;

    centered(display, strings::DEBUG_TITLE, 15, &FONT_9X15, WHITE)?;

    centered(display, strings::DEBUG_SSID_LABEL, 45, &FONT_9X15, WHITE)?;
    let ssid = info
        .ssid
        .as_deref()
        .filter(|ssid| !ssid.is_empty())
        .map(|ssid| truncate(ssid, SSID_MAX_CHARS))
        .unwrap_or(strings::NOT_AVAILABLE);
    centered(display, ssid, 65, &FONT_6X10, WHITE)?;

    centered(display, strings::DEBUG_RSSI_LABEL, 90, &FONT_9X15, WHITE)?;
    let mut rssi: String<16> = String::new();
    match info.rssi {
        Some(dbm) => {
            let _ = write!(rssi, "{} dBm", dbm);
        }
        None => {
            let _ = rssi.push_str(strings::NOT_AVAILABLE);
        }
    }
    centered(display, &rssi, 110, &FONT_9X15, WHITE)
}

fn wifi_state<D>(display: &mut D, state: WifiScreen) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match state {
        WifiScreen::Connecting { dots: 0 } => {
            display.clear(BLUE)?;
            centered(display, strings::WIFI_CONNECTING, CENTER_Y, &FONT_10X20, WHITE)
        }
        WifiScreen::Connecting { dots } => {
            display.clear(BLUE)?;
            let dots = &"..."[..dots.min(3) as usize];
            two_lines(display, strings::WIFI_CONNECTING, dots, WHITE)
        }
        WifiScreen::Connected => {
            display.clear(GREEN)?;
            centered(display, strings::WIFI_CONNECTED, CENTER_Y, &FONT_10X20, WHITE)
        }
        WifiScreen::Failed => {
            display.clear(RED)?;
            centered(display, strings::WIFI_FAILED, CENTER_Y - 20, &FONT_9X15, WHITE)?;
            centered(display, strings::WIFI_NO_CONNECTION, CENTER_Y, &FONT_9X15, WHITE)?;
            centered(display, strings::WIFI_RETRY, CENTER_Y + 20, &FONT_9X15, WHITE)
        }
    }
}

/// Two lines of large text around the vertical center.
fn two_lines<D>(display: &mut D, first: &str, second: &str, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    centered(display, first, CENTER_Y - LINE_OFFSET_PX, &FONT_10X20, color)?;
    centered(display, second, CENTER_Y + LINE_OFFSET_PX, &FONT_10X20, color)
}

/// Text centered horizontally with its middle on `y`.
fn centered<D>(
    display: &mut D,
    text: &str,
    y: i32,
    font: &MonoFont<'_>,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();

    Text::with_text_style(
        text,
        Point::new(CENTER_X, y),
        MonoTextStyle::new(font, color),
        text_style,
    )
    .draw(display)?;
    Ok(())
}

/// At most `max_chars` characters of `text`, cut on a char boundary.
fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;

    fn rendered(screen: &Screen) -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        let Ok(()) = render(screen, &mut frame);
        frame
    }

    #[test]
    fn test_backgrounds() {
        let cases = [
            (Screen::Idle, LIME),
            (Screen::ButtonDown, BLUE),
            (Screen::Saving, ORANGE),
            (Screen::Saved, GREEN),
            (Screen::PrivacyEntered, RED),
            (Screen::DebugInfo(LinkInfo::default()), PURPLE),
            (Screen::WifiState(WifiScreen::Connecting { dots: 2 }), BLUE),
            (Screen::WifiState(WifiScreen::Connected), GREEN),
            (Screen::WifiState(WifiScreen::Failed), RED),
        ];

        for (screen, background) in cases {
            let frame = rendered(&screen);
            assert_eq!(frame.pixel(0, 0), Some(background), "{:?}", screen);
            assert_eq!(frame.pixel(127, 127), Some(background), "{:?}", screen);
        }
    }

    #[test]
    fn test_idle_text_is_black() {
        let frame = rendered(&Screen::Idle);
        assert!(frame.count(BLACK) > 0);
    }

    #[test]
    fn test_hold_progress_draws_over_pressed_screen() {
        let mut frame = FrameBuffer::new();
        let Ok(()) = render(&Screen::ButtonDown, &mut frame);
        let Ok(()) = render(&Screen::HoldProgress { degrees: 0 }, &mut frame);
        assert_eq!(frame.count(ORANGE), 0);
        assert_eq!(frame.pixel(0, 0), Some(BLUE));

        let Ok(()) = render(&Screen::HoldProgress { degrees: 90 }, &mut frame);
        let quarter = frame.count(ORANGE);
        assert!(quarter > 0);

        let Ok(()) = render(&Screen::HoldProgress { degrees: 360 }, &mut frame);
        assert!(frame.count(ORANGE) > quarter * 3);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 21), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ééé", 2), "éé");
    }
}
