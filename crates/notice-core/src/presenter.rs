//! Presentation sink backed by a framebuffer.
//!
//! Screens are rendered into a [`FrameBuffer`] and only the changed region is
//! flushed to the real display, so the same presenter drives the LCD on the
//! device and the simulator window on the desktop.

use core::fmt::Debug;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::{debug, error};

use crate::framebuffer::FrameBuffer;
use crate::sink::PresentationSink;
use crate::ui::{self, AliveIndicator, Screen};

/// Owns the display and renders [`Screen`] commands onto it
pub struct FramePresenter<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    display: D,
    frame: FrameBuffer,
    alive: AliveIndicator,
    showing_idle: bool,
}

impl<D> FramePresenter<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    pub fn new(display: D) -> Self {
        Self {
            display,
            frame: FrameBuffer::new(),
            alive: AliveIndicator::new(),
            showing_idle: false,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The RAM copy of what is on screen.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn flush(&mut self) {
        if let Err(e) = self.frame.flush(&mut self.display) {
            error!("Display flush failed: {:?}", e);
        }
    }
}

impl<D> PresentationSink for FramePresenter<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    fn show(&mut self, screen: &Screen) {
        debug!("Showing {:?}", screen);

        let Ok(()) = ui::render(screen, &mut self.frame);
        self.showing_idle = matches!(screen, Screen::Idle);
        if self.showing_idle {
            // Background was repainted under the comet
            self.alive.reset();
        }
        self.flush();
    }

    fn animate(&mut self) {
        if !self.showing_idle {
            return;
        }
        let Ok(()) = self.alive.draw(&mut self.frame);
        self.flush();
    }
}
