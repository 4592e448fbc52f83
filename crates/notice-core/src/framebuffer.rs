//! RAM framebuffer with changed-region tracking.
//!
//! Screens draw into this buffer instead of the SPI panel. Only the bounding
//! box of pixels that actually changed is pushed to the hardware afterwards,
//! which keeps the 50 ms alive-indicator frames and the per-tick hold ring
//! cheap on the bus.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// 128 x 128 = 16,384 pixels
const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Bounding box of pixels changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

/// Heap-backed 128x128 RGB565 framebuffer (32 KiB).
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Allocate a black framebuffer with nothing pending.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; PIXEL_COUNT],
            dirty: None,
        }
    }

    /// Color at `(x, y)`, or `None` off-screen.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    /// Number of pixels currently showing `color`.
    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|pixel| **pixel == color).count()
    }

    /// Whether a flush would send anything.
    pub fn has_changes(&self) -> bool {
        self.dirty.is_some()
    }

    /// Changed region as a rectangle, if any.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(|rect| {
            Rectangle::new(
                Point::new(rect.min_x as i32, rect.min_y as i32),
                Size::new(rect.width() as u32, rect.height() as u32),
            )
        })
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let index = y * WIDTH + x;
        if self.pixels[index] != color {
            self.pixels[index] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Push the changed region to `display` and reset change tracking.
    ///
    /// No-op when nothing changed.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };
        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(rect.width() as u32, rect.height() as u32),
        );

        trace!(
            "Flushing {}x{} region at ({}, {})",
            rect.width(),
            rect.height(),
            rect.min_x,
            rect.min_y
        );

        let pixels = &self.pixels;
        let width = rect.width();
        let colors = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * WIDTH + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, colors)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 && (coord.x as usize) < WIDTH && (coord.y as usize) < HEIGHT
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y as usize..=bottom_right.y as usize {
            for x in area.top_left.x as usize..=bottom_right.x as usize {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    /// Records what a flush sends, standing in for the SPI panel.
    struct CapturePanel {
        area: Option<Rectangle>,
        pixels: usize,
    }

    impl OriginDimensions for CapturePanel {
        fn size(&self) -> Size {
            Size::new(WIDTH as u32, HEIGHT as u32)
        }
    }

    impl DrawTarget for CapturePanel {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.pixels += pixels.into_iter().count();
            Ok(())
        }

        fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Self::Color>,
        {
            self.area = Some(*area);
            self.pixels += colors.into_iter().count();
            Ok(())
        }
    }

    #[test]
    fn test_new_buffer_is_clean() {
        let frame = FrameBuffer::new();
        assert!(!frame.has_changes());
        assert_eq!(frame.count(Rgb565::BLACK), PIXEL_COUNT);
    }

    #[test]
    fn test_flush_sends_only_changed_region() {
        let mut frame = FrameBuffer::new();
        let Ok(()) = Rectangle::new(Point::new(10, 20), Size::new(4, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut frame);

        let mut panel = CapturePanel {
            area: None,
            pixels: 0,
        };
        let Ok(()) = frame.flush(&mut panel);

        assert_eq!(
            panel.area,
            Some(Rectangle::new(Point::new(10, 20), Size::new(4, 3)))
        );
        assert_eq!(panel.pixels, 12);
        assert!(!frame.has_changes());
    }

    #[test]
    fn test_second_flush_sends_nothing() {
        let mut frame = FrameBuffer::new();
        let Ok(()) = frame.fill_solid(
            &Rectangle::new(Point::new(0, 0), Size::new(2, 2)),
            Rgb565::BLUE,
        );

        let mut panel = CapturePanel {
            area: None,
            pixels: 0,
        };
        let Ok(()) = frame.flush(&mut panel);
        assert_eq!(panel.pixels, 4);

        panel.area = None;
        let Ok(()) = frame.flush(&mut panel);
        assert_eq!(panel.area, None);
        assert_eq!(panel.pixels, 4);
    }

    #[test]
    fn test_redrawing_same_color_is_not_a_change() {
        let mut frame = FrameBuffer::new();
        let Ok(()) = frame.clear(Rgb565::BLACK);
        assert!(!frame.has_changes());
    }

    #[test]
    fn test_off_screen_pixels_are_clipped() {
        let mut frame = FrameBuffer::new();
        let Ok(()) = frame.fill_solid(
            &Rectangle::new(Point::new(120, -5), Size::new(20, 10)),
            Rgb565::GREEN,
        );
        assert_eq!(frame.count(Rgb565::GREEN), 8 * 5);
        assert_eq!(frame.pixel(128, 0), None);
    }
}
