//! Idle-screen alive indicator: a five-dot comet orbiting the top-right corner.

use core::f32::consts::{FRAC_PI_2, TAU};

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
};

use super::DISPLAY_WIDTH_PX;
use super::colors::{LIME, ORANGE, WHITE, blend};

const DOT_COUNT: usize = 5;
const DOT_DIAMETER_PX: u32 = 5;
const DOT_SPACING_PX: f32 = 5.0;
const ORBIT_RADIUS_PX: f32 = 10.0;
const ORBIT_CENTER: Point = Point::new(DISPLAY_WIDTH_PX as i32 - 20, 20);

/// Radians advanced per frame
const STEP_RAD: f32 = 0.05;

/// Comet state between frames.
#[derive(Debug, Clone, Default)]
pub struct AliveIndicator {
    angle: f32,
    previous: Option<[Point; DOT_COUNT]>,
}

impl AliveIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Forget the last drawn frame, e.g. after the background was repainted.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Erase the previous frame, draw the comet at the current angle, then advance.
    pub fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if let Some(previous) = self.previous.take() {
            let erase = PrimitiveStyle::with_fill(LIME);
            for center in previous {
                Circle::with_center(center, DOT_DIAMETER_PX)
                    .into_styled(erase)
                    .draw(display)?;
            }
        }

        let dots = self.dot_centers();
        for (i, center) in dots.iter().enumerate() {
            // Tail (i = 0) is orange, head fades towards white
            let color = blend(ORANGE, WHITE, i as f32 / DOT_COUNT as f32);
            Circle::with_center(*center, DOT_DIAMETER_PX)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)?;
        }
        self.previous = Some(dots);

        self.angle += STEP_RAD;
        if self.angle > TAU {
            self.angle = 0.0;
        }
        Ok(())
    }

    /// Dot centers laid along the orbit tangent, tail first.
    fn dot_centers(&self) -> [Point; DOT_COUNT] {
        let anchor_x = ORBIT_CENTER.x as f32 + ORBIT_RADIUS_PX * libm::cosf(self.angle);
        let anchor_y = ORBIT_CENTER.y as f32 + ORBIT_RADIUS_PX * libm::sinf(self.angle);
        let tangent = self.angle + FRAC_PI_2;
        let (dx, dy) = (libm::cosf(tangent), libm::sinf(tangent));

        let mut centers = [Point::zero(); DOT_COUNT];
        for (i, center) in centers.iter_mut().enumerate() {
            let offset = (i as f32 - DOT_COUNT as f32 / 2.0) * DOT_SPACING_PX;
            *center = Point::new(
                libm::roundf(anchor_x + offset * dx) as i32,
                libm::roundf(anchor_y + offset * dy) as i32,
            );
        }
        centers
    }
}
