//! The AtomS3 front button (GPIO41, active low with pull-up).

use embassy_time::{Duration, Instant};
use esp_hal::gpio::Input;
use notice_core::{ButtonEdge, Debouncer};

pub struct Button<'d> {
    input: Input<'d>,
    debouncer: Debouncer,
}

impl<'d> Button<'d> {
    pub fn new(input: Input<'d>, debounce: Duration) -> Self {
        Self {
            input,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Sample the pin once and return a debounced edge, if any.
    pub fn poll(&mut self, now: Instant) -> Option<ButtonEdge> {
        self.debouncer.update(self.input.is_low(), now)
    }
}
