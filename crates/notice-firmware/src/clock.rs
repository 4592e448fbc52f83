use embassy_time::Instant;
use notice_core::Clock;

/// The embassy time driver (esp-rtos timer group 0).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
