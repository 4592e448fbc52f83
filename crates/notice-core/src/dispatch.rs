//! Release dispatcher: maps a finalized gesture to its side effect.
//!
//! | Gesture       | Side effect                                         |
//! |---------------|-----------------------------------------------------|
//! | `Short`       | "event" webhook, Saving then Saved confirmation     |
//! | `PrivacyHold` | "privacy" webhook, privacy screen stays up          |
//! | `DebugHold`   | enter the debug display until the next button-down  |
//!
//! Webhook failures are logged and never retried. The release sequence always
//! runs to completion whatever the network outcome.

use embedded_hal_async::delay::DelayNs;
use log::{debug, error, info};

use crate::config::Timings;
use crate::gesture::Gesture;
use crate::session::Session;
use crate::sink::{EventKind, NetworkSink, PresentationSink};
use crate::ui::Screen;

pub struct Dispatcher<'a, N, P, D> {
    network: &'a mut N,
    presenter: &'a mut P,
    delay: &'a mut D,
    timings: &'a Timings,
}

impl<'a, N, P, D> Dispatcher<'a, N, P, D>
where
    N: NetworkSink,
    P: PresentationSink,
    D: DelayNs,
{
    pub fn new(
        network: &'a mut N,
        presenter: &'a mut P,
        delay: &'a mut D,
        timings: &'a Timings,
    ) -> Self {
        Self {
            network,
            presenter,
            delay,
            timings,
        }
    }

    /// Run the side effect of a released press.
    ///
    /// `gesture` must already be finalized; [`Gesture::None`] dispatches nothing.
    pub async fn dispatch(&mut self, session: &mut Session, gesture: Gesture) {
        match gesture {
            Gesture::None => debug!("Unfinalized press, nothing to dispatch"),
            Gesture::Short => {
                info!("Short press, sending event");
                self.presenter.show(&Screen::Saving);
                self.send(EventKind::Event).await;
                self.presenter.show(&Screen::Saved);
                self.delay
                    .delay_ms(self.timings.saved_dwell.as_millis() as u32)
                    .await;
            }
            Gesture::PrivacyHold => {
                info!("Privacy hold released, sending privacy toggle");
                self.send(EventKind::Privacy).await;
                self.delay
                    .delay_ms(self.timings.privacy_dwell.as_millis() as u32)
                    .await;
            }
            Gesture::DebugHold => {
                info!("Debug display active until next press");
                session.enter_debug_display();
            }
        }
    }

    async fn send(&mut self, kind: EventKind) {
        match self.network.send_event(kind).await {
            Ok(status) => info!("{} webhook answered HTTP {}", kind.as_str(), status),
            Err(e) => error!("{} webhook failed: {}", kind.as_str(), e),
        }
    }
}
