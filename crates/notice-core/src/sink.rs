//! External collaborators of the press logic.
//!
//! The controller never talks to hardware directly. It issues commands to a
//! [`NetworkSink`] (the WiFi/HTTP layer) and a [`PresentationSink`] (the
//! display layer). Only success or failure of a network call is consumed.

use heapless::String;
use thiserror_no_std::Error;

use crate::config::MAX_SSID_LEN;
use crate::ui::Screen;

/// Which webhook to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A recorded event (short press)
    Event,
    /// Privacy mode toggle (privacy hold)
    Privacy,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Event => "event",
            EventKind::Privacy => "privacy",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    #[error("WiFi not connected")]
    NotConnected,
    #[error("DNS lookup failed")]
    Dns,
    #[error("TCP connect failed")]
    Connect,
    #[error("TLS handshake failed")]
    Tls,
    #[error("HTTP request failed")]
    Request,
    #[error("Malformed HTTP response")]
    Response,
}

/// Link details shown on the debug screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkInfo {
    /// SSID of the associated network
    pub ssid: Option<String<MAX_SSID_LEN>>,
    /// Signal strength in dBm, when connected
    pub rssi: Option<i8>,
}

/// The WiFi/HTTP layer.
#[allow(async_fn_in_trait)]
pub trait NetworkSink {
    /// Fire the webhook for `kind`, returning the HTTP status code.
    async fn send_event(&mut self, kind: EventKind) -> Result<u16, NetworkError>;

    /// Current link details for diagnostics.
    fn link_info(&mut self) -> LinkInfo;
}

/// The display layer.
///
/// Commands are fire-and-forget; a presenter logs its own draw failures.
pub trait PresentationSink {
    fn show(&mut self, screen: &Screen);

    /// Advance the idle alive indicator by one frame.
    fn animate(&mut self) {}
}

impl<T: NetworkSink> NetworkSink for &mut T {
    async fn send_event(&mut self, kind: EventKind) -> Result<u16, NetworkError> {
        (**self).send_event(kind).await
    }

    fn link_info(&mut self) -> LinkInfo {
        (**self).link_info()
    }
}

impl<T: PresentationSink> PresentationSink for &mut T {
    fn show(&mut self, screen: &Screen) {
        (**self).show(screen)
    }

    fn animate(&mut self) {
        (**self).animate()
    }
}
