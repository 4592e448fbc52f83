//! Webhook client: the device's [`NetworkSink`].
//!
//! Each event is a payload-less GET to one of two fixed URLs over the
//! embassy-net stack, plain HTTP or HTTPS (no certificate verification).
//! Any HTTP status counts as delivered; only transport failures are errors.

use embassy_net::Stack;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use esp_hal::rng::Rng;
use log::{debug, info, warn};
use notice_core::{EventKind, LinkInfo, NetworkError, NetworkSink, WebhookConfig, WifiLink};
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::request::Method;

use crate::wifi_link::EspWifiLink;

const TCP_BUFFER_SIZE: usize = 4096;

/// TCP socket pool: one request at a time
pub type WebhookTcpState = TcpClientState<1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>;

/// Scratch buffers for one HTTPS exchange (TLS records need 16 KiB + overhead)
pub struct HttpBuffers {
    tls_read: [u8; 16_640],
    tls_write: [u8; 4096],
    response: [u8; 4096],
}

impl HttpBuffers {
    pub const fn new() -> Self {
        Self {
            tls_read: [0; 16_640],
            tls_write: [0; 4096],
            response: [0; 4096],
        }
    }
}

impl Default for HttpBuffers {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WebhookClient {
    link: EspWifiLink,
    ssid: &'static str,
    stack: Stack<'static>,
    tcp: TcpClient<'static, 1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>,
    dns: DnsSocket<'static>,
    buffers: &'static mut HttpBuffers,
    webhooks: WebhookConfig<'static>,
    rng: Rng,
}

impl WebhookClient {
    pub fn new(
        link: EspWifiLink,
        ssid: &'static str,
        stack: Stack<'static>,
        tcp_state: &'static WebhookTcpState,
        buffers: &'static mut HttpBuffers,
        webhooks: WebhookConfig<'static>,
    ) -> Self {
        Self {
            link,
            ssid,
            stack,
            tcp: TcpClient::new(stack, tcp_state),
            dns: DnsSocket::new(stack),
            buffers,
            webhooks,
            rng: Rng::new(),
        }
    }

    fn url(&self, kind: EventKind) -> &'static str {
        match kind {
            EventKind::Event => self.webhooks.event_url,
            EventKind::Privacy => self.webhooks.privacy_url,
        }
    }
}

fn map_error(e: reqwless::Error) -> NetworkError {
    warn!("HTTP error: {:?}", e);
    match e {
        reqwless::Error::Dns => NetworkError::Dns,
        reqwless::Error::Network(_) => NetworkError::Connect,
        reqwless::Error::Tls(_) => NetworkError::Tls,
        reqwless::Error::Codec | reqwless::Error::BufferTooSmall => NetworkError::Response,
        _ => NetworkError::Request,
    }
}

impl NetworkSink for WebhookClient {
    async fn send_event(&mut self, kind: EventKind) -> Result<u16, NetworkError> {
        if !self.link.is_connected() || !self.stack.is_config_up() {
            warn!("WiFi not connected, skipping HTTP request");
            return Err(NetworkError::NotConnected);
        }

        let url = self.url(kind);
        info!("Making GET request to: {}", url);

        let seed = (u64::from(self.rng.random()) << 32) | u64::from(self.rng.random());
        let HttpBuffers {
            tls_read,
            tls_write,
            response,
        } = &mut *self.buffers;
        let tls = TlsConfig::new(seed, tls_read, tls_write, TlsVerify::None);
        let mut client = HttpClient::new_with_tls(&self.tcp, &self.dns, tls);

        let mut request = client.request(Method::GET, url).await.map_err(map_error)?;
        let reply = request.send(response).await.map_err(map_error)?;
        let status = reply.status.0;
        info!("HTTP Response code: {}", status);

        match reply.body().read_to_end().await {
            Ok(body) => debug!("{}", core::str::from_utf8(body).unwrap_or("<non-UTF-8 body>")),
            Err(e) => debug!("Failed to read response body: {:?}", e),
        }

        Ok(status)
    }

    fn link_info(&mut self) -> LinkInfo {
        let rssi = if self.link.is_connected() {
            self.link.rssi()
        } else {
            None
        };
        LinkInfo {
            ssid: heapless::String::try_from(self.ssid).ok(),
            rssi,
        }
    }
}
