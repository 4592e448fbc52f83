//! Device configuration: WiFi networks, webhook endpoints and timings.
//!
//! The firmware fills a [`Config`] from build-time environment variables;
//! the simulator builds one in code. Everything borrows `'static`-friendly
//! string slices so no allocation is needed.

use embassy_time::Duration;
use heapless::Vec;
use thiserror_no_std::Error;

/// Maximum number of WiFi networks tried in order on boot
pub const MAX_WIFI_NETWORKS: usize = 4;

/// Longest SSID the 802.11 standard allows
pub const MAX_SSID_LEN: usize = 32;

/// Longest WPA2 passphrase
pub const MAX_PASSWORD_LEN: usize = 64;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No WiFi networks configured")]
    NoNetworks,
    #[error("Too many WiFi networks (max: {max})")]
    TooManyNetworks { max: usize },
    #[error("WiFi SSID is empty for network {index}")]
    EmptySsid { index: usize },
    #[error("WiFi credential too long for network {index}")]
    CredentialTooLong { index: usize },
    #[error("Webhook URL is empty: {name}")]
    EmptyUrl { name: &'static str },
}

/// Credentials for one access point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WifiNetwork<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

impl<'a> WifiNetwork<'a> {
    pub const fn new(ssid: &'a str, password: &'a str) -> Self {
        Self { ssid, password }
    }
}

/// Ordered list of networks; the first one that associates wins.
#[derive(Debug, Default, Clone)]
pub struct InternetConfig<'a> {
    pub networks: Vec<WifiNetwork<'a>, MAX_WIFI_NETWORKS>,
}

impl<'a> InternetConfig<'a> {
    /// Build from a slice, failing if it does not fit.
    pub fn from_networks(networks: &[WifiNetwork<'a>]) -> Result<Self, ConfigError> {
        let networks = Vec::from_slice(networks).map_err(|_| ConfigError::TooManyNetworks {
            max: MAX_WIFI_NETWORKS,
        })?;
        Ok(Self { networks })
    }
}

/// The two fixed webhook endpoints
#[derive(Debug, Default, Clone, Copy)]
pub struct WebhookConfig<'a> {
    /// Called on a short press
    pub event_url: &'a str,
    /// Called on release after a privacy hold
    pub privacy_url: &'a str,
}

/// Every duration the device uses.
///
/// The defaults reproduce the shipped device behaviour. Tests shorten
/// nothing; they drive a mock clock instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Hold duration that escalates a press to a privacy hold
    pub privacy_hold: Duration,
    /// Hold duration that escalates a press to the debug display
    pub debug_hold: Duration,
    /// Inactivity window before the idle screen returns
    pub idle_timeout: Duration,
    /// How long "Saved" stays up after a short press
    pub saved_dwell: Duration,
    /// Pause after the privacy webhook before the cycle completes
    pub privacy_dwell: Duration,
    /// Interval between link checks while associating
    pub wifi_check_interval: Duration,
    /// Link checks per network before moving on
    pub wifi_checks_per_network: u8,
    /// Pause after giving up on one network
    pub wifi_retry_gap: Duration,
    /// How long the failure screen stays before the next round
    pub wifi_failed_dwell: Duration,
    /// How long "Connected!" stays before the idle screen
    pub wifi_connected_dwell: Duration,
    /// Frame period of the idle alive indicator
    pub animation_frame: Duration,
    /// Stable-level window for the button debouncer
    pub debounce: Duration,
    /// Period of the main poll loop
    pub poll_interval: Duration,
}

impl Timings {
    pub const DEFAULT: Self = Self {
        privacy_hold: Duration::from_millis(3000),
        debug_hold: Duration::from_millis(10_000),
        idle_timeout: Duration::from_millis(5000),
        saved_dwell: Duration::from_millis(800),
        privacy_dwell: Duration::from_millis(1000),
        wifi_check_interval: Duration::from_millis(500),
        wifi_checks_per_network: 20,
        wifi_retry_gap: Duration::from_millis(500),
        wifi_failed_dwell: Duration::from_millis(5000),
        wifi_connected_dwell: Duration::from_millis(1500),
        animation_frame: Duration::from_millis(50),
        debounce: Duration::from_millis(10),
        poll_interval: Duration::from_millis(10),
    };
}

impl Default for Timings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Top-level device configuration
#[derive(Debug, Default, Clone)]
pub struct Config<'a> {
    pub internet: InternetConfig<'a>,
    pub webhooks: WebhookConfig<'a>,
    pub timings: Timings,
}

impl Config<'_> {
    /// Check the configuration before the device starts using it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.internet.networks.is_empty() {
            return Err(ConfigError::NoNetworks);
        }

        for (index, network) in self.internet.networks.iter().enumerate() {
            if network.ssid.is_empty() {
                return Err(ConfigError::EmptySsid { index });
            }
            if network.ssid.len() > MAX_SSID_LEN || network.password.len() > MAX_PASSWORD_LEN {
                return Err(ConfigError::CredentialTooLong { index });
            }
        }

        if self.webhooks.event_url.is_empty() {
            return Err(ConfigError::EmptyUrl { name: "event_url" });
        }
        if self.webhooks.privacy_url.is_empty() {
            return Err(ConfigError::EmptyUrl {
                name: "privacy_url",
            });
        }

        Ok(())
    }
}
