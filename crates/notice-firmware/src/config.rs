//! Build-time configuration, baked in from `.env` by `build.rs`.

use notice_core::config::MAX_WIFI_NETWORKS;
use notice_core::{Config, ConfigError, InternetConfig, Timings, WebhookConfig, WifiNetwork};

const PRIMARY: WifiNetwork<'static> = WifiNetwork::new(env!("WIFI_SSID"), env!("WIFI_PASSWORD"));

const FALLBACKS: [Option<(&str, &str)>; 3] = [
    pair(option_env!("WIFI_SSID_2"), option_env!("WIFI_PASSWORD_2")),
    pair(option_env!("WIFI_SSID_3"), option_env!("WIFI_PASSWORD_3")),
    pair(option_env!("WIFI_SSID_4"), option_env!("WIFI_PASSWORD_4")),
];

const WEBHOOKS: WebhookConfig<'static> = WebhookConfig {
    event_url: env!("EVENT_URL"),
    privacy_url: env!("PRIVACY_URL"),
};

/// An open network may leave the password out.
const fn pair(
    ssid: Option<&'static str>,
    password: Option<&'static str>,
) -> Option<(&'static str, &'static str)> {
    match (ssid, password) {
        (Some(ssid), Some(password)) => Some((ssid, password)),
        (Some(ssid), None) => Some((ssid, "")),
        _ => None,
    }
}

/// Assemble and validate the device configuration.
pub fn load() -> Result<Config<'static>, ConfigError> {
    let mut networks: heapless::Vec<WifiNetwork<'static>, MAX_WIFI_NETWORKS> = heapless::Vec::new();
    // Capacity is exactly one primary plus three fallbacks
    let _ = networks.push(PRIMARY);
    for (ssid, password) in FALLBACKS.into_iter().flatten() {
        if !ssid.is_empty() {
            let _ = networks.push(WifiNetwork::new(ssid, password));
        }
    }

    let config = Config {
        internet: InternetConfig::from_networks(&networks)?,
        webhooks: WEBHOOKS,
        timings: Timings::DEFAULT,
    };
    config.validate()?;
    Ok(config)
}
