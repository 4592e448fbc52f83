//! esp-radio station link behind the supervisor's [`WifiLink`] trait.

use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController};
use log::{debug, warn};
use notice_core::{LinkError, WifiLink, WifiNetwork};

pub struct EspWifiLink {
    controller: WifiController<'static>,
    started: bool,
}

impl EspWifiLink {
    pub fn new(controller: WifiController<'static>) -> Self {
        Self {
            controller,
            started: false,
        }
    }

    /// Signal strength of the current association in dBm.
    pub fn rssi(&mut self) -> Option<i8> {
        self.controller
            .rssi()
            .ok()
            .map(|rssi| rssi.clamp(i8::MIN as i32, i8::MAX as i32) as i8)
    }
}

impl WifiLink for EspWifiLink {
    fn begin(&mut self, network: &WifiNetwork<'_>) -> Result<(), LinkError> {
        let config = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(network.ssid.into())
                .with_password(network.password.into()),
        );
        self.controller.set_config(&config).map_err(|e| {
            warn!("Wi-Fi set_config failed: {:?}", e);
            LinkError::Configure
        })?;

        if !self.started {
            self.controller.start().map_err(|e| {
                warn!("Wi-Fi start failed: {:?}", e);
                LinkError::Start
            })?;
            self.started = true;
            debug!("Wi-Fi started");
        }

        self.controller.connect().map_err(|e| {
            warn!("Wi-Fi connect failed: {:?}", e);
            LinkError::Connect
        })
    }

    fn is_connected(&mut self) -> bool {
        matches!(self.controller.is_connected(), Ok(true))
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        self.controller.disconnect().map_err(|e| {
            warn!("Wi-Fi disconnect failed: {:?}", e);
            LinkError::Disconnect
        })
    }
}
