//! WiFi connection supervisor.
//!
//! The device never runs without connectivity. [`WifiSupervisor`] walks the
//! configured networks in order, polling the link every check interval for a
//! bounded number of checks per network. When every network has failed it
//! shows the failure screen for a while and starts over, forever.
//!
//! It is a poll-driven state machine rather than a blocking loop: the caller
//! invokes [`WifiSupervisor::poll`] from its own loop until it reports
//! [`WifiState::Connected`].

use embassy_time::Instant;
use log::{info, warn};
use thiserror_no_std::Error;

use crate::config::{InternetConfig, Timings, WifiNetwork};
use crate::sink::PresentationSink;
use crate::ui::{Screen, WifiScreen};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    #[error("Failed to apply WiFi configuration")]
    Configure,
    #[error("Failed to start WiFi")]
    Start,
    #[error("Failed to start association")]
    Connect,
    #[error("Failed to disconnect")]
    Disconnect,
}

/// Station-mode radio, as far as the supervisor needs it.
pub trait WifiLink {
    /// Start associating with `network`. Returns without waiting for the link.
    fn begin(&mut self, network: &WifiNetwork<'_>) -> Result<(), LinkError>;

    /// Whether the station is associated.
    fn is_connected(&mut self) -> bool;

    /// Abort the current association attempt.
    fn disconnect(&mut self) -> Result<(), LinkError>;
}

/// Externally visible connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    /// Trying network `network` (index into the configured list)
    Connecting { network: usize, check: u8 },
    Connected { network: usize },
    /// Every network failed; waiting before the next round
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start {
        network: usize,
    },
    Checking {
        network: usize,
        check: u8,
        next_at: Instant,
    },
    Gap {
        network: usize,
        until: Instant,
    },
    Failed {
        until: Instant,
    },
    Connected {
        network: usize,
    },
}

pub struct WifiSupervisor<'a> {
    internet: InternetConfig<'a>,
    timings: Timings,
    phase: Phase,
}

impl<'a> WifiSupervisor<'a> {
    pub fn new(internet: InternetConfig<'a>, timings: Timings) -> Self {
        Self {
            internet,
            timings,
            phase: Phase::Start { network: 0 },
        }
    }

    /// The network the link is associated with, once connected.
    pub fn connected_network(&self) -> Option<&WifiNetwork<'a>> {
        match self.phase {
            Phase::Connected { network } => self.internet.networks.get(network),
            _ => None,
        }
    }

    /// Drop back to the first network on the next poll.
    pub fn restart(&mut self) {
        self.phase = Phase::Start { network: 0 };
    }

    pub fn state(&self) -> WifiState {
        match self.phase {
            Phase::Start { network } | Phase::Gap { network, .. } => WifiState::Connecting {
                network,
                check: 0,
            },
            Phase::Checking { network, check, .. } => WifiState::Connecting { network, check },
            Phase::Failed { .. } => WifiState::Failed,
            Phase::Connected { network } => WifiState::Connected { network },
        }
    }

    /// Advance the state machine, driving `link` and the WiFi screens.
    pub fn poll<L, P>(&mut self, now: Instant, link: &mut L, presenter: &mut P) -> WifiState
    where
        L: WifiLink,
        P: PresentationSink,
    {
        match self.phase {
            Phase::Gap { network, until } if now >= until => {
                let next = network + 1;
                if next < self.internet.networks.len() {
                    self.phase = Phase::Start { network: next };
                } else {
                    self.fail(now, presenter);
                }
            }
            Phase::Failed { until } if now >= until => {
                self.phase = Phase::Start { network: 0 };
            }
            _ => {}
        }

        if let Phase::Start { network } = self.phase {
            self.start(network, now, link, presenter);
        }

        if let Phase::Checking {
            network,
            check,
            next_at,
        } = self.phase
        {
            if now >= next_at {
                self.check(network, check, now, link, presenter);
            }
        }

        self.state()
    }

    fn start<L, P>(&mut self, network: usize, now: Instant, link: &mut L, presenter: &mut P)
    where
        L: WifiLink,
        P: PresentationSink,
    {
        let Some(net) = self.internet.networks.get(network).copied() else {
            self.fail(now, presenter);
            return;
        };

        if network == 0 {
            presenter.show(&Screen::WifiState(WifiScreen::Connecting { dots: 0 }));
        }
        info!("Trying network: {}", net.ssid);

        match link.begin(&net) {
            Ok(()) => {
                self.phase = Phase::Checking {
                    network,
                    check: 0,
                    next_at: now,
                };
            }
            Err(e) => {
                warn!("{}: {}", net.ssid, e);
                self.phase = Phase::Gap {
                    network,
                    until: now + self.timings.wifi_retry_gap,
                };
            }
        }
    }

    fn check<L, P>(&mut self, network: usize, check: u8, now: Instant, link: &mut L, presenter: &mut P)
    where
        L: WifiLink,
        P: PresentationSink,
    {
        if link.is_connected() {
            if let Some(net) = self.internet.networks.get(network) {
                info!("WiFi connected to {}", net.ssid);
            }
            presenter.show(&Screen::WifiState(WifiScreen::Connected));
            self.phase = Phase::Connected { network };
        } else if check >= self.timings.wifi_checks_per_network {
            warn!("Failed to connect to network {}", network);
            if let Err(e) = link.disconnect() {
                warn!("{}", e);
            }
            self.phase = Phase::Gap {
                network,
                until: now + self.timings.wifi_retry_gap,
            };
        } else {
            presenter.show(&Screen::WifiState(WifiScreen::Connecting {
                dots: check % 3 + 1,
            }));
            self.phase = Phase::Checking {
                network,
                check: check + 1,
                next_at: now + self.timings.wifi_check_interval,
            };
        }
    }

    fn fail<P: PresentationSink>(&mut self, now: Instant, presenter: &mut P) {
        warn!("Failed to connect to any WiFi network, retrying");
        presenter.show(&Screen::WifiState(WifiScreen::Failed));
        self.phase = Phase::Failed {
            until: now + self.timings.wifi_failed_dwell,
        };
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    /// Associates with `target` after `checks_needed` status polls.
    struct MockLink {
        target: Option<&'static str>,
        checks_needed: u32,
        current: Option<&'static str>,
        checks: u32,
        begun: Vec<&'static str>,
        disconnects: u32,
    }

    impl MockLink {
        fn new(target: Option<&'static str>, checks_needed: u32) -> Self {
            Self {
                target,
                checks_needed,
                current: None,
                checks: 0,
                begun: Vec::new(),
                disconnects: 0,
            }
        }
    }

    impl WifiLink for MockLink {
        fn begin(&mut self, network: &WifiNetwork<'_>) -> Result<(), LinkError> {
            let ssid = match network.ssid {
                "home" => "home",
                "office" => "office",
                _ => "other",
            };
            self.current = Some(ssid);
            self.checks = 0;
            self.begun.push(ssid);
            Ok(())
        }

        fn is_connected(&mut self) -> bool {
            self.checks += 1;
            self.current.is_some() && self.current == self.target && self.checks > self.checks_needed
        }

        fn disconnect(&mut self) -> Result<(), LinkError> {
            self.current = None;
            self.disconnects += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Screens(Vec<Screen>);

    impl PresentationSink for Screens {
        fn show(&mut self, screen: &Screen) {
            self.0.push(screen.clone());
        }
    }

    fn supervisor() -> WifiSupervisor<'static> {
        let internet = InternetConfig::from_networks(&[
            WifiNetwork::new("home", "secret"),
            WifiNetwork::new("office", "secret"),
        ])
        .unwrap();
        WifiSupervisor::new(internet, Timings::default())
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_connects_to_first_network() {
        let mut wifi = supervisor();
        let mut link = MockLink::new(Some("home"), 2);
        let mut screens = Screens::default();

        let mut t = 0;
        let state = loop {
            let state = wifi.poll(at(t), &mut link, &mut screens);
            if matches!(state, WifiState::Connected { .. }) || t > 60_000 {
                break state;
            }
            t += 100;
        };

        assert_eq!(state, WifiState::Connected { network: 0 });
        assert_eq!(t, 1000);
        assert_eq!(wifi.connected_network().map(|n| n.ssid), Some("home"));
        assert_eq!(
            screens.0,
            [
                Screen::WifiState(WifiScreen::Connecting { dots: 0 }),
                Screen::WifiState(WifiScreen::Connecting { dots: 1 }),
                Screen::WifiState(WifiScreen::Connecting { dots: 2 }),
                Screen::WifiState(WifiScreen::Connected),
            ]
        );
    }

    #[test]
    fn test_falls_through_to_second_network() {
        let mut wifi = supervisor();
        let mut link = MockLink::new(Some("office"), 0);
        let mut screens = Screens::default();

        let mut t = 0;
        while !matches!(wifi.poll(at(t), &mut link, &mut screens), WifiState::Connected { .. }) {
            assert!(t < 60_000);
            t += 100;
        }

        // 20 checks at 500 ms, the failing final check, then the 500 ms gap
        assert_eq!(t, 10_500);
        assert_eq!(link.begun, ["home", "office"]);
        assert_eq!(link.disconnects, 1);
        assert_eq!(wifi.state(), WifiState::Connected { network: 1 });
    }

    #[test]
    fn test_retries_forever_after_failed_round() {
        let mut wifi = supervisor();
        let mut link = MockLink::new(None, 0);
        let mut screens = Screens::default();

        let mut t = 0;
        while wifi.poll(at(t), &mut link, &mut screens) != WifiState::Failed {
            assert!(t < 60_000);
            t += 100;
        }
        assert_eq!(
            screens.0.last(),
            Some(&Screen::WifiState(WifiScreen::Failed))
        );

        let failed_at = t;
        while wifi.poll(at(t), &mut link, &mut screens) == WifiState::Failed {
            t += 100;
        }
        assert_eq!(t - failed_at, 5000);
        assert_eq!(link.begun, ["home", "office", "home"]);
    }

    #[test]
    fn test_dots_cycle() {
        let mut wifi = supervisor();
        let mut link = MockLink::new(None, 0);
        let mut screens = Screens::default();

        for t in (0..=2500).step_by(500) {
            wifi.poll(at(t), &mut link, &mut screens);
        }
        let dots: Vec<u8> = screens
            .0
            .iter()
            .filter_map(|screen| match screen {
                Screen::WifiState(WifiScreen::Connecting { dots }) => Some(*dots),
                _ => None,
            })
            .collect();
        assert_eq!(dots, [0, 1, 2, 3, 1, 2, 3]);
    }
}
