//! Desktop simulator for the notice-rs event tracker button.
//!
//! Runs the real notice-core controller against an SDL2 window via
//! `embedded-graphics-simulator`, with a mock WiFi link and a mock webhook
//! sink so every gesture can be exercised without hardware.
//!
//! # Key bindings
//!
//! | Key          | Action                               |
//! |--------------|--------------------------------------|
//! | Space, mouse | The button (hold for privacy/debug)  |
//! | F            | Toggle simulated webhook failures    |
//! | Q, Esc       | Quit                                 |

use std::thread;
use std::time::Duration as StdDuration;

use embassy_futures::block_on;
use embassy_time::{Delay, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{info, warn};

use notice_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use notice_core::{
    Clock, Controller, Debouncer, EventKind, FramePresenter, InternetConfig, LinkError, LinkInfo,
    NetworkError, NetworkSink, PresentationSink, Screen, Timings, WifiLink, WifiNetwork,
    WifiState, WifiSupervisor,
};

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 3;

/// Networks offered to the supervisor; only the second one exists.
const NETWORKS: [WifiNetwork<'static>; 2] = [
    WifiNetwork::new("notice-missing", "nope"),
    WifiNetwork::new("notice-sim", "simulated"),
];

/// Status polls before the simulated access point accepts us.
const ASSOCIATION_CHECKS: u32 = 3;

/// Pretend round-trip time of a webhook call.
const WEBHOOK_LATENCY: StdDuration = StdDuration::from_millis(250);

// ---------------------------------------------------------------------------
// Mocks
// ---------------------------------------------------------------------------

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Associates only with `notice-sim`, after a few status polls.
struct MockLink {
    target: Option<&'static str>,
    checks: u32,
}

impl WifiLink for MockLink {
    fn begin(&mut self, network: &WifiNetwork<'_>) -> Result<(), LinkError> {
        self.target = NETWORKS
            .iter()
            .find(|n| n.ssid == network.ssid)
            .map(|n| n.ssid);
        self.checks = 0;
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.checks += 1;
        self.target == Some(NETWORKS[1].ssid) && self.checks > ASSOCIATION_CHECKS
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        self.target = None;
        Ok(())
    }
}

/// Logs webhook calls instead of sending them.
struct MockNetwork {
    ssid: &'static str,
    failing: bool,
}

impl NetworkSink for MockNetwork {
    async fn send_event(&mut self, kind: EventKind) -> Result<u16, NetworkError> {
        thread::sleep(WEBHOOK_LATENCY);
        if self.failing {
            return Err(NetworkError::Connect);
        }
        info!("GET /{} -> 200 OK", kind.as_str());
        Ok(200)
    }

    fn link_info(&mut self) -> LinkInfo {
        LinkInfo {
            ssid: heapless::String::try_from(self.ssid).ok(),
            rssi: Some(-58),
        }
    }
}

// ---------------------------------------------------------------------------
// Window presenter
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Input {
    quit: bool,
    toggle_failure: bool,
}

/// Presents onto the simulator display and pushes every change to the window.
struct WindowPresenter {
    inner: FramePresenter<SimulatorDisplay<Rgb565>>,
    window: Window,
    button_held: bool,
}

impl WindowPresenter {
    fn new() -> Self {
        let display = SimulatorDisplay::<Rgb565>::new(Size::new(
            DISPLAY_WIDTH_PX as u32,
            DISPLAY_HEIGHT_PX as u32,
        ));
        let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
        let window = Window::new("Notice Simulator", &output_settings);

        let mut presenter = Self {
            inner: FramePresenter::new(display),
            window,
            button_held: false,
        };
        // The SDL window is created lazily; update() must run before events()
        presenter.refresh();
        presenter
    }

    fn refresh(&mut self) {
        self.window.update(self.inner.display());
    }

    /// Drain SDL events, tracking the button level.
    fn poll_input(&mut self) -> Input {
        let mut input = Input::default();
        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => input.quit = true,
                SimulatorEvent::KeyDown {
                    keycode, repeat, ..
                } => match keycode {
                    Keycode::Q | Keycode::Escape => input.quit = true,
                    Keycode::Space if !repeat => self.button_held = true,
                    Keycode::F if !repeat => input.toggle_failure = true,
                    _ => {}
                },
                SimulatorEvent::KeyUp { keycode, .. } if keycode == Keycode::Space => {
                    self.button_held = false;
                }
                SimulatorEvent::MouseButtonDown { .. } => self.button_held = true,
                SimulatorEvent::MouseButtonUp { .. } => self.button_held = false,
                _ => {}
            }
        }
        input
    }
}

impl PresentationSink for WindowPresenter {
    fn show(&mut self, screen: &Screen) {
        self.inner.show(screen);
        self.refresh();
    }

    fn animate(&mut self) {
        self.inner.animate();
        self.refresh();
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting notice-rs simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: Space/mouse=button  F=toggle webhook failure  Q=Quit");

    let timings = Timings::default();
    let poll = StdDuration::from_millis(timings.poll_interval.as_millis());

    let mut presenter = WindowPresenter::new();

    // -----------------------------------------------------------------------
    // WiFi connection
    // -----------------------------------------------------------------------
    let internet = match InternetConfig::from_networks(&NETWORKS) {
        Ok(internet) => internet,
        Err(e) => {
            warn!("{}", e);
            return;
        }
    };
    let mut link = MockLink {
        target: None,
        checks: 0,
    };
    let mut supervisor = WifiSupervisor::new(internet, timings);
    let ssid = loop {
        if presenter.poll_input().quit {
            return;
        }
        if let WifiState::Connected { network } =
            supervisor.poll(Instant::now(), &mut link, &mut presenter)
        {
            break NETWORKS[network].ssid;
        }
        thread::sleep(poll);
    };
    thread::sleep(StdDuration::from_millis(
        timings.wifi_connected_dwell.as_millis(),
    ));

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    let network = MockNetwork {
        ssid,
        failing: false,
    };
    let mut controller = Controller::new(timings, network, presenter, SystemClock, Delay);
    controller.start();
    let mut debouncer = Debouncer::new(timings.debounce);

    loop {
        let input = controller.presenter_mut().poll_input();
        if input.quit {
            break;
        }
        if input.toggle_failure {
            let network = controller.network_mut();
            network.failing = !network.failing;
            info!("Simulated webhook failures: {}", network.failing);
        }

        let held = controller.presenter().button_held;
        let edge = debouncer.update(held, Instant::now());
        block_on(controller.tick(edge));

        thread::sleep(poll);
    }

    info!("Simulator exiting");
}
