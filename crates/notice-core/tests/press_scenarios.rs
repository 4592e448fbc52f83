//! End-to-end press scenarios driven through the controller with a fake
//! clock, a delay that advances it, and recording sinks.

use std::cell::Cell;
use std::rc::Rc;

use embassy_futures::block_on;
use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;
use notice_core::{
    ButtonEdge, Clock, Controller, Dispatcher, EventKind, Gesture, LinkInfo, Mode, NetworkError,
    NetworkSink, PresentationSink, Screen, Session, Timings,
};

const TICK_MS: u64 = 10;

#[derive(Clone, Default)]
struct FakeClock(Rc<Cell<u64>>);

impl FakeClock {
    fn millis(&self) -> u64 {
        self.0.get()
    }

    fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.get())
    }
}

/// Delay that returns immediately after moving the fake clock forward.
struct FakeDelay(FakeClock);

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        let clock = &self.0;
        clock.set(clock.millis() + u64::from(ns) / 1_000_000);
    }

    async fn delay_us(&mut self, us: u32) {
        let clock = &self.0;
        clock.set(clock.millis() + u64::from(us) / 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        let clock = &self.0;
        clock.set(clock.millis() + u64::from(ms));
    }
}

#[derive(Default)]
struct RecordingNetwork {
    sent: Vec<EventKind>,
    fail: bool,
}

impl NetworkSink for RecordingNetwork {
    async fn send_event(&mut self, kind: EventKind) -> Result<u16, NetworkError> {
        self.sent.push(kind);
        if self.fail {
            Err(NetworkError::NotConnected)
        } else {
            Ok(200)
        }
    }

    fn link_info(&mut self) -> LinkInfo {
        LinkInfo {
            ssid: Some(heapless::String::try_from("home").unwrap()),
            rssi: Some(-61),
        }
    }
}

#[derive(Default)]
struct RecordingPresenter {
    screens: Vec<Screen>,
    frames: usize,
}

impl RecordingPresenter {
    fn contains(&self, screen: &Screen) -> bool {
        self.screens.contains(screen)
    }

    fn last(&self) -> Option<&Screen> {
        self.screens.last()
    }
}

impl PresentationSink for RecordingPresenter {
    fn show(&mut self, screen: &Screen) {
        self.screens.push(screen.clone());
    }

    fn animate(&mut self) {
        self.frames += 1;
    }
}

struct Rig {
    clock: FakeClock,
    controller: Controller<RecordingNetwork, RecordingPresenter, FakeClock, FakeDelay>,
}

impl Rig {
    fn new() -> Self {
        Self::with_network(RecordingNetwork::default())
    }

    fn with_network(network: RecordingNetwork) -> Self {
        let clock = FakeClock::default();
        let mut controller = Controller::new(
            Timings::default(),
            network,
            RecordingPresenter::default(),
            clock.clone(),
            FakeDelay(clock.clone()),
        );
        controller.start();
        Self { clock, controller }
    }

    /// Poll without input until the clock reaches `ms`.
    fn run_until(&mut self, ms: u64) {
        while self.clock.millis() < ms {
            self.clock.set((self.clock.millis() + TICK_MS).min(ms));
            block_on(self.controller.tick(None));
        }
    }

    fn press_at(&mut self, ms: u64) {
        self.run_until(ms);
        block_on(self.controller.tick(Some(ButtonEdge::Down)));
    }

    fn release_at(&mut self, ms: u64) {
        self.run_until(ms);
        block_on(self.controller.tick(Some(ButtonEdge::Up)));
    }

    /// Release with no poll in between, so the last tick before the
    /// release is the one at the current clock.
    fn jump_release_at(&mut self, ms: u64) {
        self.clock.set(ms);
        block_on(self.controller.tick(Some(ButtonEdge::Up)));
    }

    fn sent(&self) -> &[EventKind] {
        &self.controller.network().sent
    }

    fn presenter(&self) -> &RecordingPresenter {
        self.controller.presenter()
    }

    fn clear_screens(&mut self) {
        self.controller.presenter_mut().screens.clear();
    }
}

#[test]
fn test_short_press_sends_event() {
    let mut rig = Rig::new();
    rig.press_at(0);
    assert_eq!(rig.presenter().screens[1], Screen::ButtonDown);

    rig.release_at(500);

    assert_eq!(rig.sent(), [EventKind::Event]);
    let screens = &rig.presenter().screens;
    let saving = screens.iter().position(|s| *s == Screen::Saving).unwrap();
    assert_eq!(screens[saving + 1], Screen::Saved);
    assert_eq!(rig.presenter().last(), Some(&Screen::Saved));

    // Activity stamped after the 800 ms confirmation dwell
    assert_eq!(rig.clock.millis(), 1300);
    assert_eq!(
        rig.controller.session().last_activity(),
        Instant::from_millis(1300)
    );
}

#[test]
fn test_hold_progress_sweeps_towards_privacy() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.run_until(1500);
    assert_eq!(
        rig.presenter().last(),
        Some(&Screen::HoldProgress { degrees: 180 })
    );
    rig.run_until(2990);
    assert!(!rig.presenter().contains(&Screen::PrivacyEntered));
}

#[test]
fn test_privacy_hold_sends_privacy_without_saved() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.run_until(3000);
    assert_eq!(rig.presenter().last(), Some(&Screen::PrivacyEntered));

    rig.release_at(3500);

    assert_eq!(rig.sent(), [EventKind::Privacy]);
    assert!(!rig.presenter().contains(&Screen::Saved));
    assert!(!rig.presenter().contains(&Screen::Saving));
    assert_eq!(rig.presenter().last(), Some(&Screen::PrivacyEntered));
    assert_eq!(rig.clock.millis(), 4500);
}

#[test]
fn test_privacy_threshold_crossed_on_release_shows_privacy() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.run_until(2995);
    assert_eq!(
        rig.presenter().last(),
        Some(&Screen::HoldProgress { degrees: 359 })
    );

    rig.jump_release_at(3005);

    assert_eq!(rig.sent(), [EventKind::Privacy]);
    assert_eq!(rig.presenter().last(), Some(&Screen::PrivacyEntered));
    assert!(!rig.presenter().contains(&Screen::Saved));
}

#[test]
fn test_debug_threshold_crossed_on_release_shows_diagnostics() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.run_until(9995);
    assert_eq!(rig.presenter().last(), Some(&Screen::PrivacyEntered));

    rig.jump_release_at(10_005);

    let expected = Screen::DebugInfo(LinkInfo {
        ssid: Some(heapless::String::try_from("home").unwrap()),
        rssi: Some(-61),
    });
    assert_eq!(rig.presenter().last(), Some(&expected));
    assert_eq!(rig.controller.session().mode(), Mode::DebugDisplay);
    assert!(rig.sent().is_empty());
}

#[test]
fn test_dispatch_of_unfinalized_gesture_does_nothing() {
    let clock = FakeClock::default();
    let timings = Timings::default();
    let mut session = Session::new(&timings, clock.now());
    let mut network = RecordingNetwork::default();
    let mut presenter = RecordingPresenter::default();
    let mut delay = FakeDelay(clock.clone());

    block_on(
        Dispatcher::new(&mut network, &mut presenter, &mut delay, &timings)
            .dispatch(&mut session, Gesture::None),
    );

    assert!(network.sent.is_empty());
    assert!(presenter.screens.is_empty());
    assert_eq!(clock.millis(), 0);
    assert_eq!(session.mode(), Mode::Idle);
}

#[test]
fn test_privacy_screen_shown_once_per_hold() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.run_until(9000);
    let count = rig
        .presenter()
        .screens
        .iter()
        .filter(|s| **s == Screen::PrivacyEntered)
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_debug_hold_waits_for_next_press() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.run_until(10_000);

    let expected = Screen::DebugInfo(LinkInfo {
        ssid: Some(heapless::String::try_from("home").unwrap()),
        rssi: Some(-61),
    });
    assert_eq!(rig.presenter().last(), Some(&expected));

    rig.release_at(12_000);
    assert!(rig.sent().is_empty());
    assert_eq!(rig.controller.session().mode(), Mode::DebugDisplay);

    // Stays up well past the idle timeout
    rig.clear_screens();
    rig.run_until(60_000);
    assert!(rig.presenter().screens.is_empty());

    rig.press_at(60_000);
    assert_eq!(rig.presenter().screens, [Screen::Idle]);
    assert_eq!(rig.controller.session().mode(), Mode::Idle);

    // The exit press is not a gesture
    rig.run_until(60_200);
    rig.release_at(60_300);
    assert!(rig.sent().is_empty());
    assert!(!rig.presenter().contains(&Screen::ButtonDown));
}

#[test]
fn test_idle_timeout_returns_to_idle() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.release_at(100);
    assert_eq!(rig.clock.millis(), 900);

    rig.clear_screens();
    rig.run_until(5890);
    assert!(rig.presenter().screens.is_empty());

    rig.run_until(5900);
    assert_eq!(rig.presenter().screens, [Screen::Idle]);
    assert!(rig.controller.session().showing_idle());
}

#[test]
fn test_idle_timeout_never_fires_while_held() {
    let mut rig = Rig::new();
    rig.press_at(0);
    rig.run_until(9990);
    assert!(!rig.presenter().screens[1..].contains(&Screen::Idle));
}

#[test]
fn test_alive_indicator_animates_while_idle() {
    let mut rig = Rig::new();
    rig.run_until(500);
    assert_eq!(rig.presenter().frames, 10);

    rig.press_at(500);
    rig.run_until(1000);
    assert_eq!(rig.presenter().frames, 10);
}

#[test]
fn test_network_failure_still_completes_cycle() {
    let mut rig = Rig::with_network(RecordingNetwork {
        fail: true,
        ..Default::default()
    });
    rig.press_at(0);
    rig.release_at(200);

    assert_eq!(rig.sent(), [EventKind::Event]);
    assert_eq!(rig.presenter().last(), Some(&Screen::Saved));
    assert_eq!(
        rig.controller.session().last_activity(),
        Instant::from_millis(1000)
    );

    // Ready for the next press
    rig.press_at(2000);
    rig.release_at(2100);
    assert_eq!(rig.sent(), [EventKind::Event, EventKind::Event]);
}
