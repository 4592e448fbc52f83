//! The poll-loop controller.
//!
//! One [`Controller::tick`] is one iteration of the device's main loop: it
//! consumes at most one debounced button edge, escalates a held press,
//! dispatches a released one, and handles the idle timeout and the alive
//! animation. The debug display is a mode of the same loop rather than a
//! nested blocking wait, so every tick still samples the button.

use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;
use log::{debug, info};

use crate::config::Timings;
use crate::dispatch::Dispatcher;
use crate::gesture::{self, Gesture};
use crate::input::{ButtonEdge, Clock};
use crate::session::{Mode, Session};
use crate::sink::{NetworkSink, PresentationSink};
use crate::ui::Screen;

pub struct Controller<N, P, C, D> {
    session: Session,
    timings: Timings,
    network: N,
    presenter: P,
    clock: C,
    delay: D,
}

impl<N, P, C, D> Controller<N, P, C, D>
where
    N: NetworkSink,
    P: PresentationSink,
    C: Clock,
    D: DelayNs,
{
    pub fn new(timings: Timings, network: N, presenter: P, clock: C, delay: D) -> Self {
        let session = Session::new(&timings, clock.now());
        Self {
            session,
            timings,
            network,
            presenter,
            clock,
            delay,
        }
    }

    /// Put the idle screen up. Call once the network is connected.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.presenter.show(&Screen::Idle);
        self.session.show_idle(now);
        info!("Ready");
    }

    /// Advance the loop by one poll tick.
    pub async fn tick(&mut self, edge: Option<ButtonEdge>) {
        let now = self.clock.now();

        if self.session.mode() == Mode::DebugDisplay {
            if edge == Some(ButtonEdge::Down) {
                info!("Leaving debug display");
                self.session.suppress_press(now);
                self.session.exit_debug_display(now);
                self.presenter.show(&Screen::Idle);
            }
            return;
        }

        match edge {
            Some(ButtonEdge::Down) if !self.session.is_held() => {
                info!("Button down");
                self.session.begin_press(now);
                self.presenter.show(&Screen::ButtonDown);
            }
            Some(ButtonEdge::Up) => {
                self.release(now).await;
                return;
            }
            _ => {}
        }

        if self.session.is_held() {
            self.update_hold(now);
            return;
        }

        if self.session.idle_timeout_due(now) {
            info!("Inactivity timeout, back to idle");
            self.presenter.show(&Screen::Idle);
            self.session.show_idle(now);
        } else if self.session.animation_due(now, self.timings.animation_frame) {
            self.presenter.animate();
            self.session.frame_drawn(now);
        }
    }

    /// Escalate a held press and refresh its feedback.
    fn update_hold(&mut self, now: Instant) {
        if let Some(gesture) = self.session.escalate(now, &self.timings) {
            self.show_escalation(gesture);
            return;
        }
        if self.session.gesture() != Some(Gesture::None) {
            return;
        }
        if let Some(held) = self.session.hold_duration(now) {
            let degrees = gesture::privacy_progress_degrees(held, &self.timings);
            self.presenter.show(&Screen::HoldProgress { degrees });
        }
    }

    /// Show the screen for a threshold the press just crossed.
    fn show_escalation(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::PrivacyHold => {
                info!("Privacy threshold reached");
                self.presenter.show(&Screen::PrivacyEntered);
            }
            Gesture::DebugHold => {
                info!("Debug threshold reached");
                let link = self.network.link_info();
                self.presenter.show(&Screen::DebugInfo(link));
            }
            Gesture::None | Gesture::Short => {}
        }
    }

    async fn release(&mut self, now: Instant) {
        // Classify on the release instant, not the previous tick
        if let Some(gesture) = self.session.escalate(now, &self.timings) {
            self.show_escalation(gesture);
        }
        let held = self.session.hold_duration(now);

        let Some(gesture) = self.session.end_press() else {
            debug!("Release ignored");
            return;
        };
        info!("Button up after {:?}: {:?}", held, gesture);

        Dispatcher::new(
            &mut self.network,
            &mut self.presenter,
            &mut self.delay,
            &self.timings,
        )
        .dispatch(&mut self.session, gesture)
        .await;

        self.session.complete_cycle(self.clock.now());
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
