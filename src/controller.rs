//! The control loop's context object.
//!
//! [`Controller`] owns the session, the six halt lists, the arrival
//! detector and the announcement scheduler, plus the peripherals they
//! drive. The board calls [`Controller::handle`] for each button event and
//! [`Controller::tick`] every `TICK_MS`; nothing else mutates core state.
//!
//! Errors never escape: a failed save becomes a "Save Failed" message, an
//! unknown station or track is ignored or reported on screen.

use crate::announce::AnnouncementScheduler;
use crate::arrival::{ArrivalDetector, ArrivalEvent};
use crate::catalog::{self, RouteKey};
use crate::config::{MESSAGE_MS, TARGET_NETWORK, WELCOME_TEXT};
use crate::devices::{AudioPlayer, NetworkScanner, TextDisplay};
use crate::halts::{HaltList, HaltRegistry, Toggle};
use crate::navigation::{Mode, SessionState, Transition};
use crate::storage::ByteStore;
use crate::timer::{Countdown, Millis};
use crate::ui::screens::{self, fit_fmt, Frame};
use crate::ui::ButtonEvent;

pub struct Controller<D, A, S, N> {
    session: SessionState,
    halts: HaltRegistry,
    arrival: ArrivalDetector,
    announcer: AnnouncementScheduler,
    /// Running while a transient message covers the screen.
    message: Countdown,
    display: D,
    audio: A,
    store: S,
    scanner: N,
}

impl<D, A, S, N> Controller<D, A, S, N>
where
    D: TextDisplay,
    A: AudioPlayer,
    S: ByteStore,
    N: NetworkScanner,
{
    pub fn new(display: D, audio: A, store: S, scanner: N) -> Self {
        Self {
            session: SessionState::new(),
            halts: HaltRegistry::new(),
            arrival: ArrivalDetector::new(TARGET_NETWORK),
            announcer: AnnouncementScheduler::new(),
            message: Countdown::new(MESSAGE_MS),
            display,
            audio,
            store,
            scanner,
        }
    }

    /// Show the greeting; the line-select screen follows on a later tick.
    pub fn boot(&mut self, now: Millis) {
        info!("controller boot");
        self.show_message(WELCOME_TEXT, now);
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn halts(&self) -> &HaltRegistry {
        &self.halts
    }

    pub fn arrival(&self) -> &ArrivalDetector {
        &self.arrival
    }

    pub fn announcer(&self) -> &AnnouncementScheduler {
        &self.announcer
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn scanner_mut(&mut self) -> &mut N {
        &mut self.scanner
    }

    /// Halt list of the active (line, route).
    pub fn active_halts(&self) -> &HaltList {
        self.halts.get(self.session.key())
    }

    /// Station of the current halt once finalized.
    pub fn current_halt(&self) -> Option<&'static str> {
        let key = self.session.key();
        self.halts
            .get(key)
            .get(self.session.halt_cursor)
            .and_then(|station| key.route.station(station))
    }

    /// Show a transient message; the screen is redrawn after `MESSAGE_MS`.
    pub fn show_message(&mut self, text: &str, now: Millis) {
        let frame = Frame::message(text);
        self.draw(&frame);
        self.message.start(now);
    }

    /// Apply one button event.
    pub fn handle(&mut self, event: ButtonEvent, now: Millis) {
        match self.session.apply(event) {
            Transition::Ignored => {}
            Transition::Redraw => self.redraw(),
            Transition::LoadHalts(key) => {
                self.halts.load(key, &self.store);
                self.redraw();
            }
            Transition::ToggleHalt(key, station) => self.toggle_halt(key, station, now),
            Transition::Finalize(key) => self.finalize(key, now),
            Transition::Reset => self.reset(),
        }
    }

    /// Advance timers, collect scan results and fire announcements.
    pub fn tick(&mut self, now: Millis) {
        if self.message.poll(now) {
            self.redraw();
        }

        if self.session.mode != Mode::Finalized {
            return;
        }

        let status = self.audio.status();
        self.announcer.sync_status(status, now);

        if let Some(task) = self.announcer.take_due(now) {
            if self.session.first_halt {
                self.session.first_halt = false;
                info!("first halt announcement suppressed: {}", task.station);
            } else {
                self.announce(task.station, now);
            }
        }

        if self.announcer.is_playing() {
            return;
        }

        if let Some(event) = self.arrival.poll(&mut self.scanner, now) {
            self.on_arrival(event, now);
        }

        if !self.arrival.is_confirmed() && self.announcer.repeat_due(now) {
            if let Some(station) = self.current_halt() {
                debug!("re-announcing current halt {}", station);
                self.announce(station, now);
            }
        }
    }

    fn toggle_halt(&mut self, key: RouteKey, station: &'static str, now: Millis) {
        let (outcome, name) = match self.halts.toggle(key, station) {
            Ok(result) => result,
            Err(e) => {
                debug!("toggle ignored: {}", e);
                return;
            }
        };
        let text = match outcome {
            Toggle::Added(_) => fit_fmt(format_args!("Added: {}", name)),
            Toggle::Removed(_) => fit_fmt(format_args!("Removed: {}", name)),
            Toggle::Full => screens::fit("Halts Full"),
        };
        self.show_message(&text, now);
    }

    fn finalize(&mut self, key: RouteKey, now: Millis) {
        if let Err(e) = self.halts.persist(key, &mut self.store) {
            error!("halt save failed: {}", e);
            self.show_message("Save Failed", now);
            return;
        }
        self.halts.load(key, &self.store);
        self.session.enter_finalized();
        self.arrival.reset();
        self.announcer.cancel();
        self.announcer.arm_repeat(now);
        self.show_message("Route Set!", now);
    }

    /// Clear everything the session built up, in one step.
    fn reset(&mut self) {
        self.halts.clear_all();
        self.arrival.reset();
        self.announcer.cancel();
        self.audio.pause();
        self.message.cancel();
        self.redraw();
    }

    fn on_arrival(&mut self, event: ArrivalEvent, now: Millis) {
        match event {
            ArrivalEvent::Arrived => {
                self.show_message("At Station", now);
                self.audio.pause();
                self.announcer.stopped();
            }
            ArrivalEvent::Departed => {
                let count = self.active_halts().len();
                if !self.session.advance_halt(count) {
                    self.show_message("No Halts", now);
                    return;
                }
                info!("departed, next halt {}/{}", self.session.halt_cursor + 1, count);
                self.show_message("To Next Halt", now);
                if let Some(station) = self.current_halt() {
                    self.announcer.enqueue(station, now);
                }
            }
        }
    }

    /// Play `station`, or report "No Audio" if it has no track.
    fn announce(&mut self, station: &'static str, now: Millis) {
        self.audio.pause();
        match catalog::audio_track(station) {
            Ok(track) => {
                info!("announcing {} (track {})", station, track);
                self.audio.play(track);
                self.announcer.started(station, now);
            }
            Err(e) => {
                warn!("cannot announce {}: {}", station, e);
                self.announcer.stopped();
                self.show_message("No Audio", now);
            }
        }
    }

    /// Screen for the current mode, ignoring transient messages.
    pub fn screen(&self) -> Frame {
        let key = self.session.key();
        match self.session.mode {
            Mode::LineSelect => screens::line_select(),
            Mode::RouteSelect => screens::route_select(key),
            Mode::StationSelect => {
                let index = key.displayed_index(self.session.station_cursor);
                let station = key.route.station(index).unwrap_or("");
                let list = self.halts.get(key);
                screens::station_select(station, list.contains(index), list.len())
            }
            Mode::Finalized => match self.current_halt() {
                Some(station) => screens::halt_progress(
                    self.session.halt_cursor,
                    self.active_halts().len(),
                    station,
                ),
                None => screens::no_halts(),
            },
        }
    }

    fn redraw(&mut self) {
        self.message.cancel();
        let frame = self.screen();
        self.draw(&frame);
    }

    fn draw(&mut self, frame: &Frame) {
        self.display.show(&frame.top, &frame.bottom);
    }
}
