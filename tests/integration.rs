//! Integration tests for halt-announcer host-testable logic.
//!
//! Each test drives a [`Controller`] with in-memory peripherals through
//! button presses and a 10 ms tick, the way the board's control loop does.

use halt_announcer::arrival::Presence;
use halt_announcer::config::{FLASH_RETRY_MS, TARGET_NETWORK};
use halt_announcer::devices::{AudioPlayer, NetworkName, NetworkScanner, PlaybackStatus, TextDisplay};
use halt_announcer::storage::{FlushRetry, MemStore};
use halt_announcer::{ButtonEvent, Controller, Error, Line, Mode, Press, Route, RouteKey, SessionState};

#[derive(Default)]
struct Screen {
    top: String,
    bottom: String,
}

impl TextDisplay for Screen {
    fn show(&mut self, top: &str, bottom: &str) {
        self.top = top.into();
        self.bottom = bottom.into();
    }
}

/// Audio module that finishes every track instantly.
#[derive(Default)]
struct Speaker {
    played: Vec<u16>,
    pauses: usize,
}

impl AudioPlayer for Speaker {
    fn play(&mut self, file: u16) {
        self.played.push(file);
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn status(&mut self) -> PlaybackStatus {
        PlaybackStatus::Stopped
    }
}

/// Radio environment along the track: the halt network is either in
/// range or not. Scans complete immediately.
#[derive(Default)]
struct Corridor {
    at_halt: bool,
    result: Vec<NetworkName>,
}

impl NetworkScanner for Corridor {
    fn scan_start(&mut self) {
        self.result.clear();
        self.result.push(NetworkName::try_from("Trackside-07").unwrap());
        if self.at_halt {
            self.result.push(NetworkName::try_from(TARGET_NETWORK).unwrap());
        }
    }

    fn scan_poll(&mut self) -> Option<&[NetworkName]> {
        Some(self.result.as_slice())
    }
}

type Unit = Controller<Screen, Speaker, MemStore, Corridor>;

fn unit_with(store: MemStore) -> Unit {
    let mut c = Controller::new(Screen::default(), Speaker::default(), store, Corridor::default());
    c.boot(0);
    c
}

fn unit() -> Unit {
    unit_with(MemStore::new())
}

fn press(c: &mut Unit, now: u32, events: &[ButtonEvent]) {
    for &event in events {
        c.handle(event, now);
    }
}

fn run(c: &mut Unit, from: u32, to: u32) {
    for now in (from..=to).step_by(10) {
        c.tick(now);
    }
}

fn next(n: usize) -> Vec<ButtonEvent> {
    vec![ButtonEvent::Next; n]
}

/// UP Kalyan with halts Byculla, Thane and Kalyan Jn, finalized at t=1000.
fn kalyan_up_with_three_halts() -> Unit {
    let mut c = unit();
    press(&mut c, 500, &[ButtonEvent::Next, ButtonEvent::Select]);
    press(&mut c, 500, &next(1));
    press(&mut c, 500, &[ButtonEvent::Select]);
    press(&mut c, 500, &next(9));
    press(&mut c, 500, &[ButtonEvent::Select]);
    press(&mut c, 500, &next(5));
    press(&mut c, 500, &[ButtonEvent::Select]);
    assert_eq!(c.active_halts().as_slice(), &[1, 10, 15]);
    press(&mut c, 1_000, &[ButtonEvent::Finalize(Press::Short)]);
    assert!(c.session().is_finalized());
    c
}

/// Stand at a halt from t=1000 until confirmed, then leave at t=41000.
fn first_stop_and_departure(c: &mut Unit) {
    c.scanner_mut().at_halt = true;
    run(c, 1_000, 40_000);
    assert!(c.arrival().is_confirmed());
    c.scanner_mut().at_halt = false;
    run(c, 40_010, 41_000);
}

// ═══════════════════════════════════════════════════════════════════════════
// Journey
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn first_departure_is_silent_then_next_halt_is_announced() {
    let mut c = kalyan_up_with_three_halts();

    first_stop_and_departure(&mut c);
    assert_eq!(c.session().halt_cursor, 1);
    assert_eq!(c.announcer().pending().map(|t| t.station), Some("Thane"));

    run(&mut c, 41_010, 45_000);
    assert!(c.announcer().pending().is_none());
    assert!(!c.session().first_halt);
    assert!(c.audio().played.is_empty());
    assert_eq!(c.display().top, "Halt 2/3");
    assert_eq!(c.display().bottom, "Thane");

    // Second halt: in range from the scan at t=47000, confirmed at t=83000.
    // The minute re-announcement of Thane falls in between.
    c.scanner_mut().at_halt = true;
    run(&mut c, 45_010, 84_000);
    assert!(c.arrival().is_confirmed());
    assert_eq!(c.audio().played, vec![33]);

    c.scanner_mut().at_halt = false;
    run(&mut c, 84_010, 85_000);
    assert_eq!(c.session().halt_cursor, 2);

    run(&mut c, 85_010, 88_990);
    assert_eq!(c.audio().played, vec![33]);
    run(&mut c, 89_000, 89_000);
    // Kalyan Jn is track 16.
    assert_eq!(c.audio().played, vec![33, 16]);
}

#[test]
fn arrival_shows_at_station_and_silences_audio() {
    let mut c = kalyan_up_with_three_halts();
    c.scanner_mut().at_halt = true;
    run(&mut c, 1_000, 36_990);
    assert!(!c.arrival().is_confirmed());
    let pauses = c.audio().pauses;

    run(&mut c, 37_000, 37_000);
    assert!(c.arrival().is_confirmed());
    assert_eq!(c.display().top, "At Station");
    assert_eq!(c.audio().pauses, pauses + 1);
}

#[test]
fn departure_wraps_to_the_first_halt() {
    let mut c = kalyan_up_with_three_halts();
    let mut t = 1_000;
    for _ in 0..3 {
        c.scanner_mut().at_halt = true;
        run(&mut c, t, t + 39_000);
        c.scanner_mut().at_halt = false;
        run(&mut c, t + 39_010, t + 42_000);
        t += 42_010;
    }
    assert_eq!(c.session().halt_cursor, 0);
}

#[test]
fn short_sighting_is_not_an_arrival() {
    let mut c = kalyan_up_with_three_halts();
    c.scanner_mut().at_halt = true;
    run(&mut c, 1_000, 31_000);
    c.scanner_mut().at_halt = false;
    run(&mut c, 31_010, 50_000);

    assert_eq!(c.arrival().presence(), Presence::Away);
    assert_eq!(c.session().halt_cursor, 0);
    assert!(c.announcer().pending().is_none());
    assert!(c.audio().played.is_empty());
}

#[test]
fn empty_halt_list_never_announces() {
    let mut c = unit();
    press(
        &mut c,
        0,
        &[ButtonEvent::Next, ButtonEvent::Select, ButtonEvent::Finalize(Press::Short)],
    );
    run(&mut c, 0, 2_000);
    assert_eq!(c.display().top, "No Halts");

    c.scanner_mut().at_halt = true;
    run(&mut c, 2_010, 40_000);
    c.scanner_mut().at_halt = false;
    run(&mut c, 40_010, 42_000);
    assert_eq!(c.display().top, "No Halts");
    assert!(c.announcer().pending().is_none());

    run(&mut c, 42_010, 200_000);
    assert!(c.audio().played.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Reset
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn long_press_discards_pending_announcement() {
    let mut c = kalyan_up_with_three_halts();
    first_stop_and_departure(&mut c);
    assert!(c.announcer().pending().is_some());

    // Back in range of a halt network, not yet held long enough.
    c.scanner_mut().at_halt = true;
    run(&mut c, 41_010, 43_990);
    assert!(matches!(c.arrival().presence(), Presence::Present { .. }));
    let pauses = c.audio().pauses;

    press(&mut c, 44_000, &[ButtonEvent::Finalize(Press::Long)]);
    assert_eq!(*c.session(), SessionState::new());
    assert!(c.announcer().pending().is_none());
    assert_eq!(c.audio().pauses, pauses + 1);
    assert_eq!(c.arrival().presence(), Presence::Away);
    assert!(RouteKey::ALL.iter().all(|&key| c.halts().get(key).is_empty()));
    assert!(c.active_halts().is_empty());
    assert_eq!(c.display().top, "Choose Line");

    // Reset clears RAM only: the saved UP/Kalyan block is untouched.
    let image = c.store().image();
    assert_eq!(&image[..8], &[3, 0, 1, 0, 10, 0, 15, 0]);

    c.scanner_mut().at_halt = false;
    run(&mut c, 44_010, 130_000);
    assert!(c.audio().played.is_empty());
}

#[test]
fn short_finalize_after_finalize_is_ignored() {
    let mut c = kalyan_up_with_three_halts();
    run(&mut c, 1_000, 3_000);
    press(&mut c, 3_000, &[ButtonEvent::Finalize(Press::Short), ButtonEvent::Next]);
    assert_eq!(c.session().mode, Mode::Finalized);
    assert_eq!(c.display().top, "Halt 1/3");
}

// ═══════════════════════════════════════════════════════════════════════════
// Halt lists
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn whole_route_fits_in_order() {
    let mut c = unit();
    press(&mut c, 0, &[ButtonEvent::Prev, ButtonEvent::Mode, ButtonEvent::Mode]);
    press(&mut c, 0, &[ButtonEvent::Select]);
    assert_eq!(c.session().key(), RouteKey::new(Line::Down, Route::Khopoli));

    // Pick every other station, then fill the gaps.
    for _ in 0..15 {
        press(&mut c, 0, &[ButtonEvent::Select, ButtonEvent::Next, ButtonEvent::Next]);
    }
    press(&mut c, 0, &[ButtonEvent::Next]);
    for _ in 0..15 {
        press(&mut c, 0, &[ButtonEvent::Select, ButtonEvent::Next, ButtonEvent::Next]);
    }

    let halts = c.active_halts();
    assert!(halts.is_full());
    assert!(halts.is_in_travel_order(Line::Down));
    assert_eq!(halts.get(0), Some(29));
    assert_eq!(halts.get(29), Some(0));
}

#[test]
fn toggling_twice_restores_the_list() {
    let mut c = unit();
    press(&mut c, 0, &[ButtonEvent::Next, ButtonEvent::Select]);
    press(&mut c, 0, &next(3));
    press(&mut c, 0, &[ButtonEvent::Select]);
    assert_eq!(c.active_halts().as_slice(), &[3]);
    press(&mut c, 100, &[ButtonEvent::Select]);
    assert_eq!(c.display().top, "Removed: Dadar");
    assert!(c.active_halts().is_empty());
}

#[test]
fn finalized_halts_survive_a_restart() {
    let c = kalyan_up_with_three_halts();
    let image = *c.store().image();

    let mut restarted = unit_with(MemStore::from_image(image));
    press(&mut restarted, 0, &[ButtonEvent::Next, ButtonEvent::Select]);
    assert_eq!(restarted.active_halts().as_slice(), &[1, 10, 15]);

    // Other combinations were never saved.
    press(&mut restarted, 0, &[ButtonEvent::Finalize(Press::Short)]);
    press(&mut restarted, 0, &[ButtonEvent::Finalize(Press::Long)]);
    press(&mut restarted, 0, &[ButtonEvent::Prev, ButtonEvent::Select]);
    assert!(restarted.active_halts().is_empty());
}

#[test]
fn failed_flash_flush_keeps_the_image_for_a_retry() {
    let mut c = kalyan_up_with_three_halts();
    let mut flush = FlushRetry::new();

    assert!(flush.due(c.store_mut(), 1_000));
    flush.report(c.store_mut(), &Err(Error::Storage), 1_000);
    c.show_message("Save Failed", 1_000);
    assert_eq!(c.display().top, "Save Failed");

    run(&mut c, 1_010, 1_000 + FLASH_RETRY_MS - 10);
    assert!(!flush.due(c.store_mut(), 1_000 + FLASH_RETRY_MS - 10));

    assert!(flush.due(c.store_mut(), 1_000 + FLASH_RETRY_MS));
    assert_eq!(&c.store().image()[..8], &[3, 0, 1, 0, 10, 0, 15, 0]);
    flush.report(c.store_mut(), &Ok::<(), Error>(()), 1_000 + FLASH_RETRY_MS);
    assert!(!flush.due(c.store_mut(), 1_000 + FLASH_RETRY_MS + 10));
}
