//! Navigation state machine - the operator's four-step setup wizard.
//!
//! ```text
//!   LineSelect --Next/Prev--> RouteSelect --Select--> StationSelect
//!        ^                     (Mode cycles)          (Next/Prev move,
//!        |                                             Select toggles)
//!        |                                                  |
//!        +------ Finalize long ------ Finalized <-- Finalize short
//! ```
//!
//! [`SessionState::apply`] is the transition function. It only touches
//! session fields and reports what else has to happen (load, toggle,
//! persist, reset) as a [`Transition`] for the controller to carry out.

use crate::catalog::{Line, Route, RouteKey};
use crate::ui::{ButtonEvent, Press};

/// Wizard step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    LineSelect,
    RouteSelect,
    StationSelect,
    Finalized,
}

/// Side effect requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Event has no meaning in the current mode.
    Ignored,
    /// Visible state changed; redraw the screen.
    Redraw,
    /// Entered StationSelect; load the stored halts for this key.
    LoadHalts(RouteKey),
    /// Toggle the displayed station in this key's list.
    ToggleHalt(RouteKey, &'static str),
    /// Persist this key's list; on success call [`SessionState::enter_finalized`].
    Finalize(RouteKey),
    /// Session was reset; clear halt lists, arrival and announcement state.
    Reset,
}

/// Operator selections and progress along the finalized halt list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionState {
    pub mode: Mode,
    pub line: Line,
    pub route: Route,
    /// Selection cursor; see [`RouteKey::displayed_index`].
    pub station_cursor: u16,
    /// Position of the current halt in the finalized list.
    pub halt_cursor: usize,
    /// The next announcement is for the halt the run starts at.
    pub first_halt: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub const fn new() -> Self {
        Self {
            mode: Mode::LineSelect,
            line: Line::Up,
            route: Route::Kalyan,
            station_cursor: 0,
            halt_cursor: 0,
            first_halt: true,
        }
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.line, self.route)
    }

    pub fn is_finalized(&self) -> bool {
        self.mode == Mode::Finalized
    }

    /// Station under the selection cursor.
    pub fn displayed_station(&self) -> Option<&'static str> {
        self.key().displayed_station(self.station_cursor)
    }

    /// Apply one button event.
    pub fn apply(&mut self, event: ButtonEvent) -> Transition {
        let transition = match (self.mode, event) {
            (Mode::LineSelect, ButtonEvent::Next) => self.choose_line(Line::Up),
            (Mode::LineSelect, ButtonEvent::Prev) => self.choose_line(Line::Down),

            (Mode::RouteSelect, ButtonEvent::Mode) => {
                self.route = self.route.next();
                Transition::Redraw
            }
            (Mode::RouteSelect, ButtonEvent::Select) => {
                let key = self.key();
                self.mode = Mode::StationSelect;
                self.station_cursor = key.origin_cursor();
                Transition::LoadHalts(key)
            }

            (Mode::StationSelect, ButtonEvent::Next) => {
                self.station_cursor = self.key().advance(self.station_cursor);
                Transition::Redraw
            }
            (Mode::StationSelect, ButtonEvent::Prev) => {
                self.station_cursor = self.key().retreat(self.station_cursor);
                Transition::Redraw
            }
            (Mode::StationSelect, ButtonEvent::Select) => match self.displayed_station() {
                Some(station) => Transition::ToggleHalt(self.key(), station),
                None => Transition::Ignored,
            },
            (Mode::StationSelect, ButtonEvent::Finalize(Press::Short)) => {
                Transition::Finalize(self.key())
            }

            (Mode::Finalized, ButtonEvent::Finalize(Press::Long)) => {
                self.reset();
                Transition::Reset
            }

            _ => Transition::Ignored,
        };

        if transition != Transition::Ignored {
            debug!("nav: {} in {} -> {}", event, self.mode, transition);
        }
        transition
    }

    /// Complete a successful finalize.
    pub fn enter_finalized(&mut self) {
        self.mode = Mode::Finalized;
        self.halt_cursor = 0;
        self.first_halt = true;
        info!("route finalized: {}", self.key());
    }

    /// Move to the next halt, wrapping. Returns `false` for an empty list.
    pub fn advance_halt(&mut self, halt_count: usize) -> bool {
        if halt_count == 0 {
            return false;
        }
        self.halt_cursor = (self.halt_cursor + 1) % halt_count;
        true
    }

    /// Back to the initial wizard state.
    pub fn reset(&mut self) {
        *self = Self::new();
        info!("session reset");
    }

    fn choose_line(&mut self, line: Line) -> Transition {
        self.line = line;
        self.route = Route::Kalyan;
        self.mode = Mode::RouteSelect;
        Transition::Redraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_station_select(line: Line) -> SessionState {
        let mut session = SessionState::new();
        let pick = if line == Line::Up {
            ButtonEvent::Next
        } else {
            ButtonEvent::Prev
        };
        session.apply(pick);
        session.apply(ButtonEvent::Select);
        session
    }

    #[test]
    fn next_and_prev_choose_the_line() {
        let mut up = SessionState::new();
        assert_eq!(up.apply(ButtonEvent::Next), Transition::Redraw);
        assert_eq!((up.mode, up.line, up.route), (Mode::RouteSelect, Line::Up, Route::Kalyan));

        let mut down = SessionState::new();
        down.apply(ButtonEvent::Prev);
        assert_eq!((down.mode, down.line), (Mode::RouteSelect, Line::Down));
    }

    #[test]
    fn mode_cycles_routes() {
        let mut session = SessionState::new();
        session.apply(ButtonEvent::Next);
        session.apply(ButtonEvent::Mode);
        assert_eq!(session.route, Route::Kasara);
        session.apply(ButtonEvent::Mode);
        session.apply(ButtonEvent::Mode);
        assert_eq!(session.route, Route::Kalyan);
    }

    #[test]
    fn select_opens_station_list_at_origin() {
        let mut session = SessionState::new();
        session.apply(ButtonEvent::Prev);
        session.apply(ButtonEvent::Mode);
        let key = RouteKey::new(Line::Down, Route::Kasara);
        assert_eq!(session.apply(ButtonEvent::Select), Transition::LoadHalts(key));
        assert_eq!(session.mode, Mode::StationSelect);
        assert_eq!(session.station_cursor, 26);

        let up = at_station_select(Line::Up);
        assert_eq!(up.station_cursor, 0);
    }

    #[test]
    fn up_cursor_wraps_at_terminus() {
        let mut session = at_station_select(Line::Up);
        for _ in 0..15 {
            session.apply(ButtonEvent::Next);
        }
        assert_eq!(session.displayed_station(), Some("Kalyan Jn"));
        session.apply(ButtonEvent::Next);
        assert_eq!(session.station_cursor, 0);
        session.apply(ButtonEvent::Prev);
        assert_eq!(session.station_cursor, 15);
    }

    #[test]
    fn down_cursor_decrements_and_wraps() {
        let mut session = at_station_select(Line::Down);
        session.apply(ButtonEvent::Next);
        assert_eq!(session.station_cursor, 14);
        let mut session = at_station_select(Line::Down);
        session.apply(ButtonEvent::Prev);
        assert_eq!(session.station_cursor, 0);
    }

    #[test]
    fn select_requests_toggle_of_displayed_station() {
        let mut session = at_station_select(Line::Up);
        session.apply(ButtonEvent::Next);
        assert_eq!(
            session.apply(ButtonEvent::Select),
            Transition::ToggleHalt(session.key(), "Byculla")
        );
    }

    #[test]
    fn short_finalize_requests_persist_without_leaving_mode() {
        let mut session = at_station_select(Line::Up);
        let key = session.key();
        assert_eq!(
            session.apply(ButtonEvent::Finalize(Press::Short)),
            Transition::Finalize(key)
        );
        assert_eq!(session.mode, Mode::StationSelect);

        session.enter_finalized();
        assert_eq!(session.mode, Mode::Finalized);
        assert_eq!(session.halt_cursor, 0);
        assert!(session.first_halt);
    }

    #[test]
    fn long_finalize_resets_only_when_finalized() {
        let mut session = at_station_select(Line::Down);
        assert_eq!(
            session.apply(ButtonEvent::Finalize(Press::Long)),
            Transition::Ignored
        );

        session.enter_finalized();
        session.halt_cursor = 2;
        session.first_halt = false;
        assert_eq!(
            session.apply(ButtonEvent::Finalize(Press::Long)),
            Transition::Reset
        );
        assert_eq!(session, SessionState::new());
    }

    #[test]
    fn unlisted_events_are_ignored() {
        let mut session = SessionState::new();
        for event in [ButtonEvent::Mode, ButtonEvent::Select, ButtonEvent::Finalize(Press::Short)] {
            assert_eq!(session.apply(event), Transition::Ignored);
        }
        assert_eq!(session, SessionState::new());

        let mut finalized = at_station_select(Line::Up);
        finalized.enter_finalized();
        let before = finalized;
        for event in [ButtonEvent::Next, ButtonEvent::Prev, ButtonEvent::Select, ButtonEvent::Mode] {
            assert_eq!(finalized.apply(event), Transition::Ignored);
        }
        assert_eq!(finalized, before);
    }

    #[test]
    fn halt_cursor_wraps_modulo_count() {
        let mut session = SessionState::new();
        assert!(session.advance_halt(3));
        assert!(session.advance_halt(3));
        assert_eq!(session.halt_cursor, 2);
        assert!(session.advance_halt(3));
        assert_eq!(session.halt_cursor, 0);
        assert!(!session.advance_halt(0));
        assert_eq!(session.halt_cursor, 0);
    }
}
