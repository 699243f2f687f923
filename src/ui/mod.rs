//! User interface - logical buttons and the two-line screen contents.
//!
//! ## Components
//!
//! - **Buttons**: 5 logical buttons (MODE, NEXT, PREV, SELECT, FINALIZE);
//!   FINALIZE distinguishes a short press from a long (reset) press.
//! - **Screens**: the text shown on the 16x2 display for every mode.

pub mod input_logic;
pub mod screens;

/// How long FINALIZE was held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    /// Released before the long-press threshold.
    Short,
    /// Held for at least the long-press threshold.
    Long,
}

/// Button events (after debouncing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Cycle routes while choosing a route.
    Mode,
    /// UP line / next station.
    Next,
    /// DOWN line / previous station.
    Prev,
    /// Confirm route / toggle halt.
    Select,
    /// Save the halt list (short) or reset everything (long).
    Finalize(Press),
}
