//! Text for the 16x2 character display.
//!
//! Every line is a fixed-capacity string; text longer than the display is
//! truncated at a character boundary, never wrapped.

use core::fmt::{self, Write};

use heapless::String;

use crate::catalog::RouteKey;
use crate::config::DISPLAY_COLUMNS;

/// One display line.
pub type LineText = String<DISPLAY_COLUMNS>;

/// Column of the "is a halt" marker on the station-select screen.
const HALT_MARKER_COLUMN: usize = DISPLAY_COLUMNS - 1;

/// `fmt::Write` adapter that drops whatever does not fit.
struct Truncate<'a>(&'a mut LineText);

impl Write for Truncate<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Truncate `text` to one display line.
pub fn fit(text: &str) -> LineText {
    let mut line = LineText::new();
    let _ = Truncate(&mut line).write_str(text);
    line
}

/// Format into one display line, truncating.
pub fn fit_fmt(args: fmt::Arguments<'_>) -> LineText {
    let mut line = LineText::new();
    let _ = Truncate(&mut line).write_fmt(args);
    line
}

/// Contents of both display lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub top: LineText,
    pub bottom: LineText,
}

impl Frame {
    pub fn new(top: &str, bottom: &str) -> Self {
        Self {
            top: fit(top),
            bottom: fit(bottom),
        }
    }

    /// A transient one-line message.
    pub fn message(text: &str) -> Self {
        Self::new(text, "")
    }
}

pub fn line_select() -> Frame {
    Frame::new("Choose Line", "Next=UP Prev=DN")
}

pub fn route_select(key: RouteKey) -> Frame {
    Frame {
        top: fit_fmt(format_args!("Route: {}", key.route.name())),
        bottom: fit_fmt(format_args!("Line: {}", key.line.label())),
    }
}

/// Station under the cursor, with `*` in the last column when it is a halt.
pub fn station_select(station: &str, is_halt: bool, halt_count: usize) -> Frame {
    let mut top = fit(station);
    if is_halt {
        while top.len() < HALT_MARKER_COLUMN {
            let _ = top.push(' ');
        }
        while top.len() > HALT_MARKER_COLUMN {
            top.pop();
        }
        let _ = top.push('*');
    }
    Frame {
        top,
        bottom: fit_fmt(format_args!("Halts: {}", halt_count)),
    }
}

/// Current halt as "Halt i/N" over its name.
pub fn halt_progress(position: usize, count: usize, station: &str) -> Frame {
    Frame {
        top: fit_fmt(format_args!("Halt {}/{}", position + 1, count)),
        bottom: fit(station),
    }
}

pub fn no_halts() -> Frame {
    Frame::message("No Halts")
}
