//! Pure input helpers: cursor movement and Finalize press classification.

use crate::config::LONG_PRESS_MS;
use crate::timer::{elapsed, Millis};
use crate::ui::Press;

/// Move a cursor one item forward, wrapping to the first item.
pub fn wrap_next(selected: u16, item_count: u16) -> u16 {
    if item_count == 0 {
        return 0;
    }
    if selected + 1 < item_count {
        selected + 1
    } else {
        0
    }
}

/// Move a cursor one item back, wrapping to the last item.
pub fn wrap_prev(selected: u16, item_count: u16) -> u16 {
    if item_count == 0 {
        return 0;
    }
    if selected == 0 || selected >= item_count {
        item_count - 1
    } else {
        selected - 1
    }
}

/// Classifies a held button as a short or long press.
///
/// A long press is reported as soon as the hold reaches `LONG_PRESS_MS`
/// (sampled with [`PressClassifier::poll`]), so the operator gets feedback
/// without releasing. The release that ends a long press reports nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PressClassifier {
    pressed_at: Option<Millis>,
    long_reported: bool,
}

impl PressClassifier {
    pub const fn new() -> Self {
        Self {
            pressed_at: None,
            long_reported: false,
        }
    }

    /// Debounced press edge.
    pub fn press(&mut self, now: Millis) {
        self.pressed_at = Some(now);
        self.long_reported = false;
    }

    /// Held-duration sample while the button is still down.
    pub fn poll(&mut self, now: Millis) -> Option<Press> {
        let start = self.pressed_at?;
        if !self.long_reported && elapsed(now, start) >= LONG_PRESS_MS {
            self.long_reported = true;
            return Some(Press::Long);
        }
        None
    }

    /// Debounced release edge.
    pub fn release(&mut self, now: Millis) -> Option<Press> {
        let start = self.pressed_at.take()?;
        if self.long_reported {
            self.long_reported = false;
            return None;
        }
        if elapsed(now, start) >= LONG_PRESS_MS {
            Some(Press::Long)
        } else {
            Some(Press::Short)
        }
    }
}
