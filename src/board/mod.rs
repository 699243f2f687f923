//! Hardware bindings for the nRF52840 board.
//!
//! Pin map (nRF52840-DK, adjust for a custom PCB):
//!
//! ```text
//!   Button MODE      P0.11      I2C SDA (SSD1306)   P0.26
//!   Button NEXT      P0.12      I2C SCL (SSD1306)   P0.27
//!   Button PREV      P0.24      Audio TX (JQ6500)   P0.06
//!   Button SELECT    P0.25      Audio BUSY          P0.08
//!   Button FINALIZE  P1.08      Audio RX (JQ6500)   P0.07
//! ```
//!
//! Each submodule adapts one peripheral to a trait from
//! `halt_announcer::devices` or `halt_announcer::storage`.

pub mod audio;
pub mod buttons;
pub mod display;
pub mod flash;
pub mod scanner;

use embassy_time::Instant;
use halt_announcer::timer::Millis;

/// Current time on the core's wrapping millisecond clock.
pub fn now_ms() -> Millis {
    // Truncation is the wrap: all core timers use wrapping arithmetic.
    Instant::now().as_millis() as Millis
}
