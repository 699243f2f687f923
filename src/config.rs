//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, capacities and storage layout constants live
//! here so they can be tuned in one place. Every duration is in
//! milliseconds of the free-running monotonic clock (see [`crate::timer`]).

use crate::timer::Millis;

// Control loop

/// Cadence of the cooperative control loop.
pub const TICK_MS: Millis = 10;

// Buttons

/// Minimum stable time before a press edge is accepted.
pub const BUTTON_DEBOUNCE_MS: Millis = 5;

/// Hold time at which a Finalize press becomes a long press (reset).
pub const LONG_PRESS_MS: Millis = 2_000;

// Display

/// Characters per display line. Longer text is truncated, never wrapped.
pub const DISPLAY_COLUMNS: usize = 16;

/// How long a transient message stays up before the screen is redrawn.
pub const MESSAGE_MS: Millis = 1_000;

/// Boot greeting shown before the line-select screen.
pub const WELCOME_TEXT: &str = "WELCOME";

// Arrival detection

/// Network name broadcast by the access point at every halt.
pub const TARGET_NETWORK: &str = "RailWire";

/// Minimum spacing between two scan starts.
pub const SCAN_INTERVAL_MS: Millis = 2_000;

/// How long one scan listens before its result is handed back.
pub const SCAN_WINDOW_MS: Millis = 1_500;

/// Distinct network names kept from one scan.
pub const MAX_VISIBLE_NETWORKS: usize = 8;

/// Continuous presence needed before an arrival is confirmed.
pub const ARRIVAL_HOLD_MS: Millis = 35_000;

// Announcements

/// Delay between a confirmed departure and the next-halt announcement.
pub const GRACE_PERIOD_MS: Millis = 4_000;

/// Re-announcement period for the current halt while travelling.
pub const REANNOUNCE_INTERVAL_MS: Millis = 60_000;

/// Time the audio module gets to report "playing" after a play command.
pub const AUDIO_SETTLE_MS: Millis = 200;

/// Playback volume sent to the audio module at bring-up (0..=30).
pub const AUDIO_VOLUME: u8 = 27;

/// Time the audio module gets to answer the status query at bring-up.
pub const AUDIO_REPLY_TIMEOUT_MS: Millis = 200;

/// Bring-up attempts for optional peripherals before they are disabled.
pub const PERIPHERAL_INIT_ATTEMPTS: usize = 3;

// Halt storage

/// Maximum halts per (line, route) combination.
pub const MAX_HALTS: usize = 30;

/// Bytes reserved for the count header of a halt block.
pub const HALT_HEADER_SIZE: usize = 2;

/// Size of one persisted halt block: header + 30 little-endian u16 slots.
pub const HALT_BLOCK_SIZE: usize = HALT_HEADER_SIZE + MAX_HALTS * 2;

/// Number of (line, route) combinations.
pub const ROUTE_KEY_COUNT: usize = 6;

/// Total size of the persisted image.
pub const STORE_SIZE: usize = HALT_BLOCK_SIZE * ROUTE_KEY_COUNT;

/// Wait before a failed flash write-back of the image is attempted again.
pub const FLASH_RETRY_MS: Millis = 5_000;
