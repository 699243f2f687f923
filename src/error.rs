//! Unified error type for halt-announcer.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for efficient
//! on-target logging.
//!
//! No error in this crate is fatal: the controller downgrades each one to
//! "do nothing and optionally tell the operator".

use core::fmt;

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// The persistent store rejected a read, write or commit.
    Storage,

    /// An access fell outside the reserved storage image.
    OutOfRange,

    // Catalog
    /// A station name is not part of the active route.
    UnknownStation,

    // Audio
    /// The station has no entry in the audio track table.
    NoAudioTrack,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::Storage => "storage rejected the operation",
            Error::OutOfRange => "storage access out of range",
            Error::UnknownStation => "station not on route",
            Error::NoAudioTrack => "no audio track for station",
        };
        f.write_str(text)
    }
}
