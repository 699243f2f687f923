//! Route catalog - the fixed station sequences of the three routes.
//!
//! Every route shares the CSMT..Kalyan Jn trunk and stores its stations in
//! UP (outbound) order. A DOWN selection uses the same sequence mirrored:
//! the cursor value `c` shows station `len - 1 - c`.
//!
//! All lookups that depend on both the direction and the route go through
//! [`RouteKey`], so the (line, route) pair is resolved in one place.

use crate::config::{HALT_BLOCK_SIZE, ROUTE_KEY_COUNT};
use crate::error::Error;
use crate::ui::input_logic::{wrap_next, wrap_prev};

/// Index into a route's UP-ordered station sequence.
pub type StationRef = u16;

const KALYAN_STATIONS: [&str; 16] = [
    "CSMT", "Byculla", "Parel", "Dadar", "Matunga", "Kurla", "Ghatkopar", "Vikhroli", "Bhandup",
    "Mulund", "Thane", "Kalva", "Mumbra", "Diva Jn", "Dombivli", "Kalyan Jn",
];

const KASARA_STATIONS: [&str; 27] = [
    "CSMT", "Byculla", "Parel", "Dadar", "Matunga", "Kurla", "Ghatkopar", "Vikhroli", "Bhandup",
    "Mulund", "Thane", "Kalva", "Mumbra", "Diva Jn", "Dombivli", "Kalyan Jn", "Shahad", "Ambivli",
    "Titwala", "Khadavli", "Vasind", "Asangaon", "Atgaon", "Thansit", "Khardi", "Umbermali",
    "Kasara",
];

const KHOPOLI_STATIONS: [&str; 30] = [
    "CSMT", "Byculla", "Parel", "Dadar", "Matunga", "Kurla", "Ghatkopar", "Vikhroli", "Bhandup",
    "Mulund", "Thane", "Kalva", "Mumbra", "Diva Jn", "Dombivli", "Kalyan Jn", "Vithalwadi",
    "Ulhasnagar", "Ambernath", "Badlapur", "Vangani", "Shelu", "Neral Junction",
    "Bhivpuri Road", "Karjat", "Palasdari", "Kelavli", "Dolavli", "Lowjee", "Khopoli",
];

/// Station names in audio-module file order: track `n` is entry `n - 1`.
pub const AUDIO_TRACKS: [&str; 41] = [
    "Ambernath", "Ambivli", "Asangaon", "Atgaon", "Badlapur", "Bhandup", "Bhivpuri Road",
    "Byculla", "CSMT", "Dadar", "Diva Jn", "Dolavli", "Dombivli", "Ghatkopar", "Kalva",
    "Kalyan Jn", "Karjat", "Kasara", "Kelavli", "Khadavli", "Khardi", "Khopoli", "Kurla",
    "Lowjee", "Matunga", "Mulund", "Mumbra", "Neral Junction", "Palasdari", "Parel", "Shahad",
    "Shelu", "Thane", "Thansit", "Titwala", "Ulhasnagar", "Umbermali", "Vangani", "Vasind",
    "Vikhroli", "Vithalwadi",
];

/// Placeholder name the audio path must never try to play.
const UNKNOWN_STATION: &str = "Unknown";

/// Resolve a station name to its 1-based audio track.
pub fn audio_track(station: &str) -> Result<u16, Error> {
    if station.is_empty() || station == UNKNOWN_STATION {
        return Err(Error::NoAudioTrack);
    }
    AUDIO_TRACKS
        .iter()
        .position(|&name| name == station)
        .map(|i| i as u16 + 1)
        .ok_or(Error::NoAudioTrack)
}

/// Direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Outbound from CSMT.
    Up,
    /// Inbound towards CSMT.
    Down,
}

impl Line {
    pub const fn label(self) -> &'static str {
        match self {
            Line::Up => "UP",
            Line::Down => "DOWN",
        }
    }

    /// True when station `a` is passed before station `b` on this line.
    pub fn precedes(self, a: StationRef, b: StationRef) -> bool {
        match self {
            Line::Up => a < b,
            Line::Down => a > b,
        }
    }

    const fn index(self) -> usize {
        match self {
            Line::Up => 0,
            Line::Down => 1,
        }
    }
}

/// One of the three catalog routes, named after its terminus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    Kalyan,
    Kasara,
    Khopoli,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Kalyan, Route::Kasara, Route::Khopoli];

    pub const fn index(self) -> usize {
        match self {
            Route::Kalyan => 0,
            Route::Kasara => 1,
            Route::Khopoli => 2,
        }
    }

    /// The route after this one, wrapping back to the first.
    pub fn next(self) -> Route {
        Route::ALL[(self.index() + 1) % Route::ALL.len()]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Route::Kalyan => "Kalyan",
            Route::Kasara => "Kasara",
            Route::Khopoli => "Khopoli",
        }
    }

    /// Stations in UP order.
    pub const fn stations(self) -> &'static [&'static str] {
        match self {
            Route::Kalyan => &KALYAN_STATIONS,
            Route::Kasara => &KASARA_STATIONS,
            Route::Khopoli => &KHOPOLI_STATIONS,
        }
    }

    pub fn station_count(self) -> u16 {
        self.stations().len() as u16
    }

    pub fn station(self, station: StationRef) -> Option<&'static str> {
        self.stations().get(usize::from(station)).copied()
    }

    /// Resolve a station name on this route.
    pub fn index_of(self, name: &str) -> Result<StationRef, Error> {
        self.stations()
            .iter()
            .position(|&s| s == name)
            .map(|i| i as StationRef)
            .ok_or(Error::UnknownStation)
    }
}

/// Composite (line, route) identity. Owns every lookup that depends on both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RouteKey {
    pub line: Line,
    pub route: Route,
}

impl RouteKey {
    pub const COUNT: usize = ROUTE_KEY_COUNT;

    /// All combinations in storage-block order.
    pub const ALL: [RouteKey; ROUTE_KEY_COUNT] = [
        RouteKey::new(Line::Up, Route::Kalyan),
        RouteKey::new(Line::Up, Route::Kasara),
        RouteKey::new(Line::Up, Route::Khopoli),
        RouteKey::new(Line::Down, Route::Kalyan),
        RouteKey::new(Line::Down, Route::Kasara),
        RouteKey::new(Line::Down, Route::Khopoli),
    ];

    pub const fn new(line: Line, route: Route) -> Self {
        Self { line, route }
    }

    /// Dense index in `0..COUNT`, matching [`RouteKey::ALL`].
    pub const fn slot(self) -> usize {
        self.line.index() * Route::ALL.len() + self.route.index()
    }

    /// Byte offset of this combination's block in the persisted image.
    pub const fn storage_offset(self) -> usize {
        self.slot() * HALT_BLOCK_SIZE
    }

    pub fn station_count(self) -> u16 {
        self.route.station_count()
    }

    /// Station index shown for a selection cursor.
    pub fn displayed_index(self, cursor: u16) -> StationRef {
        match self.line {
            Line::Up => cursor,
            Line::Down => self.station_count().saturating_sub(1).saturating_sub(cursor),
        }
    }

    pub fn displayed_station(self, cursor: u16) -> Option<&'static str> {
        self.route.station(self.displayed_index(cursor))
    }

    /// Cursor value the station list opens at.
    pub fn origin_cursor(self) -> u16 {
        match self.line {
            Line::Up => 0,
            Line::Down => self.station_count().saturating_sub(1),
        }
    }

    /// Move the cursor one station in travel direction, wrapping at the ends.
    pub fn advance(self, cursor: u16) -> u16 {
        let count = self.station_count();
        match self.line {
            Line::Up => wrap_next(cursor, count),
            Line::Down => wrap_prev(cursor, count),
        }
    }

    /// Move the cursor one station against travel direction, wrapping.
    pub fn retreat(self, cursor: u16) -> u16 {
        let count = self.station_count();
        match self.line {
            Line::Up => wrap_prev(cursor, count),
            Line::Down => wrap_next(cursor, count),
        }
    }
}
