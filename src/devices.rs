//! Peripheral contracts the core drives.
//!
//! The display, audio module and network scanner are external hardware;
//! the core only sees these traits. A peripheral that was not found at
//! boot is passed as `None`: every call on it becomes a no-op, and the
//! rest of the core keeps working.

use heapless::String;

/// A visible network name as reported by a scan.
pub type NetworkName = String<32>;

/// Two-line character display.
pub trait TextDisplay {
    /// Replace both lines. Lines are at most 16 characters.
    fn show(&mut self, top: &str, bottom: &str);
}

/// Playback state reported by the audio module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackStatus {
    Playing,
    Stopped,
}

/// Announcement audio module with a fixed track table.
pub trait AudioPlayer {
    /// Start track `file` (1-based).
    fn play(&mut self, file: u16);
    fn pause(&mut self);
    fn status(&mut self) -> PlaybackStatus;
}

/// Non-blocking wireless scan.
pub trait NetworkScanner {
    /// Begin a scan. Must return immediately.
    fn scan_start(&mut self);

    /// Names seen by the last started scan, or `None` while it is still
    /// running. A completed result is handed out once.
    fn scan_poll(&mut self) -> Option<&[NetworkName]>;
}

/// Tags scan requests so a scanner that runs asynchronously can tell the
/// result of the latest request from one left over by an earlier request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSequence {
    latest: u32,
}

impl ScanSequence {
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Tag for a new request. Results of every earlier request become stale.
    pub fn issue(&mut self) -> u32 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }

    /// True if a result carrying `tag` answers the latest request.
    pub fn accepts(&self, tag: u32) -> bool {
        tag == self.latest
    }
}

impl<T: TextDisplay> TextDisplay for Option<T> {
    fn show(&mut self, top: &str, bottom: &str) {
        if let Some(display) = self {
            display.show(top, bottom);
        }
    }
}

impl<T: AudioPlayer> AudioPlayer for Option<T> {
    fn play(&mut self, file: u16) {
        if let Some(audio) = self {
            audio.play(file);
        }
    }

    fn pause(&mut self) {
        if let Some(audio) = self {
            audio.pause();
        }
    }

    fn status(&mut self) -> PlaybackStatus {
        match self {
            Some(audio) => audio.status(),
            None => PlaybackStatus::Stopped,
        }
    }
}
