//! Announcement scheduler - when to speak which station.
//!
//! Holds at most one pending task (the next halt after a departure), the
//! "currently playing" marker, and the re-announcement timer for the
//! current halt. It decides *when*; the controller resolves the audio
//! track and talks to the audio module.

use crate::config::{AUDIO_SETTLE_MS, GRACE_PERIOD_MS, REANNOUNCE_INTERVAL_MS};
use crate::devices::PlaybackStatus;
use crate::timer::{elapsed, Countdown, Millis};

/// A scheduled next-halt announcement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnnouncementTask {
    pub station: &'static str,
    pub enqueued_at: Millis,
}

impl AnnouncementTask {
    pub fn is_due(&self, now: Millis) -> bool {
        elapsed(now, self.enqueued_at) >= GRACE_PERIOD_MS
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Playback {
    station: &'static str,
    started_at: Millis,
}

pub struct AnnouncementScheduler {
    pending: Option<AnnouncementTask>,
    playing: Option<Playback>,
    repeat: Countdown,
}

impl Default for AnnouncementScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnouncementScheduler {
    pub const fn new() -> Self {
        Self {
            pending: None,
            playing: None,
            repeat: Countdown::new(REANNOUNCE_INTERVAL_MS),
        }
    }

    /// Schedule `station`, replacing any task still waiting.
    pub fn enqueue(&mut self, station: &'static str, now: Millis) {
        if let Some(old) = self.pending {
            debug!("replacing pending announcement {}", old.station);
        }
        self.pending = Some(AnnouncementTask {
            station,
            enqueued_at: now,
        });
        info!("announcement queued: {}", station);
    }

    pub fn pending(&self) -> Option<&AnnouncementTask> {
        self.pending.as_ref()
    }

    /// Station whose announcement is playing, if any.
    pub fn playing(&self) -> Option<&'static str> {
        self.playing.map(|p| p.station)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    /// Take the pending task once its grace period is over and the audio
    /// module is free.
    pub fn take_due(&mut self, now: Millis) -> Option<AnnouncementTask> {
        if self.playing.is_some() {
            return None;
        }
        match self.pending {
            Some(task) if task.is_due(now) => self.pending.take(),
            _ => None,
        }
    }

    /// Whether the current halt should be announced again.
    pub fn repeat_due(&self, now: Millis) -> bool {
        self.pending.is_none() && self.playing.is_none() && self.repeat.is_expired(now)
    }

    /// Start the re-announcement period (on finalize).
    pub fn arm_repeat(&mut self, now: Millis) {
        self.repeat.start(now);
    }

    /// Record that playback of `station` began at `now`.
    pub fn started(&mut self, station: &'static str, now: Millis) {
        self.playing = Some(Playback {
            station,
            started_at: now,
        });
        self.repeat.start(now);
    }

    /// Clear the playing marker.
    pub fn stopped(&mut self) {
        if let Some(playback) = self.playing.take() {
            debug!("playback of {} ended", playback.station);
        }
    }

    /// Track the audio module's status. A playback counts as finished once
    /// the module reports stopped after the settle time.
    pub fn sync_status(&mut self, status: PlaybackStatus, now: Millis) {
        if let Some(playback) = self.playing {
            if status == PlaybackStatus::Stopped
                && elapsed(now, playback.started_at) >= AUDIO_SETTLE_MS
            {
                self.stopped();
            }
        }
    }

    /// Drop the pending task, the playing marker and the repeat timer.
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            info!("announcement cancelled: {}", task.station);
        }
        self.playing = None;
        self.repeat.cancel();
    }
}
