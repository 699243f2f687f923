//! Arrival detector - turns periodic network scans into arrive/depart events.
//!
//! A halt is recognised by the access point broadcasting [`TARGET_NETWORK`].
//! Presence must be held for `ARRIVAL_HOLD_MS` before an arrival is
//! confirmed, so brief sightings while passing do not count. Once
//! confirmed, the first scan without the target is a departure.
//!
//! Scans are asynchronous: a scan is started at most every
//! `SCAN_INTERVAL_MS` and its result is collected on a later poll.
//!
//! [`TARGET_NETWORK`]: crate::config::TARGET_NETWORK

use crate::config::{ARRIVAL_HOLD_MS, SCAN_INTERVAL_MS};
use crate::devices::NetworkScanner;
use crate::timer::{elapsed, Countdown, Millis};

/// Debounced presence of the target network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Presence {
    Away,
    /// Seen continuously since this timestamp, not yet held long enough.
    Present { since: Millis },
    /// Held for at least the hold time: standing at a halt.
    Confirmed,
}

/// Edge reported by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArrivalEvent {
    Arrived,
    Departed,
}

pub struct ArrivalDetector {
    target: &'static str,
    presence: Presence,
    scan_spacing: Countdown,
    scanning: bool,
}

impl ArrivalDetector {
    pub const fn new(target: &'static str) -> Self {
        Self {
            target,
            presence: Presence::Away,
            scan_spacing: Countdown::new(SCAN_INTERVAL_MS),
            scanning: false,
        }
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn is_confirmed(&self) -> bool {
        self.presence == Presence::Confirmed
    }

    /// Forget all presence and scan state.
    pub fn reset(&mut self) {
        self.presence = Presence::Away;
        self.scan_spacing.cancel();
        self.scanning = false;
    }

    /// Start a scan if one is due, then collect a finished result if any.
    ///
    /// Never blocks: returns `None` while a scan is still running.
    pub fn poll<N: NetworkScanner>(&mut self, scanner: &mut N, now: Millis) -> Option<ArrivalEvent> {
        if !self.scanning && self.scan_due(now) {
            scanner.scan_start();
            self.scan_spacing.start(now);
            self.scanning = true;
            trace!("scan started at {}", now);
        }
        if !self.scanning {
            return None;
        }

        let target = self.target;
        let found = scanner
            .scan_poll()?
            .iter()
            .any(|name| name.as_str() == target);
        self.scanning = false;
        self.observe(found, now)
    }

    /// Feed one completed scan result.
    pub fn observe(&mut self, found: bool, now: Millis) -> Option<ArrivalEvent> {
        let (next, event) = match (self.presence, found) {
            (Presence::Away, true) => (Presence::Present { since: now }, None),
            (Presence::Present { since }, true) if elapsed(now, since) >= ARRIVAL_HOLD_MS => {
                (Presence::Confirmed, Some(ArrivalEvent::Arrived))
            }
            (Presence::Present { .. }, false) => (Presence::Away, None),
            (Presence::Confirmed, false) => (Presence::Away, Some(ArrivalEvent::Departed)),
            (current, _) => (current, None),
        };

        if next != self.presence {
            debug!("presence {} -> {}", self.presence, next);
        }
        self.presence = next;
        if let Some(event) = event {
            info!("arrival detector: {}", event);
        }
        event
    }

    fn scan_due(&self, now: Millis) -> bool {
        !self.scan_spacing.is_running() || self.scan_spacing.is_expired(now)
    }
}
