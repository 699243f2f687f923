//! Wrap-safe millisecond timers for the tick-driven control loop.
//!
//! Timestamps are `u32` milliseconds from a free-running monotonic
//! counter. Elapsed time is always `now.wrapping_sub(start)`, so a counter
//! rollover never produces a spurious expiry.

/// Milliseconds of the monotonic clock.
pub type Millis = u32;

/// Milliseconds elapsed from `since` to `now`, tolerant of counter rollover.
#[inline]
pub fn elapsed(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

/// A one-shot timer: armed at a timestamp, ready once `period` has passed.
///
/// Components keep one `Countdown` per "last event time + threshold" pair
/// and the control loop asks them whether they are ready for `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Countdown {
    started: Option<Millis>,
    period: Millis,
}

impl Countdown {
    /// Create a disarmed countdown.
    pub const fn new(period: Millis) -> Self {
        Self {
            started: None,
            period,
        }
    }

    /// Arm (or re-arm) the countdown at `now`.
    pub fn start(&mut self, now: Millis) {
        self.started = Some(now);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.started = None;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// True when armed and at least `period` has elapsed since arming.
    pub fn is_expired(&self, now: Millis) -> bool {
        match self.started {
            Some(start) => elapsed(now, start) >= self.period,
            None => false,
        }
    }

    /// Fire once: returns `true` and disarms if expired.
    pub fn poll(&mut self, now: Millis) -> bool {
        if self.is_expired(now) {
            self.started = None;
            true
        } else {
            false
        }
    }
}
