//! One-shot deferred timer.
//!
//! At most one deadline is pending: arming replaces any pending deadline, and
//! a fired timer disarms itself.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Option<DateTime<Utc>>,
}

impl OneShotTimer {
    /// Arm to fire `delay` after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: DateTime<Utc>, delay: Duration) {
        self.deadline = Some(now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC));
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
