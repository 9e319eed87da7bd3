//! Wall-clock session stopwatch.
//!
//! Elapsed time is derived from timestamps, never accumulated per frame, so
//! it stays correct across frame-rate changes and stalls.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwatch {
    /// Time banked by earlier running intervals, in milliseconds.
    banked_ms: i64,
    started_at: Option<DateTime<Utc>>,
}

impl Stopwatch {
    /// A stopped stopwatch that already shows `elapsed_ms`.
    pub fn with_elapsed_ms(elapsed_ms: u64) -> Self {
        Self {
            banked_ms: i64::try_from(elapsed_ms).unwrap_or(i64::MAX),
            started_at: None,
        }
    }

    /// Reset to zero and start running.
    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.banked_ms = 0;
        self.started_at = Some(now);
    }

    /// Continue from the banked time. No-op if already running.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Stop and bank the running interval. No-op if already stopped.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.started_at.take() {
            self.banked_ms = self
                .banked_ms
                .saturating_add((now - started).num_milliseconds().max(0));
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Milliseconds elapsed as of `now`.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let running = self
            .started_at
            .map_or(0, |started| (now - started).num_milliseconds().max(0));
        u64::try_from(self.banked_ms.saturating_add(running)).unwrap_or(0)
    }

    /// Whole seconds elapsed as of `now`.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.elapsed_ms(now) / 1000
    }
}
