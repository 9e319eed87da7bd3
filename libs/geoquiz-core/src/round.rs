//! Round state and next-item selection.
//!
//! A round first passes over the whole working set (`Phase::Full`), then
//! repeats passes over the items failed in the previous pass
//! (`Phase::Retry`) until a pass ends with no failures.

use crate::error::ProgressError;
use crate::progress::RoundSnapshot;
use crate::stopwatch::Stopwatch;
use crate::types::Phase;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Final figures of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Score of the last pass.
    pub score: u32,
    /// Item count of the last pass.
    pub total: u32,
    pub elapsed_secs: u64,
    /// Every item was answered correctly on the first pass.
    pub perfect: bool,
    /// Highest pass score reached during the run.
    pub best_score: u32,
}

/// Outcome of [`RoundState::select_next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A new current item was drawn.
    Draw(String),
    /// The pass ended with failures; they form the next pool.
    RetryTransition { count: u32 },
    /// Nothing is left to ask.
    Complete(Completion),
}

#[derive(Debug, Clone)]
pub struct RoundState {
    pool: Vec<String>,
    failed: Vec<String>,
    score: u32,
    total: u32,
    current: Option<String>,
    phase: Phase,
    had_failures: bool,
    best_score: u32,
    stopwatch: Stopwatch,
}

impl RoundState {
    /// Start a full pass over `items` (duplicates dropped) and start the
    /// stopwatch.
    pub fn new(items: impl IntoIterator<Item = String>, now: DateTime<Utc>) -> Self {
        let mut seen = HashSet::new();
        let pool: Vec<String> = items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();
        let mut stopwatch = Stopwatch::default();
        stopwatch.restart(now);

        Self {
            total: count(pool.len()),
            pool,
            failed: Vec::new(),
            score: 0,
            current: None,
            phase: Phase::Full,
            had_failures: false,
            best_score: 0,
            stopwatch,
        }
    }

    /// Rebuild a round from a snapshot, resuming the stopwatch if it was
    /// running when the snapshot was taken.
    pub fn restore(snapshot: &RoundSnapshot, now: DateTime<Utc>) -> Result<Self, ProgressError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let items = snapshot
            .pool
            .iter()
            .chain(&snapshot.failed)
            .chain(snapshot.current.as_ref());
        for item in items {
            if !seen.insert(item.as_str()) {
                return Err(ProgressError::Overlap { item: item.clone() });
            }
        }
        if (snapshot.total as usize) < seen.len() {
            return Err(ProgressError::InconsistentTotal {
                total: snapshot.total,
                remaining: seen.len(),
            });
        }

        let mut stopwatch = Stopwatch::with_elapsed_ms(snapshot.elapsed_ms);
        if snapshot.running {
            stopwatch.resume(now);
        }

        Ok(Self {
            pool: snapshot.pool.clone(),
            failed: snapshot.failed.clone(),
            score: snapshot.score,
            total: snapshot.total,
            current: snapshot.current.clone(),
            phase: snapshot.phase,
            had_failures: snapshot.had_failures,
            best_score: snapshot.best_score,
            stopwatch,
        })
    }

    /// Capture the state for the progress store.
    pub fn snapshot(&self, now: DateTime<Utc>) -> RoundSnapshot {
        RoundSnapshot {
            pool: self.pool.clone(),
            failed: self.failed.clone(),
            score: self.score,
            total: self.total,
            current: self.current.clone(),
            phase: self.phase,
            elapsed_ms: self.stopwatch.elapsed_ms(now),
            running: self.stopwatch.is_running(),
            had_failures: self.had_failures,
            best_score: self.best_score,
        }
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn had_failures(&self) -> bool {
        self.had_failures
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.stopwatch.elapsed_secs(now)
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.stopwatch.pause(now);
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.stopwatch.resume(now);
    }

    /// Score the current item. Returns it, or `None` when nothing is asked.
    pub fn record_correct(&mut self) -> Option<String> {
        let item = self.current.take()?;
        self.score += 1;
        Some(item)
    }

    /// Move the current item to the failed pool (wrong answer or skip).
    pub fn record_failure(&mut self) -> Option<String> {
        let item = self.current.take()?;
        self.failed.push(item.clone());
        self.had_failures = true;
        Some(item)
    }

    /// Advance the round.
    ///
    /// Draws uniformly from the pool with swap-remove; when the pool is empty
    /// either turns the failed items into a retry pass or completes the round.
    /// An item still pending as current goes back into the pool first.
    pub fn select_next<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Selection {
        if let Some(unresolved) = self.current.take() {
            tracing::debug!(item = %unresolved, "returning unresolved item to the pool");
            self.pool.push(unresolved);
        }

        if !self.pool.is_empty() {
            let idx = rng.gen_range(0..self.pool.len());
            let item = self.pool.swap_remove(idx);
            self.current = Some(item.clone());
            return Selection::Draw(item);
        }

        self.best_score = self.best_score.max(self.score);

        if !self.failed.is_empty() {
            self.pool = std::mem::take(&mut self.failed);
            self.score = 0;
            self.total = count(self.pool.len());
            self.phase = Phase::Retry;
            tracing::info!(count = self.total, "starting retry pass");
            return Selection::RetryTransition { count: self.total };
        }

        self.stopwatch.pause(now);
        self.phase = Phase::Full;
        let completion = Completion {
            score: self.score,
            total: self.total,
            elapsed_secs: self.stopwatch.elapsed_secs(now),
            perfect: !self.had_failures && self.total > 0 && self.score == self.total,
            best_score: self.best_score,
        };
        tracing::info!(?completion, "round complete");
        Selection::Complete(completion)
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
