//! In-memory progress store.
//!
//! Rounds that are left mid-way are parked here under a composite key and
//! resumed when the player re-enters the same region and mode. The store
//! lives for the process only and is bound to one catalog language: snapshots
//! reference country names, so a language change drops every entry.

use crate::types::{GameMode, Language, ModeKind, Phase, Region};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one resumable round: region (+ continent), mode (+ quiz type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub region: Region,
    pub mode: GameMode,
}

impl ProgressKey {
    pub fn new(region: Region, mode: GameMode) -> Self {
        Self { region, mode }
    }

    /// Key prefix shared by every sub-mode of `kind` in `region`.
    fn prefix(region: Region, kind: ModeKind) -> String {
        format!("{}|{}", region_segment(region), kind.as_str())
    }
}

fn region_segment(region: Region) -> String {
    match region {
        Region::Global => "global".to_string(),
        Region::Continent(continent) => format!("continent|{}", continent.as_str()),
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::prefix(self.region, self.mode.kind()))?;
        if let GameMode::Capitals(quiz_type) = self.mode {
            write!(f, "|{}", quiz_type.as_str())?;
        }
        Ok(())
    }
}

/// Serialized round state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub pool: Vec<String>,
    pub failed: Vec<String>,
    pub score: u32,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    pub phase: Phase,
    pub elapsed_ms: u64,
    pub running: bool,
    #[serde(default)]
    pub had_failures: bool,
    #[serde(default)]
    pub best_score: u32,
}

impl RoundSnapshot {
    /// Untouched rounds are not worth remembering.
    fn worth_keeping(&self) -> bool {
        self.total > 0 && (self.score > 0 || self.phase == Phase::Retry)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    language: Option<Language>,
    entries: BTreeMap<String, RoundSnapshot>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the store to a catalog language, clearing it when it was bound to
    /// another language or holds entries saved before any binding. Returns
    /// whether entries were dropped.
    pub fn set_language(&mut self, language: Language) -> bool {
        let stale = self.language != Some(language);
        self.language = Some(language);
        if stale && !self.entries.is_empty() {
            tracing::debug!(%language, dropped = self.entries.len(), "language changed, clearing progress");
            self.entries.clear();
            return true;
        }
        false
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Store a snapshot. Returns false, leaving the store untouched, when the
    /// snapshot has no items or no progress outside a retry pass.
    pub fn save(&mut self, key: &ProgressKey, snapshot: RoundSnapshot) -> bool {
        if !snapshot.worth_keeping() {
            return false;
        }
        tracing::debug!(%key, score = snapshot.score, total = snapshot.total, "progress saved");
        self.entries.insert(key.to_string(), snapshot);
        true
    }

    pub fn load(&self, key: &ProgressKey) -> Option<&RoundSnapshot> {
        self.entries.get(&key.to_string())
    }

    pub fn clear(&mut self, key: &ProgressKey) -> Option<RoundSnapshot> {
        let removed = self.entries.remove(&key.to_string());
        if removed.is_some() {
            tracing::debug!(%key, "progress cleared");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(score, total)` stored for exactly `key`, if it has progress.
    pub fn progress_for(&self, key: &ProgressKey) -> Option<(u32, u32)> {
        self.load(key)
            .filter(|s| s.score > 0 && s.total > 0)
            .map(|s| (s.score, s.total))
    }

    /// Best `(score, total)` by ratio among the sub-modes of `kind` in
    /// `region`.
    pub fn best_progress_for_mode(&self, region: Region, kind: ModeKind) -> Option<(u32, u32)> {
        let prefix = ProgressKey::prefix(region, kind);
        self.entries
            .iter()
            .filter(|(key, _)| {
                key.strip_prefix(&prefix)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('|'))
            })
            .map(|(_, s)| (s.score, s.total))
            .filter(|&(score, total)| score > 0 && total > 0)
            .max_by(|a, b| {
                let lhs = u64::from(a.0) * u64::from(b.1);
                let rhs = u64::from(b.0) * u64::from(a.1);
                lhs.cmp(&rhs)
            })
    }
}
