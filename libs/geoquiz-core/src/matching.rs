//! Answer matching for typed quiz answers.

use crate::normalize::{normalize, strip_spaces};
use crate::rules::AnswerRules;
use crate::types::{Country, FieldKind, Language};
use serde::{Deserialize, Serialize};

/// Which rule accepted an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Equal after normalization.
    Exact,
    /// Equal once internal spaces are removed ("costarica").
    SpaceInsensitive,
    /// Listed in the active language's alias table.
    Alias,
    /// One of the country's abbreviations.
    Abbreviation,
}

/// Compare two strings after normalization, ignoring internal spaces as a
/// fallback. No edit-distance tolerance.
pub fn equivalent(answer: &str, target: &str) -> Option<MatchKind> {
    let answer = normalize(answer);
    if answer.is_empty() {
        return None;
    }
    let target = normalize(target);
    if answer == target {
        return Some(MatchKind::Exact);
    }
    if strip_spaces(&answer) == strip_spaces(&target) {
        return Some(MatchKind::SpaceInsensitive);
    }
    None
}

/// Decides whether a typed answer is acceptable for a catalog entry.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    rules: AnswerRules,
}

impl MatchEngine {
    pub fn new(rules: AnswerRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &AnswerRules {
        &self.rules
    }

    /// Whether `answer` is accepted for `country`'s `field` in `lang`.
    pub fn matches(&self, answer: &str, country: &Country, field: FieldKind, lang: Language) -> bool {
        self.evaluate(answer, country, field, lang).is_some()
    }

    /// Like [`matches`](Self::matches), reporting which rule accepted the
    /// answer.
    ///
    /// Capital answers only get the normalization and space-insensitive
    /// comparison; aliases, declines and abbreviations apply to names only.
    pub fn evaluate(
        &self,
        answer: &str,
        country: &Country,
        field: FieldKind,
        lang: Language,
    ) -> Option<MatchKind> {
        let normalized = normalize(answer);
        if normalized.is_empty() {
            return None;
        }

        if let Some(kind) = equivalent(&normalized, country.field(field)) {
            return Some(kind);
        }

        if field == FieldKind::Capital {
            return None;
        }

        if self.rules.is_declined(lang, answer, &normalized) {
            tracing::debug!(answer, country = %country.name, %lang, "answer declined for language");
            return None;
        }

        let compact = strip_spaces(&normalized);
        if self.rules.is_alias(lang, &country.iso_code, &compact) {
            tracing::debug!(answer, country = %country.name, %lang, "accepted as alias");
            return Some(MatchKind::Alias);
        }

        let by_abbreviation = country
            .abbreviations
            .iter()
            .any(|abbr| strip_spaces(&normalize(abbr)) == compact);
        if by_abbreviation {
            tracing::debug!(answer, country = %country.name, "accepted as abbreviation");
            return Some(MatchKind::Abbreviation);
        }

        None
    }
}
