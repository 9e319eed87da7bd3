//! Core types for the geography quiz.

use crate::error::CatalogError;
use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported catalog / UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    Es,
    En,
    De,
    It,
    Pt,
}

impl Default for Language {
    fn default() -> Self {
        Self::Es
    }
}

impl Language {
    pub const ALL: [Language; 5] = [Self::Es, Self::En, Self::De, Self::It, Self::Pt];

    /// Two-letter upper-case code ("ES", "EN", ...).
    pub fn code(self) -> &'static str {
        match self {
            Self::Es => "ES",
            Self::En => "EN",
            Self::De => "DE",
            Self::It => "IT",
            Self::Pt => "PT",
        }
    }

    /// Parse from a language code, case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Like [`from_code`](Self::from_code), falling back to the default
    /// language with a warning.
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            let fallback = Self::default();
            tracing::warn!(code, %fallback, "unsupported language, using fallback");
            fallback
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CatalogError::UnknownLanguage(s.to_string()))
    }
}

/// Region tags a country can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    Africa,
    America,
    Asia,
    Europe,
    Oceania,
}

impl Continent {
    pub const ALL: [Continent; 5] = [
        Self::Africa,
        Self::America,
        Self::Asia,
        Self::Europe,
        Self::Oceania,
    ];

    /// Stable tag used in progress keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Africa => "africa",
            Self::America => "america",
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Oceania => "oceania",
        }
    }

    /// Parse a continent tag as written in any of the catalog sources.
    ///
    /// Accepts the localized spellings used by the five datasets
    /// ("África", "Americas", "Asien", "Europa", "Oceanía", ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize(tag).as_str() {
            "africa" | "afrika" => Some(Self::Africa),
            "america" | "americas" | "amerika" | "americhe" | "north america"
            | "south america" | "america del norte" | "america del sur" => Some(Self::America),
            "asia" | "asien" => Some(Self::Asia),
            "europe" | "europa" => Some(Self::Europe),
            "oceania" | "ozeanien" => Some(Self::Oceania),
            _ => None,
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry for the active language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub capital: String,
    pub continent: Continent,
    /// Two-letter code, stable across languages (flag asset key).
    pub iso_code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abbreviations: Vec<String>,
}

impl Country {
    /// Canonical value of the requested field.
    pub fn field(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Name => &self.name,
            FieldKind::Capital => &self.capital,
        }
    }
}

/// Which canonical field an answer is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Capital,
}

/// Capitals sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    /// Shown a country, answer its capital.
    Country,
    /// Shown a capital, answer its country.
    Capital,
}

impl QuizType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Capital => "capital",
        }
    }
}

/// Top-level game mode without the capitals sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Flags,
    Capitals,
}

impl ModeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flags => "flags",
            Self::Capitals => "capitals",
        }
    }
}

/// Fully specified game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Flags,
    Capitals(QuizType),
}

impl GameMode {
    pub fn kind(self) -> ModeKind {
        match self {
            Self::Flags => ModeKind::Flags,
            Self::Capitals(_) => ModeKind::Capitals,
        }
    }

    /// Field the player has to type for this mode.
    pub fn expected_field(self) -> FieldKind {
        match self {
            Self::Flags | Self::Capitals(QuizType::Capital) => FieldKind::Name,
            Self::Capitals(QuizType::Country) => FieldKind::Capital,
        }
    }
}

/// Working-set scope of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Global,
    Continent(Continent),
}

/// Round pass phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// First pass over the entire working set.
    Full,
    /// Repeated pass over previously failed items.
    Retry,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Full
    }
}
