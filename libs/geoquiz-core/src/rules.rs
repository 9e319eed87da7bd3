//! Per-language answer rules: aliases, declined answers and abbreviations.
//!
//! Rules are plain data. [`AnswerRules::builtin`] carries the tables shipped
//! with the game and [`AnswerRules::from_json`] loads an equivalent document:
//!
//! ```json
//! {
//!   "EN": {
//!     "aliases": { "GB": ["uk", "united kingdom"] },
//!     "declined_phrases": ["reino unido"],
//!     "declined_chars": "ñ"
//!   },
//!   "ES": { "abbreviations": { "Reino Unido": ["uk", "ru"] } }
//! }
//! ```
//!
//! Tables of different languages never mix: a lookup only ever consults the
//! table of the language it is asked about.

use crate::error::Result;
use crate::normalize::{compact, normalize};
use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Rules for a single language, as written in a rules document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageRules {
    /// ISO code -> alternate answers accepted for that country's name.
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Answers that are declined when they normalize to one of these.
    pub declined_phrases: Vec<String>,
    /// Raw characters whose presence declines the alias and abbreviation layers.
    pub declined_chars: String,
    /// Canonical country name -> accepted short forms.
    pub abbreviations: BTreeMap<String, Vec<String>>,
}

/// Language rules with every entry pre-normalized for lookup.
#[derive(Debug, Clone, Default)]
struct CompiledRules {
    aliases: HashMap<String, HashSet<String>>,
    declined_phrases: HashSet<String>,
    declined_chars: Vec<char>,
    abbreviations: HashMap<String, Vec<String>>,
}

impl CompiledRules {
    fn compile(rules: &LanguageRules) -> Self {
        let aliases = rules
            .aliases
            .iter()
            .map(|(iso, answers)| {
                let set = answers
                    .iter()
                    .map(|a| compact(a))
                    .filter(|a| !a.is_empty())
                    .collect();
                (iso.to_ascii_uppercase(), set)
            })
            .collect();

        Self {
            aliases,
            declined_phrases: rules.declined_phrases.iter().map(|p| normalize(p)).collect(),
            declined_chars: rules.declined_chars.to_lowercase().chars().collect(),
            abbreviations: rules
                .abbreviations
                .iter()
                .map(|(name, abbrs)| (name.clone(), abbrs.clone()))
                .collect(),
        }
    }
}

/// Answer rules for every supported language.
#[derive(Debug, Clone, Default)]
pub struct AnswerRules {
    languages: HashMap<Language, CompiledRules>,
}

impl AnswerRules {
    /// Rules with no aliases, declines or abbreviations in any language.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from per-language rule documents.
    pub fn from_tables(tables: BTreeMap<Language, LanguageRules>) -> Self {
        let languages = tables
            .iter()
            .map(|(lang, rules)| (*lang, CompiledRules::compile(rules)))
            .collect();
        Self { languages }
    }

    /// Parse a JSON rules document keyed by language code.
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: BTreeMap<Language, LanguageRules> = serde_json::from_str(json)?;
        Ok(Self::from_tables(tables))
    }

    /// The tables shipped with the game.
    pub fn builtin() -> Self {
        Self::from_tables(Self::builtin_tables())
    }

    /// Rule documents behind [`builtin`](Self::builtin).
    pub fn builtin_tables() -> BTreeMap<Language, LanguageRules> {
        shipped_tables()
    }

    /// Whether `alias` (already compact-normalized) is accepted for `iso_code`
    /// in `lang`.
    pub fn is_alias(&self, lang: Language, iso_code: &str, compact_answer: &str) -> bool {
        self.languages
            .get(&lang)
            .and_then(|rules| rules.aliases.get(&iso_code.to_ascii_uppercase()))
            .is_some_and(|set| set.contains(compact_answer))
    }

    /// Whether the raw answer is declined for `lang`.
    pub fn is_declined(&self, lang: Language, raw_answer: &str, normalized: &str) -> bool {
        let Some(rules) = self.languages.get(&lang) else {
            return false;
        };
        if rules.declined_phrases.contains(normalized) {
            return true;
        }
        let lowered = raw_answer.to_lowercase();
        rules.declined_chars.iter().any(|c| lowered.contains(*c))
    }

    /// Abbreviations for a canonical name; empty when the language has none.
    pub fn abbreviations_for(&self, lang: Language, name: &str) -> Vec<String> {
        self.languages
            .get(&lang)
            .and_then(|rules| rules.abbreviations.get(name))
            .cloned()
            .unwrap_or_default()
    }
}

fn entries(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

fn shipped_tables() -> BTreeMap<Language, LanguageRules> {
    let mut tables = BTreeMap::new();

    tables.insert(
        Language::Es,
        LanguageRules {
            // Capital idioms accepted as the country name.
            aliases: entries(&[
                ("US", &["estados unidos", "eeuu", "washington", "washington dc", "washington d c"]),
                ("BO", &["la paz", "sucre"]),
                ("ZA", &["pretoria", "ciudad del cabo", "bloemfontein"]),
                ("LK", &["sjk", "kotte", "sri jayawardenapura kotte"]),
                ("MX", &["cdmx", "ciudad de mexico"]),
                ("PA", &["panama", "ciudad de panama"]),
                ("PS", &["ramallah", "jerusalen"]),
                ("VA", &["vaticano", "ciudad del vaticano"]),
            ]),
            declined_phrases: Vec::new(),
            declined_chars: String::new(),
            abbreviations: entries(&[
                ("Estados Unidos", &["usa", "eeuu"]),
                ("Reino Unido", &["uk", "ru"]),
                ("Países Bajos", &["holanda"]),
                ("Nueva Zelanda", &["nz"]),
                ("Papúa Nueva Guinea", &["png"]),
                ("República Democrática del Congo", &["rdc"]),
                ("Antigua y Barbuda", &["ab"]),
                ("Ciudad del Vaticano", &["vaticano"]),
                ("Santo Tomé y Príncipe", &["santotome", "stp"]),
                ("Bosnia y Herzegovina", &["bh"]),
                ("Corea del Sur", &["cs"]),
                ("Corea del Norte", &["cn"]),
                ("Emiratos Árabes Unidos", &["eau", "uae"]),
                ("República Centroafricana", &["rc"]),
                ("Islas Salomón", &["is"]),
                ("Islas Marshall", &["im"]),
                ("Guinea-Bisáu", &["gb"]),
                ("Timor Oriental", &["to"]),
                ("Trinidad y Tobago", &["tt"]),
                ("Macedonia del Norte", &["mn"]),
                ("Sudán del Sur", &["ss"]),
                ("Sri Lanka", &["sl"]),
                ("Catar", &["qatar"]),
                ("Irak", &["iraq"]),
                ("El Salvador", &["es"]),
                ("Costa Rica", &["cr"]),
                ("San Marino", &["sm"]),
                ("San Vicente y las Granadinas", &["svg"]),
                ("Sierra Leona", &["sl"]),
                ("Burkina Faso", &["bf"]),
                ("República Dominicana", &["rd"]),
                ("Guinea Ecuatorial", &["ge"]),
                ("San Cristóbal y Nieves", &["scn"]),
                ("Costa de Marfil", &["cdm"]),
                ("Arabia Saudita", &["as"]),
                ("Cabo Verde", &["cv"]),
            ]),
        },
    );

    tables.insert(
        Language::En,
        LanguageRules {
            aliases: entries(&[
                ("TL", &["timor leste", "timor-leste", "east timor"]),
                ("CI", &["ivory coast", "cote divoire", "cote d ivoire"]),
                ("CD", &["dr congo", "democratic republic of the congo"]),
                ("CG", &["republic of the congo", "congo brazzaville"]),
                ("BO", &["plurinational state of bolivia"]),
                ("GB", &["uk", "united kingdom"]),
                ("US", &["usa", "united states", "united states of america"]),
                ("AE", &["uae", "united arab emirates"]),
                ("VA", &["vatican", "holy see"]),
                ("KR", &["south korea"]),
                ("KP", &["north korea"]),
                ("LA", &["laos"]),
                ("FM", &["micronesia"]),
                ("MM", &["burma"]),
                ("CV", &["cape verde"]),
                ("SZ", &["swaziland"]),
                ("CZ", &["czech republic"]),
                ("MK", &["macedonia"]),
                ("PS", &["palestinian territories", "state of palestine"]),
            ]),
            // Spanish answers that must not leak into the English game.
            declined_phrases: ["estados unidos", "reino unido", "corea del sur", "corea del norte", "españa"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            declined_chars: "áéíóúüñ".to_string(),
            abbreviations: BTreeMap::new(),
        },
    );

    tables.insert(
        Language::De,
        LanguageRules {
            aliases: entries(&[("US", &["usa"]), ("GB", &["uk"])]),
            ..LanguageRules::default()
        },
    );

    tables.insert(
        Language::It,
        LanguageRules {
            aliases: entries(&[("US", &["usa"]), ("GB", &["uk"])]),
            ..LanguageRules::default()
        },
    );

    tables.insert(
        Language::Pt,
        LanguageRules {
            aliases: entries(&[("US", &["eua", "usa"]), ("GB", &["uk"])]),
            ..LanguageRules::default()
        },
    );

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_alias_lookup_is_compact() {
        let rules = AnswerRules::builtin();
        assert!(rules.is_alias(Language::En, "CI", &compact("Ivory Coast")));
        assert!(rules.is_alias(Language::En, "ci", "cotedivoire"));
        assert!(!rules.is_alias(Language::En, "CI", "costademarfil"));
    }

    #[test]
    fn aliases_do_not_cross_languages() {
        let rules = AnswerRules::builtin();
        assert!(rules.is_alias(Language::En, "MM", "burma"));
        assert!(!rules.is_alias(Language::Es, "MM", "burma"));
        assert!(!rules.is_alias(Language::De, "MM", "burma"));
    }

    #[test]
    fn aliases_are_synonyms_not_constituent_countries() {
        let rules = AnswerRules::builtin();
        assert!(rules.is_alias(Language::De, "GB", "uk"));
        assert!(!rules.is_alias(Language::De, "GB", "england"));
        assert!(!rules.is_alias(Language::It, "GB", "inghilterra"));
    }

    #[test]
    fn declined_phrases_and_chars() {
        let rules = AnswerRules::builtin();
        assert!(rules.is_declined(Language::En, "Reino Unido", "reino unido"));
        assert!(rules.is_declined(Language::En, "Japón", "japon"));
        assert!(!rules.is_declined(Language::En, "Japan", "japan"));
        assert!(!rules.is_declined(Language::Es, "Reino Unido", "reino unido"));
    }

    #[test]
    fn abbreviations_only_for_languages_with_a_table() {
        let rules = AnswerRules::builtin();
        assert_eq!(
            rules.abbreviations_for(Language::Es, "Reino Unido"),
            vec!["uk".to_string(), "ru".to_string()]
        );
        assert!(rules.abbreviations_for(Language::En, "United Kingdom").is_empty());
        assert!(rules.abbreviations_for(Language::Es, "Atlantis").is_empty());
    }

    #[test]
    fn rules_load_from_json() {
        let json = r#"{
            "IT": {
                "aliases": { "nl": ["Olanda"] },
                "declined_phrases": ["Holland"]
            }
        }"#;
        let rules = AnswerRules::from_json(json).unwrap();
        assert!(rules.is_alias(Language::It, "NL", "olanda"));
        assert!(rules.is_declined(Language::It, "holland!", "holland"));
        assert!(!rules.is_alias(Language::En, "NL", "olanda"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(AnswerRules::from_json("{ \"XX\": {} }").is_err());
        assert!(AnswerRules::from_json("not json").is_err());
    }
}
