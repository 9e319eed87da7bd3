//! Country catalog for the active language.

use crate::error::{CatalogError, Result};
use crate::matching::equivalent;
use crate::parser::{self, CatalogRow};
use crate::rules::AnswerRules;
use crate::types::{Continent, Country, Language, Region};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Provides the raw tabular source for a language.
pub trait CatalogSource {
    fn read(&self, lang: Language) -> Result<String>;
}

/// Reads `countries_<code>.csv` files from a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, lang: Language) -> PathBuf {
        self.dir
            .join(format!("countries_{}.csv", lang.code().to_ascii_lowercase()))
    }
}

impl CatalogSource for DirSource {
    fn read(&self, lang: Language) -> Result<String> {
        let path = self.path_for(lang);
        std::fs::read_to_string(&path).map_err(|source| CatalogError::Io { path, source })
    }
}

/// In-memory sources, mainly for tests and embedded datasets.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: HashMap<Language, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lang: Language, content: impl Into<String>) -> Self {
        self.sources.insert(lang, content.into());
        self
    }
}

impl CatalogSource for MemorySource {
    fn read(&self, lang: Language) -> Result<String> {
        self.sources
            .get(&lang)
            .cloned()
            .ok_or_else(|| CatalogError::Missing(lang.code().to_string()))
    }
}

/// Immutable catalog of one language plus its derived indices.
#[derive(Debug, Clone)]
pub struct Catalog {
    language: Language,
    countries: HashMap<String, Country>,
    names: Vec<String>,
    capitals: HashMap<String, String>,
    by_continent: BTreeMap<Continent, Vec<String>>,
}

impl Catalog {
    /// A catalog with no entries.
    pub fn empty(language: Language) -> Self {
        Self {
            language,
            countries: HashMap::new(),
            names: Vec::new(),
            capitals: HashMap::new(),
            by_continent: BTreeMap::new(),
        }
    }

    /// Load the catalog for a language code.
    ///
    /// Unknown codes fall back to the default language. A missing or
    /// unreadable source yields an empty catalog; callers must check
    /// [`is_empty`](Self::is_empty) before starting a round.
    pub fn load_for_language(source: &dyn CatalogSource, code: &str, rules: &AnswerRules) -> Self {
        Self::load(source, Language::resolve(code), rules)
    }

    /// Load the catalog for a known language.
    pub fn load(source: &dyn CatalogSource, language: Language, rules: &AnswerRules) -> Self {
        let content = match source.read(language) {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(%language, error = %err, "catalog source unavailable");
                return Self::empty(language);
            }
        };

        let parsed = parser::parse(&content);
        for issue in &parsed.skipped {
            tracing::warn!(%language, %issue, "skipping catalog row");
        }

        let catalog = Self::from_rows(language, parsed.rows, rules);
        tracing::info!(%language, countries = catalog.len(), "catalog loaded");
        catalog
    }

    /// Build a catalog from parsed rows, attaching abbreviations from `rules`.
    pub fn from_rows(language: Language, rows: Vec<CatalogRow>, rules: &AnswerRules) -> Self {
        let mut catalog = Self::empty(language);

        for row in rows {
            if catalog.countries.contains_key(&row.name) {
                tracing::warn!(%language, name = %row.name, line = row.line, "duplicate country name");
                continue;
            }
            let country = Country {
                abbreviations: rules.abbreviations_for(language, &row.name),
                name: row.name,
                capital: row.capital,
                continent: row.continent,
                iso_code: row.iso_code,
            };
            catalog.insert(country);
        }

        catalog
    }

    fn insert(&mut self, country: Country) {
        self.capitals
            .insert(country.capital.clone(), country.name.clone());
        self.by_continent
            .entry(country.continent)
            .or_default()
            .push(country.name.clone());
        self.names.push(country.name.clone());
        self.countries.insert(country.name.clone(), country);
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Country> {
        self.countries.get(name)
    }

    /// Country names in source order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.names.iter().filter_map(|name| self.countries.get(name))
    }

    pub fn capital_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.capital.as_str())
    }

    /// Resolve a capital to its country name, exactly first, then by
    /// normalized comparison.
    pub fn country_by_capital(&self, capital: &str) -> Option<&str> {
        if let Some(name) = self.capitals.get(capital) {
            return Some(name.as_str());
        }
        self.capitals
            .iter()
            .find(|(known, _)| equivalent(capital, known).is_some())
            .map(|(_, name)| name.as_str())
    }

    /// Names in a continent; empty when the continent has no entries.
    pub fn countries_in_continent(&self, continent: Continent) -> &[String] {
        self.by_continent
            .get(&continent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Same as [`countries_in_continent`](Self::countries_in_continent) for a
    /// raw tag; unknown tags give an empty list.
    pub fn countries_in_continent_tag(&self, tag: &str) -> &[String] {
        Continent::from_tag(tag)
            .map(|continent| self.countries_in_continent(continent))
            .unwrap_or(&[])
    }

    /// Continents with at least one country.
    pub fn continents(&self) -> Vec<Continent> {
        self.by_continent.keys().copied().collect()
    }

    /// Country names making up the working set for a region.
    pub fn working_set(&self, region: Region) -> Vec<String> {
        match region {
            Region::Global => self.names.clone(),
            Region::Continent(continent) => self.countries_in_continent(continent).to_vec(),
        }
    }
}
