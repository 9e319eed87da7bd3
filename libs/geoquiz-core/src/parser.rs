//! Tolerant parser for catalog source files.
//!
//! # Format
//! ```text
//! # comment lines start with '#'
//! name,capital,continent,iso_code
//! Costa Rica,San José,América,CR
//! "Bahamas, The",Nassau,America,BS
//! ```
//!
//! Rows that cannot be used are reported as [`RowIssue`]s and skipped; the
//! remaining rows are still returned.

use crate::types::Continent;
use std::fmt;

/// A usable catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub name: String,
    pub capital: String,
    pub continent: Continent,
    pub iso_code: String,
    pub line: u64,
}

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    Short { line: u64, fields: usize },
    EmptyField { line: u64 },
    UnknownContinent { line: u64, tag: String },
    InvalidIsoCode { line: u64, code: String },
    Unreadable { line: Option<u64>, reason: String },
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short { line, fields } => {
                write!(f, "line {line}: expected 4 fields, found {fields}")
            }
            Self::EmptyField { line } => write!(f, "line {line}: empty required field"),
            Self::UnknownContinent { line, tag } => {
                write!(f, "line {line}: unknown continent {tag:?}")
            }
            Self::InvalidIsoCode { line, code } => {
                write!(f, "line {line}: invalid ISO code {code:?}")
            }
            Self::Unreadable {
                line: Some(line),
                reason,
            } => write!(f, "line {line}: {reason}"),
            Self::Unreadable { line: None, reason } => f.write_str(reason),
        }
    }
}

/// Rows parsed from one source, plus the rows that were skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    pub rows: Vec<CatalogRow>,
    pub skipped: Vec<RowIssue>,
}

/// Parse catalog CSV content.
pub fn parse(content: &str) -> ParsedRows {
    let mut parsed = ParsedRows::default();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                parsed.skipped.push(RowIssue::Unreadable {
                    line: err.position().map(|p| p.line()),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map_or(0, |p| p.line());
        match parse_record(&record, line) {
            Ok(row) => parsed.rows.push(row),
            Err(issue) => parsed.skipped.push(issue),
        }
    }

    parsed
}

fn parse_record(record: &csv::StringRecord, line: u64) -> Result<CatalogRow, RowIssue> {
    if record.len() < 4 {
        return Err(RowIssue::Short {
            line,
            fields: record.len(),
        });
    }

    let (name, capital, continent, iso_code) = (&record[0], &record[1], &record[2], &record[3]);
    if name.is_empty() || capital.is_empty() {
        return Err(RowIssue::EmptyField { line });
    }

    let continent = Continent::from_tag(continent).ok_or_else(|| RowIssue::UnknownContinent {
        line,
        tag: continent.to_string(),
    })?;

    if iso_code.len() != 2 || !iso_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RowIssue::InvalidIsoCode {
            line,
            code: iso_code.to_string(),
        });
    }

    Ok(CatalogRow {
        name: name.to_string(),
        capital: capital.to_string(),
        continent,
        iso_code: iso_code.to_ascii_uppercase(),
        line,
    })
}
