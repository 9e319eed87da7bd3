//! Error types for geoquiz-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while reading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no catalog source for language {0}")]
    Missing(String),

    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("invalid answer rules: {0}")]
    Rules(#[from] serde_json::Error),
}

/// Errors raised when restoring round state from a snapshot.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("item {item} appears more than once in the snapshot")]
    Overlap { item: String },

    #[error("snapshot total {total} is smaller than its {remaining} remaining items")]
    InconsistentTotal { total: u32, remaining: usize },
}

/// Errors returned by quiz session navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{action} is not available on the {screen} screen")]
    NotAvailable {
        action: &'static str,
        screen: &'static str,
    },

    #[error("no countries to play for {region}")]
    EmptyWorkingSet { region: String },
}
