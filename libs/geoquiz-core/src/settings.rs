//! Quiz configuration.

use crate::types::Language;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global quiz settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// Initial UI and catalog language.
    pub language: Language,
    /// Directory holding `countries_<code>.csv` files.
    pub data_dir: PathBuf,
    /// Pause before the first item of a retry pass; 0 disables it.
    pub retry_delay_ms: u64,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            data_dir: PathBuf::from("data"),
            retry_delay_ms: 1200,
        }
    }
}

impl QuizSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.retry_delay_ms).unwrap_or(i64::MAX))
    }
}
