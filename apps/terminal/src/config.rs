use std::path::PathBuf;

use geoquiz_core::{Language, QuizSettings};

pub const LANGUAGE_VAR: &str = "GEOQUIZ_LANGUAGE";
pub const DATA_DIR_VAR: &str = "GEOQUIZ_DATA_DIR";
pub const RETRY_DELAY_VAR: &str = "GEOQUIZ_RETRY_DELAY_MS";

/// Build quiz settings from the process environment.
pub fn settings_from_env() -> QuizSettings {
    settings_from(|name| std::env::var(name).ok())
}

/// Build quiz settings from a variable lookup. Unset variables keep their
/// defaults; invalid ones are reported and ignored.
pub fn settings_from(lookup: impl Fn(&str) -> Option<String>) -> QuizSettings {
    let mut settings = QuizSettings::default();

    if let Some(code) = lookup(LANGUAGE_VAR) {
        settings.language = Language::resolve(&code);
    }

    if let Some(dir) = lookup(DATA_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
        settings.data_dir = PathBuf::from(dir);
    }

    if let Some(raw) = lookup(RETRY_DELAY_VAR) {
        match raw.trim().parse::<u64>() {
            Ok(ms) => settings.retry_delay_ms = ms,
            Err(err) => tracing::warn!(
                var = RETRY_DELAY_VAR,
                value = %raw,
                error = %err,
                default = settings.retry_delay_ms,
                "invalid retry delay, using default"
            ),
        }
    }

    settings
}
