//! Common test utilities for the session integration tests.
//!
//! Sessions run over an in-memory catalog, a seeded RNG and a fixed clock so
//! every draw and every elapsed time is reproducible.

pub mod fixtures;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use geoquiz_core::{
    AnswerRules, Language, MatchEngine, MemorySource, Prompt, ProgressStore, QuizEvent,
    QuizSession, QuizSettings,
};

/// Start of every test clock.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn source() -> MemorySource {
    MemorySource::new()
        .with(Language::Es, fixtures::COUNTRIES_ES)
        .with(Language::En, fixtures::COUNTRIES_EN)
}

/// A Spanish session with the built-in answer rules.
pub fn session(retry_delay_ms: u64) -> QuizSession<StdRng> {
    session_in(Language::Es, retry_delay_ms)
}

pub fn session_in(language: Language, retry_delay_ms: u64) -> QuizSession<StdRng> {
    session_with_store(language, ProgressStore::new(), retry_delay_ms)
}

/// A session that starts from an existing progress store.
pub fn session_with_store(
    language: Language,
    store: ProgressStore,
    retry_delay_ms: u64,
) -> QuizSession<StdRng> {
    let settings = QuizSettings {
        language,
        retry_delay_ms,
        ..QuizSettings::default()
    };
    QuizSession::new(
        Box::new(source()),
        MatchEngine::new(AnswerRules::builtin()),
        store,
        settings,
        StdRng::seed_from_u64(2024),
    )
}

/// Last prompt asked in a batch of events.
pub fn last_prompt(events: &[QuizEvent]) -> Option<Prompt> {
    events.iter().rev().find_map(|event| match event {
        QuizEvent::Asked(prompt) => Some(prompt.clone()),
        _ => None,
    })
}

/// Answer the current prompt correctly.
pub fn answer_current(session: &mut QuizSession<StdRng>, now: DateTime<Utc>) -> Vec<QuizEvent> {
    let prompt = session.current_prompt().expect("a prompt is pending");
    let solution = session
        .catalog()
        .get(&prompt.country)
        .expect("prompted country is in the catalog")
        .field(prompt.expects)
        .to_string();
    session.submit(&solution, now)
}
