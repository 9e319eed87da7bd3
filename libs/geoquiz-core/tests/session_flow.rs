//! End-to-end quiz session tests over an in-memory catalog.

mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;

use common::{answer_current, at, last_prompt, session, session_in, session_with_store, t0};
use geoquiz_core::{
    AnswerRules, Back, Completion, Continent, FieldKind, GameMode, Language, MatchEngine,
    MatchKind, ModeKind, ProgressKey, ProgressStore, QuizEvent, QuizType, RegionChoice, Region,
    RoundSnapshot, Screen, SessionError,
};

/// Test a clean run over every country ends with a perfect completion.
#[test]
fn test_global_flags_perfect_run() {
    let mut session = session(1200);
    session.choose_region(RegionChoice::Global).unwrap();
    let events = session.choose_mode(ModeKind::Flags, t0()).unwrap();
    assert!(last_prompt(&events).is_some());

    let mut asked = Vec::new();
    let mut events = Vec::new();
    for i in 1..=6 {
        asked.push(session.current_prompt().unwrap().country);
        events = answer_current(&mut session, at(i));
        assert!(matches!(events[0], QuizEvent::Correct { kind: MatchKind::Exact, .. }));
    }

    asked.sort();
    asked.dedup();
    assert_eq!(asked.len(), 6);
    assert_eq!(
        events.last(),
        Some(&QuizEvent::Completed(Completion {
            score: 6,
            total: 6,
            elapsed_secs: 6,
            perfect: true,
            best_score: 6,
        }))
    );
    assert!(session.round().is_none());
    assert!(session.store().is_empty());
}

/// Test failed items come back in a retry round after the interstitial delay.
#[test]
fn test_retry_round_after_skips() {
    let mut session = session(1200);
    session.choose_region(RegionChoice::ByContinent).unwrap();
    session.choose_continent(Continent::America).unwrap();
    session.choose_mode(ModeKind::Flags, t0()).unwrap();

    session.skip(t0());
    session.submit("Atlantis", t0());
    let events = session.skip(t0());
    assert!(matches!(events[0], QuizEvent::Skipped(_)));
    assert_eq!(events.last(), Some(&QuizEvent::RetryRound { count: 3 }));
    assert!(session.retry_pending());
    assert_eq!(session.current_prompt(), None);

    // Answers during the interstitial are ignored.
    assert!(session.submit("México", t0()).is_empty());
    assert!(session.tick(t0() + Duration::milliseconds(600)).is_empty());

    let events = session.tick(t0() + Duration::milliseconds(1200));
    assert!(last_prompt(&events).is_some());

    let mut events = Vec::new();
    for i in 1..=3 {
        events = answer_current(&mut session, at(i));
    }
    match events.last() {
        Some(QuizEvent::Completed(completion)) => {
            assert_eq!((completion.score, completion.total), (3, 3));
            assert!(!completion.perfect);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

/// Test a wrong answer reveals the expected capital.
#[test]
fn test_wrong_capital_reveals_solution() {
    let mut session = session(0);
    session.choose_region(RegionChoice::Global).unwrap();
    session.choose_mode(ModeKind::Capitals, t0()).unwrap();
    let events = session.choose_quiz_type(QuizType::Country, t0()).unwrap();
    let prompt = last_prompt(&events).unwrap();
    assert_eq!(prompt.expects, FieldKind::Capital);
    assert_eq!(prompt.shown, prompt.country);

    let events = session.submit("Atlantis", t0());
    match &events[0] {
        QuizEvent::Wrong(solution) => {
            assert_eq!(solution.country, prompt.country);
            assert_eq!(
                Some(solution.expected()),
                session.catalog().capital_of(&prompt.country)
            );
        }
        other => panic!("expected a wrong answer, got {other:?}"),
    }
}

/// Test leaving a round parks it and re-entering resumes the same question.
#[test]
fn test_back_parks_and_resumes_round() {
    let mut session = session(0);
    session.choose_region(RegionChoice::Global).unwrap();
    session.choose_mode(ModeKind::Capitals, t0()).unwrap();
    session.choose_quiz_type(QuizType::Country, t0()).unwrap();
    answer_current(&mut session, at(5));
    let pending = session.current_prompt().unwrap();

    assert_eq!(
        session.back(at(10)),
        Back::Screen(Screen::QuizTypeSelect {
            region: Region::Global
        })
    );
    assert!(session.round().is_none());
    assert_eq!(
        session.quiz_type_progress(Region::Global, QuizType::Country),
        Some((1, 6))
    );

    let events = session.choose_quiz_type(QuizType::Country, at(100)).unwrap();
    assert_eq!(
        events,
        vec![
            QuizEvent::Resumed { score: 1, total: 6 },
            QuizEvent::Asked(pending),
        ]
    );
    // Time spent away from the round does not count.
    assert_eq!(session.elapsed_secs(at(103)), 13);
}

/// Test the mode menu shows the best ratio among the capitals sub-modes.
#[test]
fn test_best_progress_across_quiz_types() {
    let mut session = session(0);
    session.choose_region(RegionChoice::Global).unwrap();
    session.choose_mode(ModeKind::Capitals, t0()).unwrap();

    session.choose_quiz_type(QuizType::Country, t0()).unwrap();
    answer_current(&mut session, at(1));
    session.back(at(2));

    session.choose_quiz_type(QuizType::Capital, t0()).unwrap();
    answer_current(&mut session, at(1));
    answer_current(&mut session, at(2));
    session.back(at(3));

    assert_eq!(
        session.mode_progress(Region::Global, ModeKind::Capitals),
        Some((2, 6))
    );
    assert_eq!(session.mode_progress(Region::Global, ModeKind::Flags), None);
    assert_eq!(
        session.mode_progress(Region::Continent(Continent::Europe), ModeKind::Capitals),
        None
    );
}

/// Test a retry round parked during its interstitial resumes straight into a draw.
#[test]
fn test_resume_pending_retry_round() {
    let mut session = session(1200);
    session.choose_region(RegionChoice::ByContinent).unwrap();
    session.choose_continent(Continent::Europe).unwrap();
    session.choose_mode(ModeKind::Flags, t0()).unwrap();
    session.skip(t0());
    session.skip(t0());
    assert!(session.retry_pending());

    session.back(at(1));
    assert!(!session.retry_pending());
    let key = ProgressKey::new(Region::Continent(Continent::Europe), GameMode::Flags);
    assert!(session.store().load(&key).is_some());

    let events = session.choose_mode(ModeKind::Flags, at(5)).unwrap();
    assert_eq!(events[0], QuizEvent::Resumed { score: 0, total: 2 });
    assert_eq!(events[1], QuizEvent::RetryRound { count: 2 });
    assert!(matches!(events[2], QuizEvent::Asked(_)));
    assert!(!session.retry_pending());
}

/// Test switching language drops every parked round.
#[test]
fn test_language_switch_clears_progress() {
    let mut session = session(0);
    session.choose_region(RegionChoice::Global).unwrap();
    session.choose_mode(ModeKind::Flags, t0()).unwrap();
    answer_current(&mut session, at(1));
    session.back(at(2));
    assert_eq!(session.mode_progress(Region::Global, ModeKind::Flags), Some((1, 6)));

    assert!(!session.set_language(Language::Es));
    assert!(session.set_language(Language::En));
    assert_eq!(session.mode_progress(Region::Global, ModeKind::Flags), None);
    assert!(session.store().is_empty());
    assert_eq!(session.screen(), Screen::RegionSelect);
    assert_eq!(session.language(), Language::En);
    assert!(session.catalog().get("Spain").is_some());
}

fn parked_with_current(current: &str) -> RoundSnapshot {
    RoundSnapshot {
        pool: vec!["México".to_string()],
        score: 1,
        total: 2,
        current: Some(current.to_string()),
        ..RoundSnapshot::default()
    }
}

/// Test a resumed item the catalog does not know is scored as a miss.
#[test]
fn test_unknown_current_item_counts_as_wrong() {
    let mut store = ProgressStore::new();
    store.set_language(Language::Es);
    let key = ProgressKey::new(Region::Global, GameMode::Flags);
    assert!(store.save(&key, parked_with_current("Spain")));

    let mut session = session_with_store(Language::Es, store, 0);
    session.choose_region(RegionChoice::Global).unwrap();
    let events = session.choose_mode(ModeKind::Flags, t0()).unwrap();
    assert_eq!(events[0], QuizEvent::Resumed { score: 1, total: 2 });
    assert_eq!(last_prompt(&events).unwrap().country, "Spain");

    // Typing the item itself cannot match a country that is not loaded.
    assert!(session.type_answer("Spain", at(1)).is_empty());
    let events = session.submit("Spain", at(1));
    match &events[0] {
        QuizEvent::Wrong(solution) => {
            assert_eq!(solution.country, "Spain");
            assert_eq!(solution.capital, "");
        }
        other => panic!("expected a wrong answer, got {other:?}"),
    }
    assert_eq!(last_prompt(&events).unwrap().country, "México");
    assert_eq!(session.round().unwrap().failed(), &["Spain".to_string()]);
}

/// Test snapshots saved before the store knew its language are discarded.
#[test]
fn test_unbound_store_is_cleared_on_session_start() {
    let mut store = ProgressStore::new();
    let key = ProgressKey::new(Region::Global, GameMode::Flags);
    assert!(store.save(&key, parked_with_current("Spain")));

    let mut session = session_with_store(Language::Es, store, 0);
    assert!(session.store().is_empty());
    assert_eq!(session.store().language(), Some(Language::Es));

    session.choose_region(RegionChoice::Global).unwrap();
    let events = session.choose_mode(ModeKind::Flags, t0()).unwrap();
    assert!(!events.iter().any(|e| matches!(e, QuizEvent::Resumed { .. })));
}

/// Test a continent without countries cannot start a round.
#[test]
fn test_empty_continent_is_reported() {
    let mut session = session(0);
    session.choose_region(RegionChoice::ByContinent).unwrap();
    session.choose_continent(Continent::Asia).unwrap();
    assert_eq!(
        session.choose_mode(ModeKind::Flags, t0()),
        Err(SessionError::EmptyWorkingSet {
            region: "asia".to_string()
        })
    );
    assert!(session.round().is_none());
}

/// Test aliases, declines and abbreviations against the loaded catalogs.
#[test]
fn test_answer_rules_against_catalogs() {
    let engine = MatchEngine::new(AnswerRules::builtin());

    let en = session_in(Language::En, 0);
    let us = en.catalog().get("United States").unwrap();
    assert_eq!(
        engine.evaluate("USA", us, FieldKind::Name, Language::En),
        Some(MatchKind::Alias)
    );
    assert_eq!(engine.evaluate("Estados Unidos", us, FieldKind::Name, Language::En), None);

    let es = session(0);
    let eeuu = es.catalog().get("Estados Unidos").unwrap();
    // Registered for English only.
    assert_eq!(
        engine.evaluate("United States of America", eeuu, FieldKind::Name, Language::Es),
        None
    );
    assert_eq!(
        engine.evaluate("EE.UU.", eeuu, FieldKind::Name, Language::Es),
        Some(MatchKind::Alias)
    );

    let uk = es.catalog().get("Reino Unido").unwrap();
    assert_eq!(
        engine.evaluate("uk", uk, FieldKind::Name, Language::Es),
        Some(MatchKind::Abbreviation)
    );

    let costa_rica = es.catalog().get("Costa Rica").unwrap();
    assert!(engine.matches("costarica", costa_rica, FieldKind::Name, Language::Es));
    let botsuana = es.catalog().get("Botsuana").unwrap();
    assert!(!engine.matches("botsuan", botsuana, FieldKind::Name, Language::Es));
}
