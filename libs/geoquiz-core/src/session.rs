//! Quiz session controller.
//!
//! Drives the screen flow (region, continent, mode, quiz type, play) and
//! glues the catalog, match engine, round state and progress store together.
//! Every input is a discrete method call taking the current time; outcomes
//! come back as [`QuizEvent`]s for the presentation layer to render or sound.

use crate::catalog::{Catalog, CatalogSource};
use crate::error::SessionError;
use crate::matching::{MatchEngine, MatchKind};
use crate::progress::{ProgressKey, ProgressStore};
use crate::round::{Completion, RoundState, Selection};
use crate::settings::QuizSettings;
use crate::timer::OneShotTimer;
use crate::types::{
    Continent, FieldKind, GameMode, Language, ModeKind, Phase, QuizType, Region,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;

/// Where the player currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    RegionSelect,
    ContinentSelect,
    ModeSelect { region: Region },
    /// Capitals sub-menu.
    QuizTypeSelect { region: Region },
    Playing { key: ProgressKey },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegionSelect => "region select",
            Self::ContinentSelect => "continent select",
            Self::ModeSelect { .. } => "mode select",
            Self::QuizTypeSelect { .. } => "quiz type select",
            Self::Playing { .. } => "playing",
        }
    }
}

/// First menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionChoice {
    Global,
    ByContinent,
}

/// What the player is asked about the current item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    /// Catalog name of the item being asked.
    pub country: String,
    /// Flag asset key.
    pub iso_code: String,
    /// Text shown to the player: the ISO code for flags, otherwise the
    /// country or the capital.
    pub shown: String,
    pub expects: FieldKind,
    pub mode: GameMode,
}

/// Canonical answer data revealed after an item is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub country: String,
    pub capital: String,
    pub abbreviations: Vec<String>,
    pub expects: FieldKind,
}

impl Solution {
    /// The value the player was supposed to type.
    pub fn expected(&self) -> &str {
        match self.expects {
            FieldKind::Name => &self.country,
            FieldKind::Capital => &self.capital,
        }
    }
}

/// Semantic outcome of an input, for rendering and feedback effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QuizEvent {
    Asked(Prompt),
    Correct { solution: Solution, kind: MatchKind },
    Wrong(Solution),
    Skipped(Solution),
    /// A retry pass over `count` failed items is about to start.
    RetryRound { count: u32 },
    Completed(Completion),
    /// A parked round was picked up again.
    Resumed { score: u32, total: u32 },
}

/// Result of [`QuizSession::back`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    Screen(Screen),
    /// Back from the first screen: leave the quiz entirely.
    ExitToMenu,
}

pub struct QuizSession<R: Rng> {
    source: Box<dyn CatalogSource>,
    engine: MatchEngine,
    catalog: Catalog,
    store: ProgressStore,
    settings: QuizSettings,
    rng: R,
    screen: Screen,
    round: Option<RoundState>,
    retry_timer: OneShotTimer,
}

impl<R: Rng> QuizSession<R> {
    /// Load the catalog for `settings.language` and bind `store` to it.
    pub fn new(
        source: Box<dyn CatalogSource>,
        engine: MatchEngine,
        mut store: ProgressStore,
        settings: QuizSettings,
        rng: R,
    ) -> Self {
        let catalog = Catalog::load(source.as_ref(), settings.language, engine.rules());
        store.set_language(settings.language);
        Self {
            source,
            engine,
            catalog,
            store,
            settings,
            rng,
            screen: Screen::RegionSelect,
            round: None,
            retry_timer: OneShotTimer::default(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn language(&self) -> Language {
        self.catalog.language()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Continents offered on the continent list.
    pub fn continents(&self) -> Vec<Continent> {
        self.catalog.continents()
    }

    /// A retry interstitial is waiting for [`tick`](Self::tick).
    pub fn retry_pending(&self) -> bool {
        self.retry_timer.is_armed()
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.round.as_ref().map_or(0, |round| round.elapsed_secs(now))
    }

    /// Best saved progress for a top-level mode, for menu labels.
    pub fn mode_progress(&self, region: Region, kind: ModeKind) -> Option<(u32, u32)> {
        self.store.best_progress_for_mode(region, kind)
    }

    /// Saved progress for one capitals sub-mode.
    pub fn quiz_type_progress(&self, region: Region, quiz_type: QuizType) -> Option<(u32, u32)> {
        self.store
            .progress_for(&ProgressKey::new(region, GameMode::Capitals(quiz_type)))
    }

    /// Prompt for the item currently being asked.
    pub fn current_prompt(&self) -> Option<Prompt> {
        let key = self.playing_key()?;
        let item = self.round.as_ref()?.current()?;
        Some(self.prompt_for(key.mode, item))
    }

    /// Switch the catalog language.
    ///
    /// Any active round is abandoned without saving, every saved round is
    /// dropped and the session returns to region select. Returns false when
    /// `language` is already active.
    pub fn set_language(&mut self, language: Language) -> bool {
        if language == self.catalog.language() {
            return false;
        }
        self.retry_timer.disarm();
        self.round = None;
        self.screen = Screen::RegionSelect;
        self.catalog = Catalog::load(self.source.as_ref(), language, self.engine.rules());
        self.store.set_language(language);
        self.settings.language = language;
        tracing::info!(%language, countries = self.catalog.len(), "language switched");
        true
    }

    pub fn choose_region(&mut self, choice: RegionChoice) -> Result<(), SessionError> {
        self.expect_screen("choose_region", matches!(self.screen, Screen::RegionSelect))?;
        self.screen = match choice {
            RegionChoice::Global => Screen::ModeSelect {
                region: Region::Global,
            },
            RegionChoice::ByContinent => Screen::ContinentSelect,
        };
        Ok(())
    }

    pub fn choose_continent(&mut self, continent: Continent) -> Result<(), SessionError> {
        self.expect_screen("choose_continent", matches!(self.screen, Screen::ContinentSelect))?;
        self.screen = Screen::ModeSelect {
            region: Region::Continent(continent),
        };
        Ok(())
    }

    /// Flags start playing right away; capitals open the quiz-type menu.
    pub fn choose_mode(
        &mut self,
        kind: ModeKind,
        now: DateTime<Utc>,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        let Screen::ModeSelect { region } = self.screen else {
            return Err(self.not_available("choose_mode"));
        };
        match kind {
            ModeKind::Flags => self.enter_play(ProgressKey::new(region, GameMode::Flags), now),
            ModeKind::Capitals => {
                self.screen = Screen::QuizTypeSelect { region };
                Ok(Vec::new())
            }
        }
    }

    pub fn choose_quiz_type(
        &mut self,
        quiz_type: QuizType,
        now: DateTime<Utc>,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        let Screen::QuizTypeSelect { region } = self.screen else {
            return Err(self.not_available("choose_quiz_type"));
        };
        self.enter_play(ProgressKey::new(region, GameMode::Capitals(quiz_type)), now)
    }

    /// Explicit answer submission. An empty answer counts as a skip.
    pub fn submit(&mut self, answer: &str, now: DateTime<Utc>) -> Vec<QuizEvent> {
        if answer.trim().is_empty() {
            return self.skip(now);
        }
        let Some((mode, item)) = self.pending_item() else {
            return Vec::new();
        };
        match self.evaluate(mode, &item, answer) {
            Some(kind) => self.resolve_correct(mode, &item, kind, now),
            None => {
                let solution = self.solution_for(mode, &item);
                if let Some(round) = self.round.as_mut() {
                    round.record_failure();
                }
                let mut events = vec![QuizEvent::Wrong(solution)];
                self.advance(now, &mut events);
                events
            }
        }
    }

    /// Check partially typed input. A match is scored like a submission; a
    /// miss produces nothing.
    pub fn type_answer(&mut self, partial: &str, now: DateTime<Utc>) -> Vec<QuizEvent> {
        let Some((mode, item)) = self.pending_item() else {
            return Vec::new();
        };
        match self.evaluate(mode, &item, partial) {
            Some(kind) => self.resolve_correct(mode, &item, kind, now),
            None => Vec::new(),
        }
    }

    pub fn skip(&mut self, now: DateTime<Utc>) -> Vec<QuizEvent> {
        let Some((mode, item)) = self.pending_item() else {
            return Vec::new();
        };
        let solution = self.solution_for(mode, &item);
        if let Some(round) = self.round.as_mut() {
            round.record_failure();
        }
        let mut events = vec![QuizEvent::Skipped(solution)];
        self.advance(now, &mut events);
        events
    }

    /// Per-frame update: fires the retry interstitial once its delay is over.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<QuizEvent> {
        let mut events = Vec::new();
        if self.retry_timer.poll(now) {
            self.advance(now, &mut events);
        }
        events
    }

    /// Go up one screen, parking an active round in the progress store.
    pub fn back(&mut self, now: DateTime<Utc>) -> Back {
        self.screen = match self.screen {
            Screen::Playing { key } => {
                self.retry_timer.disarm();
                if let Some(round) = self.round.take() {
                    self.store.save(&key, round.snapshot(now));
                }
                match key.mode {
                    GameMode::Flags => Screen::ModeSelect { region: key.region },
                    GameMode::Capitals(_) => Screen::QuizTypeSelect { region: key.region },
                }
            }
            Screen::QuizTypeSelect { region } => Screen::ModeSelect { region },
            Screen::ModeSelect {
                region: Region::Global,
            } => Screen::RegionSelect,
            Screen::ModeSelect {
                region: Region::Continent(_),
            } => Screen::ContinentSelect,
            Screen::ContinentSelect => Screen::RegionSelect,
            Screen::RegionSelect => return Back::ExitToMenu,
        };
        Back::Screen(self.screen)
    }

    fn enter_play(
        &mut self,
        key: ProgressKey,
        now: DateTime<Utc>,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        let restored = self
            .store
            .load(&key)
            .map(|snapshot| RoundState::restore(snapshot, now));
        let restored = match restored {
            Some(Ok(round)) => Some(round),
            Some(Err(err)) => {
                tracing::warn!(%key, error = %err, "discarding unusable progress");
                self.store.clear(&key);
                None
            }
            None => None,
        };

        let mut events = Vec::new();
        match restored {
            Some(round) => {
                tracing::info!(%key, score = round.score(), total = round.total(), "round resumed");
                events.push(QuizEvent::Resumed {
                    score: round.score(),
                    total: round.total(),
                });
                let pending = round.current().map(str::to_owned);
                let retry = round.phase() == Phase::Retry;
                let count = round.total();
                self.round = Some(round);
                self.screen = Screen::Playing { key };

                match pending {
                    Some(item) => events.push(QuizEvent::Asked(self.prompt_for(key.mode, &item))),
                    None => {
                        if retry {
                            events.push(QuizEvent::RetryRound { count });
                        }
                        self.advance(now, &mut events);
                    }
                }
            }
            None => {
                let items = self.catalog.working_set(key.region);
                if items.is_empty() {
                    return Err(SessionError::EmptyWorkingSet {
                        region: region_label(key.region),
                    });
                }
                tracing::info!(%key, items = items.len(), "round started");
                self.round = Some(RoundState::new(items, now));
                self.screen = Screen::Playing { key };
                self.advance(now, &mut events);
            }
        }
        Ok(events)
    }

    fn advance(&mut self, now: DateTime<Utc>, events: &mut Vec<QuizEvent>) {
        let Some(key) = self.playing_key() else {
            return;
        };
        let Some(round) = self.round.as_mut() else {
            return;
        };

        match round.select_next(&mut self.rng, now) {
            Selection::Draw(item) => {
                events.push(QuizEvent::Asked(self.prompt_for(key.mode, &item)));
                self.save(key, now);
            }
            Selection::RetryTransition { count } => {
                events.push(QuizEvent::RetryRound { count });
                let delay = self.settings.retry_delay();
                if delay <= Duration::zero() {
                    self.advance(now, events);
                } else {
                    self.retry_timer.arm(now, delay);
                    self.save(key, now);
                }
            }
            Selection::Complete(completion) => {
                self.retry_timer.disarm();
                self.round = None;
                self.store.clear(&key);
                events.push(QuizEvent::Completed(completion));
            }
        }
    }

    fn resolve_correct(
        &mut self,
        mode: GameMode,
        item: &str,
        kind: MatchKind,
        now: DateTime<Utc>,
    ) -> Vec<QuizEvent> {
        let solution = self.solution_for(mode, item);
        if let Some(round) = self.round.as_mut() {
            round.record_correct();
        }
        let mut events = vec![QuizEvent::Correct { solution, kind }];
        self.advance(now, &mut events);
        events
    }

    fn save(&mut self, key: ProgressKey, now: DateTime<Utc>) {
        if let Some(round) = self.round.as_ref() {
            self.store.save(&key, round.snapshot(now));
        }
    }

    /// Mode and item of the question awaiting an answer.
    fn pending_item(&self) -> Option<(GameMode, String)> {
        let key = self.playing_key()?;
        let item = self.round.as_ref()?.current()?;
        Some((key.mode, item.to_owned()))
    }

    fn playing_key(&self) -> Option<ProgressKey> {
        match self.screen {
            Screen::Playing { key } => Some(key),
            _ => None,
        }
    }

    /// An item missing from the catalog never matches.
    fn evaluate(&self, mode: GameMode, item: &str, answer: &str) -> Option<MatchKind> {
        let Some(country) = self.catalog.get(item) else {
            tracing::warn!(item, "current item is not in the catalog");
            return None;
        };
        self.engine
            .evaluate(answer, country, mode.expected_field(), self.catalog.language())
    }

    fn prompt_for(&self, mode: GameMode, item: &str) -> Prompt {
        let expects = mode.expected_field();
        let Some(country) = self.catalog.get(item) else {
            return Prompt {
                country: item.to_owned(),
                iso_code: String::new(),
                shown: item.to_owned(),
                expects,
                mode,
            };
        };
        let shown = match mode {
            GameMode::Flags => &country.iso_code,
            GameMode::Capitals(QuizType::Country) => &country.name,
            GameMode::Capitals(QuizType::Capital) => &country.capital,
        };
        Prompt {
            country: country.name.clone(),
            iso_code: country.iso_code.clone(),
            shown: shown.clone(),
            expects,
            mode,
        }
    }

    fn solution_for(&self, mode: GameMode, item: &str) -> Solution {
        let expects = mode.expected_field();
        match self.catalog.get(item) {
            Some(country) => Solution {
                country: country.name.clone(),
                capital: country.capital.clone(),
                abbreviations: country.abbreviations.clone(),
                expects,
            },
            None => Solution {
                country: item.to_owned(),
                capital: String::new(),
                abbreviations: Vec::new(),
                expects,
            },
        }
    }

    fn expect_screen(&self, action: &'static str, ok: bool) -> Result<(), SessionError> {
        if ok {
            Ok(())
        } else {
            Err(self.not_available(action))
        }
    }

    fn not_available(&self, action: &'static str) -> SessionError {
        SessionError::NotAvailable {
            action,
            screen: self.screen.name(),
        }
    }
}

fn region_label(region: Region) -> String {
    match region {
        Region::Global => "global".to_string(),
        Region::Continent(continent) => continent.to_string(),
    }
}
