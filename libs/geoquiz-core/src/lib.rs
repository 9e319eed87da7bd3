//! Core geography quiz library used by the terminal front-end.
//!
//! Provides:
//! - Per-language country catalogs loaded from CSV sources
//! - Answer matching with normalization, aliases and abbreviations
//! - Round selection with full and retry passes
//! - In-memory progress store for resuming parked rounds
//! - The quiz session controller tying it all together

pub mod catalog;
pub mod error;
pub mod matching;
pub mod normalize;
pub mod parser;
pub mod progress;
pub mod round;
pub mod rules;
pub mod session;
pub mod settings;
pub mod stopwatch;
pub mod timer;
pub mod types;

pub use catalog::{Catalog, CatalogSource, DirSource, MemorySource};
pub use error::{CatalogError, ProgressError, Result, SessionError};
pub use matching::{equivalent, MatchEngine, MatchKind};
pub use normalize::{compact, normalize};
pub use progress::{ProgressKey, ProgressStore, RoundSnapshot};
pub use round::{Completion, RoundState, Selection};
pub use rules::{AnswerRules, LanguageRules};
pub use session::{Back, Prompt, QuizEvent, QuizSession, RegionChoice, Screen, Solution};
pub use settings::QuizSettings;
pub use types::{
    Continent, Country, FieldKind, GameMode, Language, ModeKind, Phase, QuizType, Region,
};
