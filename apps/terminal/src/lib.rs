pub mod config;
pub mod i18n;

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geoquiz_core::{
    AnswerRules, Back, DirSource, FieldKind, GameMode, Language, MatchEngine, MatchKind,
    ModeKind, ProgressStore, QuizEvent, QuizSession, QuizType, RegionChoice, Screen,
    SessionError,
};

use crate::i18n::translate;

/// Whether the input loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front-end over a quiz session.
pub struct Terminal<R: Rng, W: Write> {
    session: QuizSession<R>,
    out: W,
}

impl<R: Rng, W: Write> Terminal<R, W> {
    pub fn new(session: QuizSession<R>, out: W) -> Self {
        Self { session, out }
    }

    pub fn session(&self) -> &QuizSession<R> {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn lang(&self) -> Language {
        self.session.language()
    }

    fn say(&mut self, key: &str, substitutions: &[(&str, String)]) -> io::Result<()> {
        let text = translate(self.lang(), key, substitutions);
        writeln!(self.out, "{text}")
    }

    /// Print the menu or prompt for the current screen.
    pub fn show_screen(&mut self) -> io::Result<()> {
        match self.session.screen() {
            Screen::RegionSelect => {
                self.say("menu.region", &[])?;
                self.say("menu.help", &[])
            }
            Screen::ContinentSelect => {
                self.say("menu.continent", &[])?;
                for (i, continent) in self.session.continents().iter().enumerate() {
                    writeln!(self.out, "{}) {}", i + 1, continent)?;
                }
                Ok(())
            }
            Screen::ModeSelect { region } => {
                let flags = progress_label(self.session.mode_progress(region, ModeKind::Flags));
                let capitals =
                    progress_label(self.session.mode_progress(region, ModeKind::Capitals));
                self.say("menu.mode", &[("flags", flags), ("capitals", capitals)])
            }
            Screen::QuizTypeSelect { region } => {
                let country = progress_label(
                    self.session.quiz_type_progress(region, QuizType::Country),
                );
                let capital = progress_label(
                    self.session.quiz_type_progress(region, QuizType::Capital),
                );
                self.say("menu.quiz_type", &[("country", country), ("capital", capital)])
            }
            Screen::Playing { .. } => Ok(()),
        }
    }

    /// Handle one input line.
    pub fn handle_line(&mut self, line: &str, now: DateTime<Utc>) -> io::Result<Flow> {
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            return self.handle_command(command, now);
        }

        let screen = self.session.screen();
        if let Screen::Playing { .. } = screen {
            let events = self.session.submit(line, now);
            self.render(&events)?;
            if self.session.round().is_none() {
                return self.go_back(now);
            }
            return Ok(Flow::Continue);
        }

        let choice = line.parse::<usize>().ok();
        let result = match (screen, choice) {
            (Screen::RegionSelect, Some(1)) => self
                .session
                .choose_region(RegionChoice::Global)
                .map(|_| Vec::new()),
            (Screen::RegionSelect, Some(2)) => self
                .session
                .choose_region(RegionChoice::ByContinent)
                .map(|_| Vec::new()),
            (Screen::ContinentSelect, Some(n)) => {
                let picked = n
                    .checked_sub(1)
                    .and_then(|i| self.session.continents().get(i).copied());
                match picked {
                    Some(continent) => {
                        self.session.choose_continent(continent).map(|_| Vec::new())
                    }
                    None => return self.invalid(),
                }
            }
            (Screen::ModeSelect { .. }, Some(1)) => self.session.choose_mode(ModeKind::Flags, now),
            (Screen::ModeSelect { .. }, Some(2)) => {
                self.session.choose_mode(ModeKind::Capitals, now)
            }
            (Screen::QuizTypeSelect { .. }, Some(1)) => {
                self.session.choose_quiz_type(QuizType::Country, now)
            }
            (Screen::QuizTypeSelect { .. }, Some(2)) => {
                self.session.choose_quiz_type(QuizType::Capital, now)
            }
            _ => return self.invalid(),
        };

        match result {
            Ok(events) => {
                self.render(&events)?;
                self.show_screen()?;
            }
            Err(SessionError::EmptyWorkingSet { region }) => {
                self.say("msg.empty_region", &[("region", region)])?;
                self.show_screen()?;
            }
            Err(err) => {
                tracing::debug!(error = %err, "menu choice rejected");
                return self.invalid();
            }
        }
        Ok(Flow::Continue)
    }

    fn handle_command(&mut self, command: &str, now: DateTime<Utc>) -> io::Result<Flow> {
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("quit"), _) => {
                self.say("msg.bye", &[])?;
                Ok(Flow::Quit)
            }
            (Some("back"), _) => self.go_back(now),
            (Some("skip"), _) => {
                let events = self.session.skip(now);
                self.render(&events)?;
                if matches!(self.session.screen(), Screen::Playing { .. })
                    && self.session.round().is_none()
                {
                    return self.go_back(now);
                }
                Ok(Flow::Continue)
            }
            (Some("lang"), Some(code)) => match Language::from_code(code) {
                Some(language) => {
                    self.session.set_language(language);
                    self.say("msg.language", &[("lang", language.to_string())])?;
                    self.show_screen()?;
                    Ok(Flow::Continue)
                }
                None => self.invalid(),
            },
            (Some("progress"), _) => {
                let snapshot = self.session.round().map(|round| round.snapshot(now));
                let json = serde_json::to_string_pretty(&snapshot)
                    .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
                writeln!(self.out, "{json}")?;
                Ok(Flow::Continue)
            }
            _ => self.invalid(),
        }
    }

    fn go_back(&mut self, now: DateTime<Utc>) -> io::Result<Flow> {
        match self.session.back(now) {
            Back::Screen(_) => {
                self.show_screen()?;
                Ok(Flow::Continue)
            }
            Back::ExitToMenu => {
                self.say("msg.bye", &[])?;
                Ok(Flow::Quit)
            }
        }
    }

    fn invalid(&mut self) -> io::Result<Flow> {
        self.say("menu.invalid", &[])?;
        self.show_screen()?;
        Ok(Flow::Continue)
    }

    /// Poll the retry interstitial and render whatever it produces.
    pub fn tick(&mut self, now: DateTime<Utc>) -> io::Result<()> {
        let events = self.session.tick(now);
        self.render(&events)
    }

    pub fn render(&mut self, events: &[QuizEvent]) -> io::Result<()> {
        for event in events {
            self.render_event(event)?;
        }
        Ok(())
    }

    fn render_event(&mut self, event: &QuizEvent) -> io::Result<()> {
        let (score, total) = self
            .session
            .round()
            .map_or((0, 0), |round| (round.score(), round.total()));

        match event {
            QuizEvent::Asked(prompt) => {
                let counts = [("score", score.to_string()), ("total", total.to_string())];
                let (key, name, value) = match prompt.mode {
                    GameMode::Flags => ("prompt.flag", "flag", flag_emoji(&prompt.iso_code)),
                    GameMode::Capitals(QuizType::Country) => {
                        ("prompt.capital_of", "country", prompt.shown.clone())
                    }
                    GameMode::Capitals(QuizType::Capital) => {
                        ("prompt.country_of", "capital", prompt.shown.clone())
                    }
                };
                let mut substitutions = vec![(name, value)];
                substitutions.extend(counts);
                self.say(key, &substitutions)
            }
            QuizEvent::Correct { solution, kind } => match kind {
                MatchKind::Abbreviation => {
                    self.say("msg.correct_full_name", &[("country", solution.country.clone())])
                }
                _ => self.say("msg.correct", &[]),
            },
            QuizEvent::Wrong(solution) => match solution.expects {
                FieldKind::Capital => {
                    self.say("msg.wrong_capital", &[("answer", solution.capital.clone())])
                }
                FieldKind::Name => {
                    self.say("msg.wrong_country", &[("answer", solution.country.clone())])?;
                    if !solution.abbreviations.is_empty() {
                        let list = solution.abbreviations.join(", ");
                        self.say("msg.abbreviations", &[("list", list)])?;
                    }
                    Ok(())
                }
            },
            QuizEvent::Skipped(solution) => {
                let key = match self.playing_mode() {
                    Some(GameMode::Capitals(QuizType::Country)) => "msg.skipped_capital_country",
                    Some(GameMode::Capitals(QuizType::Capital)) => "msg.skipped_capital_name",
                    _ => "msg.skipped_flag",
                };
                self.say(
                    key,
                    &[
                        ("country", solution.country.clone()),
                        ("capital", solution.capital.clone()),
                    ],
                )
            }
            QuizEvent::RetryRound { count } => {
                self.say("msg.round_extra", &[("count", count.to_string())])
            }
            QuizEvent::Completed(completion) => {
                let time = completion.elapsed_secs.to_string();
                if completion.perfect {
                    self.say("msg.congrats_all", &[("time", time)])
                } else {
                    self.say(
                        "msg.congrats_completed",
                        &[
                            ("score", completion.score.to_string()),
                            ("total", completion.total.to_string()),
                            ("max_score", completion.best_score.to_string()),
                            ("time", time),
                        ],
                    )
                }
            }
            QuizEvent::Resumed { score, total } => self.say(
                "msg.resumed",
                &[("score", score.to_string()), ("total", total.to_string())],
            ),
        }
    }

    fn playing_mode(&self) -> Option<GameMode> {
        match self.session.screen() {
            Screen::Playing { key } => Some(key.mode),
            _ => None,
        }
    }
}

/// Regional-indicator pair for a two-letter ISO code, or a white flag when
/// the code is unusable.
pub fn flag_emoji(iso_code: &str) -> String {
    const REGIONAL_A: u32 = 0x1F1E6;
    if iso_code.len() != 2 || !iso_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return "\u{1F3F3}".to_string();
    }
    iso_code
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter_map(|c| char::from_u32(REGIONAL_A + (c as u32 - 'A' as u32)))
        .collect()
}

fn progress_label(progress: Option<(u32, u32)>) -> String {
    progress.map_or_else(String::new, |(score, total)| format!("({score}/{total})"))
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = config::settings_from_env();
    tracing::info!(
        language = %settings.language,
        data_dir = %settings.data_dir.display(),
        "starting quiz"
    );

    let retry_delay = settings.retry_delay().to_std().unwrap_or_default();
    let source = DirSource::new(settings.data_dir.clone());
    let session = QuizSession::new(
        Box::new(source),
        MatchEngine::new(AnswerRules::builtin()),
        ProgressStore::new(),
        settings,
        rand::thread_rng(),
    );
    if session.catalog().is_empty() {
        tracing::warn!("catalog is empty, every round will be unavailable");
    }

    let stdout = io::stdout();
    let mut terminal = Terminal::new(session, stdout.lock());
    terminal.show_screen()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if terminal.handle_line(&line, Utc::now())? == Flow::Quit {
            break;
        }
        if terminal.session().retry_pending() {
            std::thread::sleep(retry_delay);
            terminal.tick(Utc::now())?;
        }
        terminal.out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use geoquiz_core::{Continent, MemorySource, QuizSettings, Region};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ES: &str = "\
España,Madrid,Europa,ES
Francia,París,Europa,FR
";

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn terminal() -> Terminal<StdRng, Vec<u8>> {
        let settings = QuizSettings {
            retry_delay_ms: 0,
            ..QuizSettings::default()
        };
        let session = QuizSession::new(
            Box::new(MemorySource::new().with(Language::Es, ES)),
            MatchEngine::new(AnswerRules::builtin()),
            ProgressStore::new(),
            settings,
            StdRng::seed_from_u64(1),
        );
        Terminal::new(session, Vec::new())
    }

    fn output(terminal: Terminal<StdRng, Vec<u8>>) -> String {
        String::from_utf8(terminal.into_output()).unwrap()
    }

    #[test]
    fn test_menu_navigation_starts_flags_round() {
        let mut terminal = terminal();
        assert_eq!(terminal.handle_line("1", t0()).unwrap(), Flow::Continue);
        assert_eq!(terminal.handle_line("1", t0()).unwrap(), Flow::Continue);
        assert!(terminal.session().current_prompt().is_some());
        assert!(output(terminal).contains("¿De qué país es la bandera"));
    }

    #[test]
    fn test_full_round_returns_to_mode_menu() {
        let mut terminal = terminal();
        terminal.handle_line("1", t0()).unwrap();
        terminal.handle_line("1", t0()).unwrap();
        for _ in 0..2 {
            let country = terminal.session().current_prompt().unwrap().country;
            terminal.handle_line(&country, t0()).unwrap();
        }
        assert!(matches!(terminal.session().screen(), Screen::ModeSelect { .. }));
        let text = output(terminal);
        assert!(text.contains("¡Correcto!"));
        assert!(text.contains("¡Perfecto!"));
    }

    #[test]
    fn test_skip_shows_the_answer() {
        let mut terminal = terminal();
        terminal.handle_line("1", t0()).unwrap();
        terminal.handle_line("1", t0()).unwrap();
        let country = terminal.session().current_prompt().unwrap().country;
        terminal.handle_line(":skip", t0()).unwrap();
        assert!(output(terminal).contains(&format!("Saltado: era {country}")));
    }

    #[test]
    fn test_flag_prompt_hides_the_iso_code() {
        let mut terminal = terminal();
        terminal.handle_line("1", t0()).unwrap();
        terminal.handle_line("1", t0()).unwrap();
        let prompt = terminal.session().current_prompt().unwrap();
        let flag = flag_emoji(&prompt.iso_code);
        let text = output(terminal);
        assert!(text.contains(&format!("bandera {flag}?")));
        assert!(!text.contains(&format!("bandera {}?", prompt.iso_code)));
    }

    #[test]
    fn test_flag_emoji_from_iso_code() {
        assert_eq!(flag_emoji("ES"), "\u{1F1EA}\u{1F1F8}");
        assert_eq!(flag_emoji("gb"), "\u{1F1EC}\u{1F1E7}");
        assert_eq!(flag_emoji(""), "\u{1F3F3}");
        assert_eq!(flag_emoji("E1"), "\u{1F3F3}");
    }

    #[test]
    fn test_back_from_first_screen_quits() {
        let mut terminal = terminal();
        assert_eq!(terminal.handle_line(":back", t0()).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_language_command_switches_messages() {
        let mut terminal = terminal();
        terminal.handle_line(":lang en", t0()).unwrap();
        assert_eq!(terminal.session().language(), Language::En);
        assert!(output(terminal).contains("Language: EN"));
    }

    #[test]
    fn test_progress_command_prints_json() {
        let mut terminal = terminal();
        terminal.handle_line("1", t0()).unwrap();
        terminal.handle_line("1", t0()).unwrap();
        terminal.handle_line(":progress", t0()).unwrap();
        let text = output(terminal);
        assert!(text.contains("\"phase\": \"full\""));
    }

    #[test]
    fn test_unknown_menu_choice_is_invalid() {
        let mut terminal = terminal();
        terminal.handle_line("9", t0()).unwrap();
        assert_eq!(terminal.session().screen(), Screen::RegionSelect);
        assert!(output(terminal).contains("Opción no válida."));
    }

    #[test]
    fn test_continent_menu_lists_loaded_continents() {
        let mut terminal = terminal();
        terminal.handle_line("2", t0()).unwrap();
        terminal.handle_line("1", t0()).unwrap();
        assert_eq!(
            terminal.session().screen(),
            Screen::ModeSelect {
                region: Region::Continent(Continent::Europe)
            }
        );
    }
}
