use crate::config::{Config, find_category};
use crate::error::HangmanError;
use crate::extractor::query_word;
use crate::game_state::{GameState, GameStatus, GuessOutcome};
use crate::generator::{DecodingConfig, TextGenerator};
use crate::hint::query_hint;

/// What a session needs from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub categories: Vec<String>,
    pub max_tries: usize,
    pub max_attempts: usize,
    pub decoding: DecodingConfig,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            categories: config.categories.clone(),
            max_tries: config.max_tries,
            max_attempts: config.extraction.max_attempts,
            decoding: config.generation.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// One player's game plus the generator that feeds it.
pub struct Session<G: TextGenerator> {
    generator: G,
    settings: Settings,
    state: GameState,
}

impl<G: TextGenerator> Session<G> {
    pub fn new(generator: G, settings: Settings) -> Self {
        Self {
            generator,
            settings,
            state: GameState::default(),
        }
    }

    /// Fetches a word and hint and replaces the current game. On error the
    /// current game is left as it was.
    pub fn start(&mut self, category: &str) -> Result<(), HangmanError> {
        let category = find_category(&self.settings.categories, category)
            .map(str::to_string)
            .ok_or_else(|| HangmanError::UnknownCategory(category.to_string()))?;

        let word = query_word(
            &mut self.generator,
            &category,
            &self.settings.decoding,
            self.settings.max_attempts,
        )?;
        let hint = query_hint(&mut self.generator, &word, &self.settings.decoding)?;
        self.state = GameState::new(word, hint);
        log::info!("New game started in category '{category}'");
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state.reset();
        log::info!("Game reset");
    }

    pub fn guess(&mut self, letter: &str) -> GuessOutcome {
        self.state.guess(letter)
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.state.status(self.settings.max_tries)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Start(String),
    Reset,
    Guess(String),
    Exit,
}

/// A front end the game loop can drive.
pub trait GameInterface {
    /// Next action, or `None` if the input was not usable.
    fn choose_action(&mut self, categories: &[String]) -> Option<UserAction>;
    fn display_generating(&mut self, category: &str);
    fn display_board(&mut self, state: &GameState, max_tries: usize);
    fn display_outcome(&mut self, letter: &str, outcome: GuessOutcome);
    fn display_won(&mut self, word: &str);
    fn display_lost(&mut self, word: &str);
    fn display_error(&mut self, message: &str);
    fn display_exit_message(&mut self);
}

pub fn game_loop<G, I>(session: &mut Session<G>, interface: &mut I)
where
    G: TextGenerator,
    I: GameInterface + ?Sized,
{
    loop {
        let Some(action) = interface.choose_action(&session.settings.categories) else {
            continue;
        };
        log::debug!("Action: {action:?}");

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::Reset => {
                session.reset();
                interface.display_board(session.state(), session.settings.max_tries);
            }
            UserAction::Start(category) => {
                interface.display_generating(&category);
                match session.start(&category) {
                    Ok(()) => interface.display_board(session.state(), session.settings.max_tries),
                    Err(e) => {
                        log::error!("Could not start a game: {e}");
                        interface.display_error(&e.to_string());
                    }
                }
            }
            UserAction::Guess(letter) => match session.status() {
                GameStatus::Idle => {
                    interface.display_error("No game in progress. Start one first.");
                }
                GameStatus::Won | GameStatus::Lost => {
                    interface.display_error("This game is over. Start a new one or reset.");
                }
                GameStatus::InProgress => {
                    let outcome = session.guess(&letter);
                    interface.display_outcome(&letter, outcome);
                    interface.display_board(session.state(), session.settings.max_tries);
                    match session.status() {
                        GameStatus::Won => interface.display_won(&session.state.word),
                        GameStatus::Lost => interface.display_lost(&session.state.word),
                        GameStatus::Idle | GameStatus::InProgress => {}
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationError;

    /// Records everything the loop reports and replays scripted actions.
    struct Recorder {
        actions: Vec<UserAction>,
        events: Vec<String>,
    }

    impl Recorder {
        fn new(actions: Vec<UserAction>) -> Self {
            let mut actions = actions;
            actions.reverse();
            Self {
                actions,
                events: Vec::new(),
            }
        }
    }

    impl GameInterface for Recorder {
        fn choose_action(&mut self, _categories: &[String]) -> Option<UserAction> {
            Some(self.actions.pop().unwrap_or(UserAction::Exit))
        }
        fn display_generating(&mut self, category: &str) {
            self.events.push(format!("generating {category}"));
        }
        fn display_board(&mut self, state: &GameState, _max_tries: usize) {
            self.events.push(format!("board {}", state.masked_word));
        }
        fn display_outcome(&mut self, letter: &str, outcome: GuessOutcome) {
            self.events.push(format!("{letter} {outcome:?}"));
        }
        fn display_won(&mut self, word: &str) {
            self.events.push(format!("won {word}"));
        }
        fn display_lost(&mut self, word: &str) {
            self.events.push(format!("lost {word}"));
        }
        fn display_error(&mut self, message: &str) {
            self.events.push(format!("error {message}"));
        }
        fn display_exit_message(&mut self) {
            self.events.push("exit".to_string());
        }
    }

    fn fixed_generator(
        word_reply: &'static str,
        hint_reply: &'static str,
    ) -> impl FnMut(&str, &DecodingConfig) -> Result<String, GenerationError> {
        move |prompt, _| {
            if prompt.starts_with("Name") {
                Ok(word_reply.to_string())
            } else {
                Ok(hint_reply.to_string())
            }
        }
    }

    fn guess(letter: &str) -> UserAction {
        UserAction::Guess(letter.to_string())
    }

    #[test]
    fn test_start_populates_state() {
        let mut session = Session::new(
            fixed_generator("Sure: *Elephant*", "A large Elephant-like mammal."),
            Settings::default(),
        );
        session.start("animal").unwrap();
        let state = session.state();
        assert_eq!(state.word, "elephant");
        assert_eq!(state.hint, "A large ***-like mammal.");
        assert_eq!(state.masked_word, "________");
        assert_eq!(session.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_start_rejects_unknown_category() {
        let mut session = Session::new(fixed_generator("*x*", ""), Settings::default());
        assert!(matches!(
            session.start("Planet"),
            Err(HangmanError::UnknownCategory(c)) if c == "Planet"
        ));
        assert_eq!(*session.state(), GameState::default());
    }

    #[test]
    fn test_failed_start_keeps_previous_game() {
        let mut calls = 0;
        let generator = move |prompt: &str, _: &DecodingConfig| -> Result<String, GenerationError> {
            calls += 1;
            match (calls, prompt.starts_with("Name")) {
                (1, true) => Ok("*Otter*".to_string()),
                (2, false) => Ok("Swims.".to_string()),
                _ => Err(GenerationError::EmptyResponse),
            }
        };
        let mut session = Session::new(generator, Settings::default());
        session.start("Animal").unwrap();
        session.guess("o");
        let before = session.state().clone();
        assert!(session.start("Animal").is_err());
        assert_eq!(*session.state(), before);
    }

    #[test]
    fn test_loop_plays_to_a_win() {
        let mut session = Session::new(fixed_generator("\"Ox\"", "Pulls carts."), Settings::default());
        let mut ui = Recorder::new(vec![
            UserAction::Start("Animal".to_string()),
            guess("o"),
            guess("z"),
            guess("x"),
            guess("q"),
        ]);
        game_loop(&mut session, &mut ui);
        assert_eq!(
            ui.events,
            vec![
                "generating Animal",
                "board __",
                "o Correct",
                "board o_",
                "z Missed",
                "board o_",
                "x Correct",
                "board ox",
                "won ox",
                "error This game is over. Start a new one or reset.",
                "exit",
            ]
        );
    }

    #[test]
    fn test_loop_plays_to_a_loss() {
        let settings = Settings {
            max_tries: 2,
            ..Settings::default()
        };
        let mut session = Session::new(fixed_generator("*Cat*", "Meows."), settings);
        let mut ui = Recorder::new(vec![
            UserAction::Start("Animal".to_string()),
            guess("z"),
            guess("z"),
            guess("y"),
        ]);
        game_loop(&mut session, &mut ui);
        assert!(ui.events.contains(&"z Repeated".to_string()));
        assert!(ui.events.contains(&"lost cat".to_string()));
        assert_eq!(session.state().missed_letters, vec!["z", "y"]);
    }

    #[test]
    fn test_loop_guess_without_game_and_reset() {
        let mut session = Session::new(fixed_generator("*Cat*", "Meows."), Settings::default());
        let mut ui = Recorder::new(vec![
            guess("a"),
            UserAction::Start("Animal".to_string()),
            guess("a"),
            UserAction::Reset,
        ]);
        game_loop(&mut session, &mut ui);
        assert_eq!(ui.events[0], "error No game in progress. Start one first.");
        assert_eq!(*session.state(), GameState::default());
        assert_eq!(session.status(), GameStatus::Idle);
    }

    #[test]
    fn test_loop_reports_extraction_failure() {
        let settings = Settings {
            max_attempts: 2,
            ..Settings::default()
        };
        let mut session = Session::new(fixed_generator("no markers", ""), settings);
        let mut ui = Recorder::new(vec![UserAction::Start("Food".to_string())]);
        game_loop(&mut session, &mut ui);
        assert_eq!(
            ui.events,
            vec![
                "generating Food",
                "error no word could be extracted for category 'Food' after 2 attempt(s)",
                "exit",
            ]
        );
    }
}
