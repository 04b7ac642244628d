use crate::config::{BackendKind, Overrides, find_category};
use crate::game_state::{GameState, GuessOutcome};
use crate::session::{GameInterface, UserAction};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Hangman with words and hints from a language model
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,

    /// Text generation backend
    #[arg(short = 'b', long = "backend", value_enum)]
    pub backend: Option<BackendKind>,

    /// Model name for the selected backend
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Wrong guesses allowed per game
    #[arg(long = "max-tries")]
    pub max_tries: Option<usize>,

    /// Generation attempts when looking for a word
    #[arg(long = "max-attempts")]
    pub max_attempts: Option<usize>,

    /// Start a game in this category right away (line mode only)
    #[arg(short = 's', long = "category")]
    pub category: Option<String>,

    /// Use the full-screen terminal UI
    #[arg(long = "tui")]
    pub tui: bool,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            backend: self.backend,
            model: self.model.clone(),
            max_tries: self.max_tries,
            max_attempts: self.max_attempts,
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

#[derive(Debug, PartialEq, Eq)]
pub enum CommandInput {
    Action(UserAction),
    ShowCategories,
    Invalid(String),
}

/// Interprets one input line. Anything that is not a command is a guess.
#[must_use]
pub fn parse_command(line: &str, categories: &[String]) -> CommandInput {
    let raw = line.trim_end_matches(['\r', '\n']);
    if raw.is_empty() {
        return CommandInput::Invalid("Enter a letter, or 'help' for commands.".to_string());
    }
    // Words can contain spaces, so a line of blanks guesses one space.
    if raw.trim().is_empty() {
        return CommandInput::Action(UserAction::Guess(" ".to_string()));
    }

    let input = raw.trim();
    let lower = input.to_lowercase();
    let mut parts = lower.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "exit" | "quit" => CommandInput::Action(UserAction::Exit),
        "reset" => CommandInput::Action(UserAction::Reset),
        "help" | "categories" => CommandInput::ShowCategories,
        "start" if argument.is_empty() => CommandInput::ShowCategories,
        "start" => match find_category(categories, argument) {
            Some(category) => CommandInput::Action(UserAction::Start(category.to_string())),
            None => CommandInput::Invalid(format!("Unknown category '{argument}'.")),
        },
        _ => CommandInput::Action(UserAction::Guess(lower)),
    }
}

pub fn display_categories(categories: &[String]) {
    println!("Categories:");
    for (i, category) in categories.iter().enumerate() {
        println!("{}. {}", i + 1, category);
    }
    println!("Commands: start <number|name>, reset, exit. Anything else is a guess.");
}

pub fn display_board(state: &GameState, max_tries: usize) {
    if !state.is_active() {
        println!("No game in progress.");
        return;
    }
    println!("Hint: {}", state.hint.trim());
    println!("Word: {}", state.masked_word);
    println!(
        "Missed letters (max {max_tries} tries): {}",
        state.missed_display()
    );
}

pub fn display_outcome(letter: &str, outcome: GuessOutcome) {
    match outcome {
        GuessOutcome::Correct => println!("'{letter}' is in the word."),
        GuessOutcome::Missed => println!("'{letter}' is not in the word."),
        GuessOutcome::Repeated => println!("You already guessed '{letter}'."),
        GuessOutcome::Ignored => println!("Guess ignored."),
    }
}

/// Line-oriented front end over any `BufRead`, so tests can script input.
pub struct CliInterface<R: BufRead> {
    reader: R,
    pending: Option<UserAction>,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
        }
    }

    /// Issue a start before reading any input.
    #[must_use]
    pub fn with_start(mut self, category: impl Into<String>) -> Self {
        self.pending = Some(UserAction::Start(category.into()));
        self
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn choose_action(&mut self, categories: &[String]) -> Option<UserAction> {
        if let Some(action) = self.pending.take() {
            return Some(action);
        }

        println!("\nEnter a letter (or 'start <category>', 'reset', 'exit'):");
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => return Some(UserAction::Exit),
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read input: {e}");
                return Some(UserAction::Exit);
            }
        }

        match parse_command(&line, categories) {
            CommandInput::Action(action) => Some(action),
            CommandInput::ShowCategories => {
                display_categories(categories);
                None
            }
            CommandInput::Invalid(message) => {
                println!("{message}");
                None
            }
        }
    }

    fn display_generating(&mut self, category: &str) {
        println!("Asking the model for a {category}, please wait...");
    }

    fn display_board(&mut self, state: &GameState, max_tries: usize) {
        display_board(state, max_tries);
    }

    fn display_outcome(&mut self, letter: &str, outcome: GuessOutcome) {
        display_outcome(letter, outcome);
    }

    fn display_won(&mut self, word: &str) {
        println!("You won! The word was '{word}'.");
    }

    fn display_lost(&mut self, word: &str) {
        println!("You lost, the correct word was '{word}'");
    }

    fn display_error(&mut self, message: &str) {
        println!("Error: {message}");
    }

    fn display_exit_message(&mut self) {
        println!("Exiting.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CATEGORIES;
    use std::io::Cursor;

    fn categories() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| (*c).to_string()).collect()
    }

    fn action(line: &str) -> CommandInput {
        parse_command(line, &categories())
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["llm-hangman"]);
        assert!(cli.config_path.is_none());
        assert!(cli.backend.is_none());
        assert!(!cli.tui);
        let overrides = cli.overrides();
        assert!(overrides.max_tries.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "llm-hangman",
            "--config",
            "/tmp/hangman.toml",
            "--backend",
            "local",
            "-m",
            "gemma:7b",
            "--max-tries",
            "8",
            "--max-attempts",
            "3",
            "--category",
            "animal",
            "--tui",
        ]);
        assert_eq!(cli.config_path, Some(PathBuf::from("/tmp/hangman.toml")));
        assert_eq!(cli.backend, Some(BackendKind::Local));
        assert_eq!(cli.category.as_deref(), Some("animal"));
        assert!(cli.tui);
        let overrides = cli.overrides();
        assert_eq!(overrides.model.as_deref(), Some("gemma:7b"));
        assert_eq!(overrides.max_tries, Some(8));
        assert_eq!(overrides.max_attempts, Some(3));
    }

    #[test]
    fn test_cli_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["llm-hangman", "--backend", "cloud"]).is_err());
    }

    #[test]
    fn test_parse_guess_is_lowercased() {
        assert_eq!(action("E\n"), CommandInput::Action(UserAction::Guess("e".into())));
        assert_eq!(action("  a  \n"), CommandInput::Action(UserAction::Guess("a".into())));
    }

    #[test]
    fn test_parse_space_guess() {
        assert_eq!(action("  \n"), CommandInput::Action(UserAction::Guess(" ".into())));
    }

    #[test]
    fn test_parse_empty_line_is_invalid() {
        assert!(matches!(action("\n"), CommandInput::Invalid(_)));
        assert!(matches!(action("\r\n"), CommandInput::Invalid(_)));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(action("exit\n"), CommandInput::Action(UserAction::Exit));
        assert_eq!(action("QUIT"), CommandInput::Action(UserAction::Exit));
        assert_eq!(action("reset\n"), CommandInput::Action(UserAction::Reset));
        assert_eq!(action("help\n"), CommandInput::ShowCategories);
        assert_eq!(action("start\n"), CommandInput::ShowCategories);
    }

    #[test]
    fn test_parse_start_by_name_or_number() {
        assert_eq!(
            action("start animal\n"),
            CommandInput::Action(UserAction::Start("Animal".into()))
        );
        assert_eq!(
            action("START movie character\n"),
            CommandInput::Action(UserAction::Start("Movie Character".into()))
        );
        assert_eq!(
            action("start 1\n"),
            CommandInput::Action(UserAction::Start("Country".into()))
        );
        assert!(matches!(action("start planet\n"), CommandInput::Invalid(_)));
        assert!(matches!(action("start 99\n"), CommandInput::Invalid(_)));
    }

    #[test]
    fn test_interface_reads_actions_in_order() {
        let mut ui = CliInterface::new(Cursor::new("start food\nx\nhelp\nreset\n"));
        let cats = categories();
        assert_eq!(ui.choose_action(&cats), Some(UserAction::Start("Food".into())));
        assert_eq!(ui.choose_action(&cats), Some(UserAction::Guess("x".into())));
        assert_eq!(ui.choose_action(&cats), None);
        assert_eq!(ui.choose_action(&cats), Some(UserAction::Reset));
    }

    #[test]
    fn test_interface_exits_at_end_of_input() {
        let mut ui = CliInterface::new(Cursor::new(""));
        assert_eq!(ui.choose_action(&categories()), Some(UserAction::Exit));
    }

    #[test]
    fn test_with_start_comes_first() {
        let mut ui = CliInterface::new(Cursor::new("e\n")).with_start("Animal");
        let cats = categories();
        assert_eq!(ui.choose_action(&cats), Some(UserAction::Start("Animal".into())));
        assert_eq!(ui.choose_action(&cats), Some(UserAction::Guess("e".into())));
        assert_eq!(ui.choose_action(&cats), Some(UserAction::Exit));
    }
}
