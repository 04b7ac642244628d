// Library interface for llm-hangman
// This allows integration tests to access internal modules

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod game_state;
pub mod generator;
pub mod hint;
pub mod hosted;
pub mod local;
pub mod logging;
pub mod session;
pub mod tui;

// Re-export commonly used items for easier testing
pub use config::Config;
pub use error::HangmanError;
pub use extractor::{extract_word, query_word};
pub use game_state::{GameState, GameStatus, GuessOutcome, MAX_TRIES};
pub use generator::{Backend, DecodingConfig, GenerationError, TextGenerator};
pub use hint::{query_hint, sanitize_hint};
pub use session::{GameInterface, Session, Settings, UserAction, game_loop};
