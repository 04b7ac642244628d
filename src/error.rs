use crate::generator::GenerationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HangmanError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("no word could be extracted for category '{category}' after {attempts} attempt(s)")]
    ExtractionFailed { category: String, attempts: usize },

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
