//! Text generation capability shared by the word and hint queries.
//!
//! The game only needs "prompt in, text out". Anything that can do that,
//! a hosted model, a local model server or a plain closure in a test,
//! implements [`TextGenerator`].

use crate::config::{BackendConfig, BackendKind};
use crate::hosted::HostedGenerator;
use crate::local::LocalGenerator;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Sampling controls passed along with every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingConfig {
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f32,
    pub temperature: f32,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 256,
            top_k: 40,
            top_p: 0.95,
            temperature: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to model backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model backend returned no text")]
    EmptyResponse,

    #[error("model backend sent an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),
}

pub trait TextGenerator {
    fn generate(&mut self, prompt: &str, config: &DecodingConfig)
    -> Result<String, GenerationError>;
}

impl<F> TextGenerator for F
where
    F: FnMut(&str, &DecodingConfig) -> Result<String, GenerationError>,
{
    fn generate(
        &mut self,
        prompt: &str,
        config: &DecodingConfig,
    ) -> Result<String, GenerationError> {
        self(prompt, config)
    }
}

/// The configured provider.
pub enum Backend {
    Hosted(HostedGenerator),
    Local(LocalGenerator),
}

impl Backend {
    pub fn from_config(config: &BackendConfig) -> Result<Self, GenerationError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        match config.kind {
            BackendKind::Hosted => Ok(Self::Hosted(HostedGenerator::new(&config.hosted, timeout)?)),
            BackendKind::Local => Ok(Self::Local(LocalGenerator::new(&config.local, timeout)?)),
        }
    }
}

impl TextGenerator for Backend {
    fn generate(
        &mut self,
        prompt: &str,
        config: &DecodingConfig,
    ) -> Result<String, GenerationError> {
        match self {
            Self::Hosted(generator) => generator.generate(prompt, config),
            Self::Local(generator) => generator.generate(prompt, config),
        }
    }
}

/// Reads a bearer token from the environment, if a variable name is configured.
pub(crate) fn token_from_env(var: Option<&str>) -> Result<Option<String>, GenerationError> {
    match var {
        None => Ok(None),
        Some(name) => std::env::var(name)
            .map(Some)
            .map_err(|_| GenerationError::MissingCredentials(name.to_string())),
    }
}
