//! TOML configuration.
//!
//! Every field has a default, but the hosted backend has no default
//! project: set `backend.hosted.project`, or select the local backend.
//! Values given on the command line are applied on top with
//! [`Config::apply_overrides`].

use crate::error::HangmanError;
use crate::game_state::MAX_TRIES;
use crate::generator::DecodingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "llm-hangman";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Country",
    "Animal",
    "Food",
    "Movie",
    "Movie Character",
    "Videogame",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub categories: Vec<String>,
    pub max_tries: usize,
    pub extraction: ExtractionConfig,
    pub generation: DecodingConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Generation calls made for one word before giving up.
    pub max_attempts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Hosted,
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub timeout_secs: u64,
    pub hosted: HostedConfig,
    pub local: LocalConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    pub project: String,
    pub location: String,
    pub model: String,
    pub token_env: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub base_url: String,
    pub model: String,
    /// Optional; local servers usually run without auth.
    pub token_env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
            max_tries: MAX_TRIES,
            extraction: ExtractionConfig::default(),
            generation: DecodingConfig::default(),
            backend: BackendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Hosted,
            timeout_secs: 60,
            hosted: HostedConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            location: "us-central1".to_string(),
            model: "gemini-1.0-pro".to_string(),
            token_env: "VERTEX_ACCESS_TOKEN".to_string(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gemma:2b".to_string(),
            token_env: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Values from the command line that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub backend: Option<BackendKind>,
    pub model: Option<String>,
    pub max_tries: Option<usize>,
    pub max_attempts: Option<usize>,
}

impl Config {
    pub fn from_toml_str(data: &str) -> Result<Self, HangmanError> {
        let config: Config = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, HangmanError> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    /// Loads `path` if given, else the per-user config file if it exists,
    /// else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, HangmanError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<(), HangmanError> {
        if let Some(kind) = overrides.backend {
            self.backend.kind = kind;
        }
        if let Some(model) = &overrides.model {
            match self.backend.kind {
                BackendKind::Hosted => self.backend.hosted.model.clone_from(model),
                BackendKind::Local => self.backend.local.model.clone_from(model),
            }
        }
        if let Some(max_tries) = overrides.max_tries {
            self.max_tries = max_tries;
        }
        if let Some(max_attempts) = overrides.max_attempts {
            self.extraction.max_attempts = max_attempts;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), HangmanError> {
        if self.categories.is_empty() {
            return Err(HangmanError::Config("at least one category is required".into()));
        }
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(HangmanError::Config("categories must not be blank".into()));
        }
        if self.max_tries == 0 {
            return Err(HangmanError::Config("max_tries must be at least 1".into()));
        }
        if self.extraction.max_attempts == 0 {
            return Err(HangmanError::Config(
                "extraction.max_attempts must be at least 1".into(),
            ));
        }
        let top_p = self.generation.top_p;
        if !(top_p > 0.0 && top_p <= 1.0) {
            return Err(HangmanError::Config(format!(
                "generation.top_p must be in (0, 1], got {top_p}"
            )));
        }
        if self.generation.temperature < 0.0 {
            return Err(HangmanError::Config(format!(
                "generation.temperature must not be negative, got {}",
                self.generation.temperature
            )));
        }
        if self.backend.kind == BackendKind::Hosted && self.backend.hosted.project.trim().is_empty() {
            return Err(HangmanError::Config(
                "backend.hosted.project must be set for the hosted backend (or use --backend local)"
                    .into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn find_category(&self, input: &str) -> Option<&str> {
        find_category(&self.categories, input)
    }
}

/// Case-insensitive lookup of a category by name or 1-based number.
#[must_use]
pub fn find_category<'a>(categories: &'a [String], input: &str) -> Option<&'a str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| categories.get(i))
            .map(String::as_str);
    }
    categories
        .iter()
        .find(|c| c.eq_ignore_ascii_case(input))
        .map(String::as_str)
}

#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[must_use]
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_is_the_only_required_value() {
        let config = Config::from_toml_str("[backend.hosted]\nproject = \"my-project\"\n").unwrap();
        let mut expected = Config::default();
        expected.backend.hosted.project = "my-project".to_string();
        assert_eq!(config, expected);
        assert_eq!(config.max_tries, 6);
        assert_eq!(config.categories.len(), 6);
        assert_eq!(config.backend.kind, BackendKind::Hosted);
    }

    #[test]
    fn test_hosted_backend_requires_project() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, HangmanError::Config(ref msg) if msg.contains("backend.hosted.project")));
        assert!(Config::from_toml_str("").is_err());
        assert!(Config::from_toml_str("[backend.hosted]\nproject = \"  \"\n").is_err());
    }

    #[test]
    fn test_local_backend_needs_no_project() {
        let config = Config::from_toml_str("[backend]\nkind = \"local\"\n").unwrap();
        assert!(config.backend.hosted.project.is_empty());

        let mut config = Config::default();
        let overrides = Overrides {
            backend: Some(BackendKind::Local),
            ..Overrides::default()
        };
        assert!(config.apply_overrides(&overrides).is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let data = r#"
max_tries = 8

[generation]
temperature = 0.2

[backend]
kind = "local"

[backend.local]
model = "gemma:7b"
"#;
        let config = Config::from_toml_str(data).unwrap();
        assert_eq!(config.max_tries, 8);
        assert!((config.generation.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.backend.kind, BackendKind::Local);
        assert_eq!(config.backend.local.model, "gemma:7b");
        assert_eq!(config.backend.local.base_url, "http://localhost:11434");
        assert_eq!(config.extraction.max_attempts, 5);
    }

    const LOCAL: &str = "[backend]\nkind = \"local\"\n";

    fn local_with(data: &str) -> Result<Config, HangmanError> {
        Config::from_toml_str(&format!("{data}\n{LOCAL}"))
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(local_with("").is_ok());
        assert!(local_with("categories = []").is_err());
        assert!(local_with("max_tries = 0").is_err());
        assert!(local_with("[extraction]\nmax_attempts = 0").is_err());
        assert!(local_with("[generation]\ntop_p = 1.5").is_err());
        assert!(local_with("[generation]\ntemperature = -1.0").is_err());
        assert!(matches!(local_with("max_tries = \"six\""), Err(HangmanError::Toml(_))));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config::default();
        let overrides = Overrides {
            backend: Some(BackendKind::Local),
            model: Some("llama3".to_string()),
            max_tries: Some(10),
            max_attempts: Some(2),
        };
        config.apply_overrides(&overrides).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Local);
        assert_eq!(config.backend.local.model, "llama3");
        assert_eq!(config.backend.hosted.model, "gemini-1.0-pro");
        assert_eq!(config.max_tries, 10);
        assert_eq!(config.extraction.max_attempts, 2);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = Config::default();
        let overrides = Overrides {
            backend: Some(BackendKind::Local),
            max_tries: Some(0),
            ..Overrides::default()
        };
        assert!(config.apply_overrides(&overrides).is_err());
    }

    #[test]
    fn test_find_category_by_name_and_number() {
        let config = Config::default();
        assert_eq!(config.find_category("animal"), Some("Animal"));
        assert_eq!(config.find_category("  MOVIE character "), Some("Movie Character"));
        assert_eq!(config.find_category("1"), Some("Country"));
        assert_eq!(config.find_category("6"), Some("Videogame"));
        assert_eq!(config.find_category("0"), None);
        assert_eq!(config.find_category("7"), None);
        assert_eq!(config.find_category("Planet"), None);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("llm_hangman_test_config.toml");
        fs::write(&path, "categories = [\"Bird\"]\n\n[backend]\nkind = \"local\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.categories, vec!["Bird".to_string()]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = std::env::temp_dir().join("llm_hangman_no_such_config.toml");
        let _ = fs::remove_file(&path);
        assert!(matches!(
            Config::load(Some(&path)),
            Err(HangmanError::Io(_))
        ));
    }
}
