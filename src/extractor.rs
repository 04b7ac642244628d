//! Pulls a single word out of free-form model output.

use crate::error::HangmanError;
use crate::generator::{DecodingConfig, TextGenerator};
use lazy_regex::{Regex, regex};

/// Where the model is expected to put the word, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// `*word*`
    Asterisks,
    /// `"word"`
    DoubleQuotes,
}

pub const RULES: [ExtractionRule; 2] = [ExtractionRule::Asterisks, ExtractionRule::DoubleQuotes];

impl ExtractionRule {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Asterisks => regex!(r"\*[^*\n]*\*"),
            Self::DoubleQuotes => regex!(r#""[^"\n]*""#),
        }
    }

    /// Text between each pair of consecutive delimiters on a line. A closing
    /// delimiter also opens the next match, so `*a* b *c*` yields `a`, ` b `
    /// and `c`. Empty matches are dropped.
    #[must_use]
    pub fn matches(self, text: &str) -> Vec<&str> {
        let pattern = self.pattern();
        let mut found = Vec::new();
        let mut start = 0;
        while let Some(m) = pattern.find_at(text, start) {
            // Delimiters are one byte, so these slices stay on char boundaries.
            let inner = &text[m.start() + 1..m.end() - 1];
            if !inner.is_empty() {
                found.push(inner);
            }
            start = m.end() - 1;
        }
        found
    }
}

/// Strips ASCII punctuation, lowercases and trims a raw match.
#[must_use]
pub fn clean_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Cleaned last match of the first rule that matches at all. A match that
/// cleans down to nothing is a failed parse, not a cue to try later rules.
#[must_use]
pub fn extract_word(text: &str) -> Option<String> {
    let raw = RULES.iter().find_map(|rule| rule.matches(text).last().copied())?;
    let candidate = clean_word(raw);
    (!candidate.is_empty()).then_some(candidate)
}

#[must_use]
pub fn word_prompt(category: &str) -> String {
    format!("Name a single existing {category}.")
}

/// Asks the model for a word in `category`, regenerating until a word can be
/// extracted or `max_attempts` calls have been made.
pub fn query_word<G: TextGenerator + ?Sized>(
    generator: &mut G,
    category: &str,
    config: &DecodingConfig,
    max_attempts: usize,
) -> Result<String, HangmanError> {
    log::info!("Querying word for category: '{category}'...");
    let prompt = word_prompt(category);

    for attempt in 1..=max_attempts {
        let response = generator.generate(&prompt, config)?;
        log::debug!("Attempt {attempt}/{max_attempts} raw response: {response:?}");
        if let Some(word) = extract_word(&response) {
            log::info!("Word queried successfully after {attempt} attempt(s)");
            return Ok(word);
        }
        log::warn!("No word found in response (attempt {attempt}/{max_attempts})");
    }

    Err(HangmanError::ExtractionFailed {
        category: category.to_string(),
        attempts: max_attempts,
    })
}
