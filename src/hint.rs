use crate::error::HangmanError;
use crate::generator::{DecodingConfig, TextGenerator};
use regex::{NoExpand, RegexBuilder};

pub const REDACTION_MARKER: &str = "***";

#[must_use]
pub fn hint_prompt(word: &str) -> String {
    format!("Describe the word '{word}' without mentioning it.")
}

/// Replaces every case-insensitive occurrence of `word` with the marker.
/// Only the literal word is caught; plurals stay plural (`Lions` becomes `***s`).
#[must_use]
pub fn sanitize_hint(hint: &str, word: &str) -> String {
    if word.is_empty() {
        return hint.to_string();
    }
    match RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern
            .replace_all(hint, NoExpand(REDACTION_MARKER))
            .into_owned(),
        Err(e) => {
            // An escaped literal only fails to build if it exceeds the size limit.
            log::warn!("Could not build redaction pattern for '{word}': {e}");
            hint.to_string()
        }
    }
}

pub fn query_hint<G: TextGenerator + ?Sized>(
    generator: &mut G,
    word: &str,
    config: &DecodingConfig,
) -> Result<String, HangmanError> {
    log::info!("Querying hint for word: '{word}'...");
    let response = generator.generate(&hint_prompt(word), config)?;
    log::debug!("Raw hint: {response:?}");
    let hint = sanitize_hint(&response, word);
    log::info!("Hint queried successfully");
    Ok(hint)
}
