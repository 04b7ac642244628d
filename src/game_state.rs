//! Hangman board state and the letter-guess update.

use std::collections::BTreeSet;

/// Wrong guesses allowed before the game is lost.
pub const MAX_TRIES: usize = 6;

pub const PLACEHOLDER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Missed,
    /// Already guessed; the state is unchanged.
    Repeated,
    /// Empty guess, or no game running.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    InProgress,
    Won,
    Lost,
}

/// One session's game. An empty `word` means no game is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub word: String,
    pub hint: String,
    pub masked_word: String,
    pub correct_letters: BTreeSet<String>,
    pub missed_letters: Vec<String>,
}

impl GameState {
    /// A fresh game: nothing revealed, no guesses.
    #[must_use]
    pub fn new(word: impl Into<String>, hint: impl Into<String>) -> Self {
        let word = word.into();
        let masked_word = word.chars().map(|_| PLACEHOLDER).collect();
        Self {
            word,
            hint: hint.into(),
            masked_word,
            correct_letters: BTreeSet::new(),
            missed_letters: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.word.is_empty()
    }

    /// Applies one guess. Membership is a substring test, so a longer
    /// guess can be correct without revealing anything.
    pub fn guess(&mut self, letter: &str) -> GuessOutcome {
        log::info!("Letter '{letter}' picked");
        if !self.is_active() || letter.is_empty() {
            return GuessOutcome::Ignored;
        }
        if self.correct_letters.contains(letter) || self.missed_letters.iter().any(|m| m == letter)
        {
            return GuessOutcome::Repeated;
        }

        let outcome = if self.word.contains(letter) {
            self.correct_letters.insert(letter.to_string());
            GuessOutcome::Correct
        } else {
            self.missed_letters.push(letter.to_string());
            GuessOutcome::Missed
        };
        self.masked_word = self.mask();
        log::debug!("Board updated: {} ({outcome:?})", self.masked_word);
        outcome
    }

    fn mask(&self) -> String {
        let mut buf = [0u8; 4];
        self.word
            .chars()
            .map(|c| {
                if self.correct_letters.contains(&*c.encode_utf8(&mut buf)) {
                    c
                } else {
                    PLACEHOLDER
                }
            })
            .collect()
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.is_active() && self.masked_word == self.word
    }

    #[must_use]
    pub fn is_lost(&self, max_tries: usize) -> bool {
        self.missed_letters.len() >= max_tries
    }

    /// Recomputed on every call; losing wins over winning if both hold.
    #[must_use]
    pub fn status(&self, max_tries: usize) -> GameStatus {
        if self.is_lost(max_tries) {
            GameStatus::Lost
        } else if self.is_won() {
            GameStatus::Won
        } else if self.is_active() {
            GameStatus::InProgress
        } else {
            GameStatus::Idle
        }
    }

    #[must_use]
    pub fn missed_display(&self) -> String {
        self.missed_letters.join(", ")
    }

    #[must_use]
    pub fn tries_left(&self, max_tries: usize) -> usize {
        max_tries.saturating_sub(self.missed_letters.len())
    }
}
