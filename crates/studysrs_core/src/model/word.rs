//! Vocabulary word model.
//!
//! # Invariants
//! - `(word, reading)` is unique across all words (enforced by storage).
//! - `word` alone and `reading` alone are not unique.

use crate::model::identity::{Identity, RecordId};
use crate::model::validation::{require_text, split_meaning, ValidationError};

/// A vocabulary entry: surface form, reading and slash-delimited meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub identity: Identity,
    pub word: String,
    pub reading: String,
    pub meaning: String,
}

impl Word {
    pub fn new(
        word: impl Into<String>,
        reading: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            identity: Identity::Unsaved,
            word: word.into(),
            reading: reading.into(),
            meaning: meaning.into(),
        }
    }

    pub fn with_id(
        id: RecordId,
        word: impl Into<String>,
        reading: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(word, reading, meaning);
        entry.identity = Identity::Saved(id);
        entry
    }

    pub fn id(&self) -> Option<RecordId> {
        self.identity.id()
    }

    pub fn meaning_terms(&self) -> Vec<&str> {
        split_meaning(&self.meaning)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("word", &self.word)?;
        require_text("reading", &self.reading)?;
        Ok(())
    }
}
