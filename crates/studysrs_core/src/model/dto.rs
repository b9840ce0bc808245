//! Caller-facing transfer shapes and their entity mappings.
//!
//! # Responsibility
//! - Carry plain data between outer surfaces (CLI, future transports) and
//!   services without exposing relation internals.
//! - Allow partially specified input: every field is optional.
//!
//! # Invariants
//! - `KanjiDto::confusions` lists partner ids only, ascending.
//! - Mapping an entity to a DTO never fails.

use crate::model::identity::RecordId;
use crate::model::kanji::Kanji;
use crate::model::validation::non_blank;
use crate::model::word::Word;
use serde::{Deserialize, Serialize};

/// Plain-data view of a Kanji.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiDto {
    pub id: Option<RecordId>,
    pub character: Option<String>,
    pub meaning: Option<String>,
    pub confusions: Option<Vec<RecordId>>,
}

impl KanjiDto {
    pub fn new(character: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            id: None,
            character: Some(character.into()),
            meaning: Some(meaning.into()),
            confusions: None,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_confusions(mut self, confusions: Vec<RecordId>) -> Self {
        self.confusions = Some(confusions);
        self
    }

    /// Confusion ids requested by the caller, empty when absent.
    pub fn confusion_ids(&self) -> &[RecordId] {
        self.confusions.as_deref().unwrap_or(&[])
    }
}

impl From<&Kanji> for KanjiDto {
    fn from(value: &Kanji) -> Self {
        Self {
            id: value.id(),
            character: Some(value.character.clone()),
            meaning: Some(value.meaning.clone()),
            confusions: Some(value.confusion_ids()),
        }
    }
}

impl From<Kanji> for KanjiDto {
    fn from(value: Kanji) -> Self {
        Self::from(&value)
    }
}

/// Plain-data view of a vocabulary word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDto {
    pub id: Option<RecordId>,
    pub word: Option<String>,
    pub reading: Option<String>,
    pub meaning: Option<String>,
}

impl WordDto {
    pub fn new(
        word: impl Into<String>,
        reading: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            word: Some(word.into()),
            reading: Some(reading.into()),
            meaning: Some(meaning.into()),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Builds an entity when both key fields are present and not blank.
    ///
    /// A missing meaning maps to an empty string.
    pub fn to_word(&self) -> Option<Word> {
        let word = non_blank(self.word.as_deref())?;
        let reading = non_blank(self.reading.as_deref())?;
        let mut entry = Word::new(
            word,
            reading,
            self.meaning.clone().unwrap_or_default(),
        );
        entry.identity = self.id.into();
        Some(entry)
    }
}

impl From<&Word> for WordDto {
    fn from(value: &Word) -> Self {
        Self {
            id: value.id(),
            word: Some(value.word.clone()),
            reading: Some(value.reading.clone()),
            meaning: Some(value.meaning.clone()),
        }
    }
}

impl From<Word> for WordDto {
    fn from(value: Word) -> Self {
        Self::from(&value)
    }
}
