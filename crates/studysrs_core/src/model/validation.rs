//! Record validation errors shared by Kanji and Word.

use crate::model::identity::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Invariant violation detected before a write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    BlankField(&'static str),
    /// A Kanji lists itself among its confusions.
    SelfConfusion(RecordId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::SelfConfusion(id) => write!(f, "kanji {id} cannot be confused with itself"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Treats whitespace-only input the same as absent input.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Splits a slash-delimited meaning into trimmed, non-empty terms.
pub fn split_meaning(meaning: &str) -> Vec<&str> {
    meaning
        .split('/')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .collect()
}
