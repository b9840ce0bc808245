//! Store-assigned record identity.
//!
//! # Invariants
//! - A record is `Unsaved` until its first successful persist.
//! - A `Saved` id is never reassigned for the lifetime of the record.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Sequential integer id assigned by the datastore.
pub type RecordId = i64;

/// Persistence state of a record.
///
/// "Has no id yet" is a state of its own, so ordering decisions that depend
/// on identity are pattern matches instead of null checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Identity {
    /// Not yet written to the datastore.
    #[default]
    Unsaved,
    /// Written at least once; carries the store-assigned id.
    Saved(RecordId),
}

impl Identity {
    /// Returns the assigned id, if any.
    pub fn id(self) -> Option<RecordId> {
        match self {
            Self::Unsaved => None,
            Self::Saved(id) => Some(id),
        }
    }

    pub fn is_saved(self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

impl From<Option<RecordId>> for Identity {
    fn from(value: Option<RecordId>) -> Self {
        match value {
            Some(id) => Self::Saved(id),
            None => Self::Unsaved,
        }
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsaved => write!(f, "unsaved"),
            Self::Saved(id) => write!(f, "{id}"),
        }
    }
}
