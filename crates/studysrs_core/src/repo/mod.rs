//! Repository layer: the datastore contract and its SQLite implementations.
//!
//! # Responsibility
//! - Define the lookup/exists/save/delete/regex-filter contract services use.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Saving an unsaved record assigns its id; a saved id is never changed.
//! - Reads return records in ascending id order.

use crate::db::DbError;
use crate::model::identity::RecordId;
use crate::model::validation::ValidationError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kanji_repo;
pub mod word_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(RecordId),
    /// A uniqueness constraint rejected the write.
    UniqueViolation(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::UniqueViolation(message) => write!(f, "unique constraint violated: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::UniqueViolation(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation
                    && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Self::UniqueViolation(message.unwrap_or_else(|| failure.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}
