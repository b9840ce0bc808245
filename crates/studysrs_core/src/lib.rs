//! Core domain logic for the kanji/vocabulary study corpus.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::confusion::{ConfusionPartner, ConfusionRelation, ConfusionSide};
pub use model::dto::{KanjiDto, WordDto};
pub use model::identity::{Identity, RecordId};
pub use model::kanji::Kanji;
pub use model::validation::ValidationError;
pub use model::word::Word;
pub use repo::kanji_repo::{KanjiProbe, KanjiRepository, SqliteKanjiRepository};
pub use repo::word_repo::{SqliteWordRepository, WordProbe, WordRepository};
pub use repo::{RepoError, RepoResult};
pub use search::meaning::{meaning_term_pattern, MeaningFilter, MeaningFilterError};
pub use service::kanji_service::{KanjiService, KanjiServiceError, KanjiServiceResult};
pub use service::word_service::{WordService, WordServiceError, WordServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
