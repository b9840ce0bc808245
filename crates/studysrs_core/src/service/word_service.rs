//! Vocabulary use-case service.
//!
//! # Invariants
//! - `create` rejects an existing `(word, reading)` pair with
//!   `DuplicateEntry`.
//! - Missing or blank input, unknown ids and non-matching or ambiguous
//!   probes yield `Ok(None)`.

use crate::model::dto::WordDto;
use crate::model::identity::{Identity, RecordId};
use crate::model::word::Word;
use crate::repo::word_repo::{WordProbe, WordRepository};
use crate::repo::RepoError;
use crate::search::meaning::{MeaningFilter, MeaningFilterError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type WordServiceResult<T> = Result<T, WordServiceError>;

#[derive(Debug)]
pub enum WordServiceError {
    DuplicateEntry { word: String, reading: String },
    InvalidMeaningTerm(MeaningFilterError),
    Repo(RepoError),
}

impl Display for WordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEntry { word, reading } => {
                write!(f, "word `{word}` with reading `{reading}` already saved")
            }
            Self::InvalidMeaningTerm(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateEntry { .. } => None,
            Self::InvalidMeaningTerm(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for WordServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<MeaningFilterError> for WordServiceError {
    fn from(value: MeaningFilterError) -> Self {
        Self::InvalidMeaningTerm(value)
    }
}

/// Word service facade over repository implementations.
pub struct WordService<R: WordRepository> {
    repo: R,
}

impl<R: WordRepository> WordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_by_id(&self, id: RecordId) -> WordServiceResult<Option<WordDto>> {
        Ok(self.repo.get_word(id)?.map(WordDto::from))
    }

    /// All homographs written as `word`.
    pub fn find_all_by_word(&self, word: &str) -> WordServiceResult<Vec<WordDto>> {
        Ok(to_dtos(self.repo.find_all_by_word(word)?))
    }

    /// All homophones read as `reading`.
    pub fn find_all_by_reading(&self, reading: &str) -> WordServiceResult<Vec<WordDto>> {
        Ok(to_dtos(self.repo.find_all_by_reading(reading)?))
    }

    pub fn find_all_by_meaning_term(&self, term: &str) -> WordServiceResult<Vec<WordDto>> {
        let Some(filter) = MeaningFilter::new(term)? else {
            return Ok(Vec::new());
        };
        Ok(to_dtos(self.repo.find_all_by_meaning_regex(filter.pattern())?))
    }

    pub fn find_all(&self) -> WordServiceResult<Vec<WordDto>> {
        Ok(to_dtos(self.repo.list_words()?))
    }

    /// Saves a new word. `Ok(None)` when `word` or `reading` is missing or blank.
    pub fn create(&self, word: &WordDto) -> WordServiceResult<Option<WordDto>> {
        let Some(mut entity) = word.to_word() else {
            debug!("event=word_create module=service status=skip reason=incomplete_input");
            return Ok(None);
        };
        entity.identity = Identity::Unsaved;

        if self
            .repo
            .exists_by_word_and_reading(&entity.word, &entity.reading)?
        {
            warn!("event=word_create module=service status=error error_code=duplicate_entry");
            return Err(duplicate(&entity.word, &entity.reading));
        }

        let saved = match self.repo.save_word(&entity) {
            Ok(saved) => saved,
            Err(RepoError::UniqueViolation(_)) => {
                return Err(duplicate(&entity.word, &entity.reading));
            }
            Err(err) => return Err(err.into()),
        };
        info!("event=word_create module=service status=ok id={}", saved.identity);
        Ok(Some(WordDto::from(&saved)))
    }

    /// Overwrites a stored word. `Ok(None)` for missing or blank key fields
    /// and unknown ids.
    ///
    /// Moving a word onto another entry's `(word, reading)` pair surfaces as
    /// `DuplicateEntry`.
    pub fn update(&self, word: &WordDto) -> WordServiceResult<Option<WordDto>> {
        let Some(id) = word.id else {
            return Ok(None);
        };
        let Some(entity) = word.to_word() else {
            return Ok(None);
        };
        if !self.repo.exists_word(id)? {
            debug!("event=word_update module=service status=skip reason=not_found id={id}");
            return Ok(None);
        }

        let saved = match self.repo.save_word(&entity) {
            Ok(saved) => saved,
            Err(RepoError::UniqueViolation(_)) => {
                return Err(duplicate(&entity.word, &entity.reading));
            }
            Err(err) => return Err(err.into()),
        };
        info!("event=word_update module=service status=ok id={id}");
        Ok(Some(WordDto::from(&saved)))
    }

    pub fn delete_by_id(&self, id: RecordId) -> WordServiceResult<Option<WordDto>> {
        let Some(existing) = self.repo.get_word(id)? else {
            return Ok(None);
        };
        self.repo.delete_word(id)?;
        info!("event=word_delete module=service status=ok id={id}");
        Ok(Some(WordDto::from(&existing)))
    }

    /// Deletes the one word matching the set fields of `word`.
    ///
    /// `Ok(None)` without deleting when no field was set or the example
    /// matches zero or several records.
    pub fn delete(&self, word: &WordDto) -> WordServiceResult<Option<WordDto>> {
        let probe = WordProbe::from(word);
        if probe.is_empty() || !self.repo.exists_matching(&probe)? {
            debug!("event=word_delete module=service status=skip reason=no_match");
            return Ok(None);
        }

        let mut matches = self.repo.find_matching(&probe)?;
        if matches.len() > 1 {
            debug!(
                "event=word_delete module=service status=skip reason=ambiguous matched={}",
                matches.len()
            );
            return Ok(None);
        }
        let Some(found) = matches.pop() else {
            return Ok(None);
        };
        let Some(id) = found.id() else {
            return Ok(None);
        };

        self.repo.delete_word(id)?;
        info!("event=word_delete module=service status=ok id={id}");
        Ok(Some(WordDto::from(&found)))
    }
}

fn duplicate(word: &str, reading: &str) -> WordServiceError {
    WordServiceError::DuplicateEntry {
        word: word.to_string(),
        reading: reading.to_string(),
    }
}

fn to_dtos(words: Vec<Word>) -> Vec<WordDto> {
    words.into_iter().map(WordDto::from).collect()
}
