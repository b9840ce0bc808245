//! Kanji use-case service.
//!
//! # Responsibility
//! - Provide CRUD, lookup and meaning search entry points for Kanji.
//! - Resolve requested confusions against stored Kanji before saving.
//!
//! # Invariants
//! - `create*` reject an existing `character` with `DuplicateEntry`.
//! - Unknown confusion characters or ids are dropped silently.
//! - Missing or blank input, unknown ids and non-matching or ambiguous
//!   probes yield `Ok(None)`, never an error.
//! - Every returned record is the state read back from storage.

use crate::model::dto::KanjiDto;
use crate::model::identity::RecordId;
use crate::model::kanji::Kanji;
use crate::model::validation::non_blank;
use crate::repo::kanji_repo::{KanjiProbe, KanjiRepository};
use crate::repo::RepoError;
use crate::search::meaning::{MeaningFilter, MeaningFilterError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type KanjiServiceResult<T> = Result<T, KanjiServiceError>;

/// Service error for Kanji use-cases.
#[derive(Debug)]
pub enum KanjiServiceError {
    /// A Kanji with this character is already stored.
    DuplicateEntry(String),
    /// The meaning term could not be turned into a pattern.
    InvalidMeaningTerm(MeaningFilterError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for KanjiServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEntry(character) => {
                write!(f, "kanji `{character}` already saved")
            }
            Self::InvalidMeaningTerm(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for KanjiServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateEntry(_) => None,
            Self::InvalidMeaningTerm(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for KanjiServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<MeaningFilterError> for KanjiServiceError {
    fn from(value: MeaningFilterError) -> Self {
        Self::InvalidMeaningTerm(value)
    }
}

/// Kanji service facade over repository implementations.
pub struct KanjiService<R: KanjiRepository> {
    repo: R,
}

impl<R: KanjiRepository> KanjiService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_by_id(&self, id: RecordId) -> KanjiServiceResult<Option<KanjiDto>> {
        Ok(self.repo.get_kanji(id)?.map(KanjiDto::from))
    }

    pub fn find_by_character(&self, character: &str) -> KanjiServiceResult<Option<KanjiDto>> {
        Ok(self.repo.find_by_character(character)?.map(KanjiDto::from))
    }

    /// Kanji having `term` as one whole slash-delimited meaning segment.
    ///
    /// Order is whatever the datastore reports. Blank terms return nothing.
    pub fn find_all_by_meaning_term(&self, term: &str) -> KanjiServiceResult<Vec<KanjiDto>> {
        let Some(filter) = MeaningFilter::new(term)? else {
            return Ok(Vec::new());
        };
        let kanjis = self.repo.find_all_by_meaning_regex(filter.pattern())?;
        Ok(kanjis.into_iter().map(KanjiDto::from).collect())
    }

    pub fn find_all(&self) -> KanjiServiceResult<Vec<KanjiDto>> {
        Ok(self
            .repo
            .list_kanjis()?
            .into_iter()
            .map(KanjiDto::from)
            .collect())
    }

    /// Saves a new Kanji with the confusion ids listed on `kanji`.
    ///
    /// Returns `Ok(None)` when `character` is missing or blank. Any `id` on
    /// the input is ignored; the datastore assigns a fresh one.
    pub fn create(&self, kanji: &KanjiDto) -> KanjiServiceResult<Option<KanjiDto>> {
        let Some(character) = non_blank(kanji.character.as_deref()) else {
            debug!("event=kanji_create module=service status=skip reason=missing_character");
            return Ok(None);
        };
        self.ensure_unique(character)?;

        let mut entity = Kanji::new(character, kanji.meaning.clone().unwrap_or_default());
        self.link_existing(&mut entity, kanji.confusion_ids())?;

        let saved = self.save(&entity)?;
        info!(
            "event=kanji_create module=service status=ok id={} confusions={}",
            saved.identity,
            saved.confusions().len()
        );
        Ok(Some(KanjiDto::from(&saved)))
    }

    /// Saves a new Kanji confused with the given characters.
    ///
    /// The duplicate check runs before any character is resolved. Characters
    /// that are not stored are dropped. The resolved list replaces any ids
    /// already present on `kanji`.
    pub fn create_with_confused_characters(
        &self,
        kanji: &KanjiDto,
        confused_characters: &[&str],
    ) -> KanjiServiceResult<Option<KanjiDto>> {
        let Some(character) = non_blank(kanji.character.as_deref()) else {
            return Ok(None);
        };
        self.ensure_unique(character)?;

        let mut confused_ids = Vec::with_capacity(confused_characters.len());
        for confused in confused_characters {
            if let Some(found) = self.repo.find_by_character(confused)? {
                confused_ids.extend(found.id());
            }
        }

        let request = kanji.clone().with_confusions(confused_ids);
        self.create(&request)
    }

    pub fn create_from_parts(
        &self,
        character: &str,
        meaning: &str,
    ) -> KanjiServiceResult<Option<KanjiDto>> {
        self.create(&KanjiDto::new(character, meaning))
    }

    pub fn create_from_parts_with_confused_characters(
        &self,
        character: &str,
        meaning: &str,
        confused_characters: &[&str],
    ) -> KanjiServiceResult<Option<KanjiDto>> {
        self.create_with_confused_characters(&KanjiDto::new(character, meaning), confused_characters)
    }

    /// Saves a new Kanji confused with the stored Kanji among `confused_ids`.
    pub fn create_from_parts_with_confused_ids(
        &self,
        character: &str,
        meaning: &str,
        confused_ids: &[RecordId],
    ) -> KanjiServiceResult<Option<KanjiDto>> {
        let mut existing = Vec::with_capacity(confused_ids.len());
        for id in confused_ids {
            if self.repo.exists_kanji(*id)? {
                existing.push(*id);
            }
        }
        self.create(&KanjiDto::new(character, meaning).with_confusions(existing))
    }

    /// Overwrites character, meaning and confusions of a stored Kanji.
    ///
    /// Returns `Ok(None)` when `id` or `character` is missing, `character` is
    /// blank or the id is unknown. An absent confusion list clears every edge
    /// of the Kanji. Renaming onto another stored character is `DuplicateEntry`.
    pub fn update(&self, kanji: &KanjiDto) -> KanjiServiceResult<Option<KanjiDto>> {
        let character = non_blank(kanji.character.as_deref());
        let (Some(id), Some(character)) = (kanji.id, character) else {
            debug!("event=kanji_update module=service status=skip reason=incomplete_input");
            return Ok(None);
        };
        if !self.repo.exists_kanji(id)? {
            debug!("event=kanji_update module=service status=skip reason=not_found id={id}");
            return Ok(None);
        }

        let mut entity = Kanji::with_id(id, character, kanji.meaning.clone().unwrap_or_default());
        self.link_existing(&mut entity, kanji.confusion_ids())?;

        let saved = self.save(&entity)?;
        info!("event=kanji_update module=service status=ok id={id}");
        Ok(Some(KanjiDto::from(&saved)))
    }

    /// Deletes by id and returns the record as it was before deletion.
    pub fn delete_by_id(&self, id: RecordId) -> KanjiServiceResult<Option<KanjiDto>> {
        let Some(existing) = self.repo.get_kanji(id)? else {
            return Ok(None);
        };
        self.repo.delete_kanji(id)?;
        info!(
            "event=kanji_delete module=service status=ok id={id} released_confusions={}",
            existing.confusions().len()
        );
        Ok(Some(KanjiDto::from(&existing)))
    }

    /// Deletes the one Kanji structurally matching the set fields of `kanji`.
    ///
    /// Only `id`, `character` and `meaning` take part in the match. Returns
    /// `Ok(None)` without deleting when no field was set or the example
    /// matches zero or several records.
    pub fn delete(&self, kanji: &KanjiDto) -> KanjiServiceResult<Option<KanjiDto>> {
        let probe = KanjiProbe::from(kanji);
        if probe.is_empty() || !self.repo.exists_matching(&probe)? {
            debug!("event=kanji_delete module=service status=skip reason=no_match");
            return Ok(None);
        }

        let mut matches = self.repo.find_matching(&probe)?;
        if matches.len() > 1 {
            debug!(
                "event=kanji_delete module=service status=skip reason=ambiguous matched={}",
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

        self.repo.delete_kanji(id)?;
        info!("event=kanji_delete module=service status=ok id={id}");
        Ok(Some(KanjiDto::from(&found)))
    }

    fn ensure_unique(&self, character: &str) -> KanjiServiceResult<()> {
        if self.repo.exists_by_character(character)? {
            warn!("event=kanji_create module=service status=error error_code=duplicate_entry");
            return Err(KanjiServiceError::DuplicateEntry(character.to_string()));
        }
        Ok(())
    }

    fn save(&self, entity: &Kanji) -> KanjiServiceResult<Kanji> {
        match self.repo.save_kanji(entity) {
            Ok(saved) => Ok(saved),
            // A concurrent writer stored the character after our existence check.
            Err(RepoError::UniqueViolation(_)) => {
                Err(KanjiServiceError::DuplicateEntry(entity.character.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn link_existing(&self, entity: &mut Kanji, ids: &[RecordId]) -> KanjiServiceResult<()> {
        for id in ids {
            match self.repo.get_kanji(*id)? {
                Some(mut partner) => {
                    entity.add_confusion(&mut partner);
                }
                None => debug!("event=kanji_confusion_skip module=service id={id}"),
            }
        }
        Ok(())
    }
}
