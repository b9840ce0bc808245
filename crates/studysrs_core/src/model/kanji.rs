//! Kanji domain model.
//!
//! # Responsibility
//! - Define the Kanji record and its embedded confusion relation.
//! - Provide the symmetric, non-recursive `add_confusion` entry point.
//!
//! # Invariants
//! - `character` is unique across all Kanji (enforced by storage).
//! - The confusion relation is symmetric, irreflexive and duplicate-free.

use crate::model::confusion::{ConfusionPartner, ConfusionRelation};
use crate::model::identity::{Identity, RecordId};
use crate::model::validation::{require_text, split_meaning, ValidationError};

/// A single character entry with its meanings and confusion partners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kanji {
    pub identity: Identity,
    pub character: String,
    /// Slash-delimited meaning terms, e.g. `Personality/Gender`.
    pub meaning: String,
    confusions: ConfusionRelation,
}

impl Kanji {
    /// Creates an unsaved Kanji with no confusions.
    pub fn new(character: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            identity: Identity::Unsaved,
            character: character.into(),
            meaning: meaning.into(),
            confusions: ConfusionRelation::new(),
        }
    }

    /// Rebuilds a saved Kanji as read from storage.
    pub fn with_id(id: RecordId, character: impl Into<String>, meaning: impl Into<String>) -> Self {
        let mut kanji = Self::new(character, meaning);
        kanji.identity = Identity::Saved(id);
        kanji
    }

    pub fn id(&self) -> Option<RecordId> {
        self.identity.id()
    }

    /// Reference to this Kanji as stored inside another Kanji's relation.
    pub fn as_partner(&self) -> ConfusionPartner {
        ConfusionPartner::new(self.identity, self.character.clone())
    }

    /// Records that `self` and `other` are easily confused.
    ///
    /// Both endpoints are updated in one step, each on the side chosen by
    /// identity order. Returns `false` without mutating either side when
    /// `other` is `self` or the pair already exists.
    pub fn add_confusion(&mut self, other: &mut Kanji) -> bool {
        let own = self.as_partner();
        let partner = other.as_partner();
        if own == partner || self.confusions.contains(&partner) {
            return false;
        }

        self.confusions.link(&own, partner.clone());
        other.confusions.link(&partner, own);
        true
    }

    /// Records one endpoint of an edge when only the partner's reference is
    /// at hand (for example ids resolved from storage).
    ///
    /// The reciprocal side is produced when the partner is read back.
    pub fn add_confusion_ref(&mut self, partner: ConfusionPartner) -> bool {
        let own = self.as_partner();
        self.confusions.link(&own, partner)
    }

    /// Drops the edge to `other` from both endpoints.
    pub fn remove_confusion(&mut self, other: &mut Kanji) -> bool {
        let own = self.as_partner();
        let partner = other.as_partner();
        let removed = self.confusions.unlink(&partner);
        other.confusions.unlink(&own);
        removed
    }

    pub fn contains_confusion(&self, other: &Kanji) -> bool {
        self.confusions.contains(&other.as_partner())
    }

    /// Union of both sides of the relation, copied fresh on every call.
    pub fn confusions(&self) -> Vec<ConfusionPartner> {
        self.confusions.confusions()
    }

    /// Ids of all saved confusion partners, ascending.
    pub fn confusion_ids(&self) -> Vec<RecordId> {
        self.confusions.partner_ids()
    }

    /// Read-only access to the prior/later split.
    pub fn relation(&self) -> &ConfusionRelation {
        &self.confusions
    }

    /// Adds every Kanji in `others`, or clears the relation when empty.
    pub fn set_confusions(&mut self, others: &mut [Kanji]) {
        if others.is_empty() {
            self.confusions.clear();
            return;
        }
        for other in others.iter_mut() {
            self.add_confusion(other);
        }
    }

    /// Same as [`Kanji::set_confusions`] for bare partner references.
    pub fn set_confusion_refs(&mut self, partners: impl IntoIterator<Item = ConfusionPartner>) {
        let own = self.as_partner();
        self.confusions.set_confusions(&own, partners);
    }

    pub fn clear_confusions(&mut self) {
        self.confusions.clear();
    }

    /// Trimmed, non-empty meaning terms.
    pub fn meaning_terms(&self) -> Vec<&str> {
        split_meaning(&self.meaning)
    }

    /// Checks record invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("character", &self.character)?;
        if let Identity::Saved(id) = self.identity {
            if self.confusions.contains_id(id) {
                return Err(ValidationError::SelfConfusion(id));
            }
        }
        Ok(())
    }
}
