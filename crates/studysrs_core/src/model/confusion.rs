//! Symmetric "easily confused with" relation between Kanji.
//!
//! # Responsibility
//! - Keep each Kanji's confusion partners split into a prior and a later side.
//! - Decide the side of every edge from a total order over identity.
//!
//! # Invariants
//! - Irreflexive: an owner never appears among its own partners.
//! - No duplicates: a partner is stored at most once across both sides.
//! - For saved partners with ids `a < b`, the edge lives on `b`'s prior side
//!   and on `a`'s later side. Only the prior side maps to a persisted row.
//! - An unsaved owner keeps every saved partner on its prior side. Once the
//!   owner is persisted it receives the highest id, so the read-back agrees.

use crate::model::identity::{Identity, RecordId};
use serde::{Deserialize, Serialize};

/// Reference to a confusion partner as stored inside a relation.
///
/// Saved partners compare by id. Unsaved partners have no id to compare, so
/// they compare by character instead.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct ConfusionPartner {
    pub identity: Identity,
    pub character: String,
}

impl ConfusionPartner {
    pub fn new(identity: Identity, character: impl Into<String>) -> Self {
        Self {
            identity,
            character: character.into(),
        }
    }

    /// Partner known only by its stored id.
    pub fn saved(id: RecordId, character: impl Into<String>) -> Self {
        Self::new(Identity::Saved(id), character)
    }
}

impl PartialEq for ConfusionPartner {
    fn eq(&self, other: &Self) -> bool {
        match (self.identity, other.identity) {
            (Identity::Saved(left), Identity::Saved(right)) => left == right,
            (Identity::Unsaved, Identity::Unsaved) => self.character == other.character,
            _ => false,
        }
    }
}

/// Which half of a relation holds an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfusionSide {
    /// Partner compares earlier than the owner; this end owns the stored edge.
    Prior,
    /// Partner compares later than the owner; in-memory reciprocal only.
    Later,
}

/// Picks the side of `owner` that holds an edge to `partner`.
///
/// `Prior` when the partner is saved and the owner is either unsaved or has
/// a higher id. Everything else lands on `Later`.
pub fn side_for(owner: Identity, partner: Identity) -> ConfusionSide {
    match (owner, partner) {
        (_, Identity::Unsaved) => ConfusionSide::Later,
        (Identity::Unsaved, Identity::Saved(_)) => ConfusionSide::Prior,
        (Identity::Saved(owner_id), Identity::Saved(partner_id)) => {
            if partner_id < owner_id {
                ConfusionSide::Prior
            } else {
                ConfusionSide::Later
            }
        }
    }
}

/// Returns the persisted `(kanji_id, confusion_id)` row for a saved pair.
///
/// The higher id owns the row. Returns `None` for self-pairs.
pub fn canonical_edge(left: RecordId, right: RecordId) -> Option<(RecordId, RecordId)> {
    match left.cmp(&right) {
        std::cmp::Ordering::Greater => Some((left, right)),
        std::cmp::Ordering::Less => Some((right, left)),
        std::cmp::Ordering::Equal => None,
    }
}

/// Confusion partners of one Kanji, split by identity order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionRelation {
    prior: Vec<ConfusionPartner>,
    later: Vec<ConfusionPartner>,
}

impl ConfusionRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one endpoint of an edge on behalf of `owner`.
    ///
    /// Returns `false` without mutating when `partner` is the owner itself or
    /// is already present on either side.
    pub fn link(&mut self, owner: &ConfusionPartner, partner: ConfusionPartner) -> bool {
        if partner == *owner || self.contains(&partner) {
            return false;
        }

        match side_for(owner.identity, partner.identity) {
            ConfusionSide::Prior => self.prior.push(partner),
            ConfusionSide::Later => self.later.push(partner),
        }
        true
    }

    /// Removes `partner` from whichever side holds it.
    pub fn unlink(&mut self, partner: &ConfusionPartner) -> bool {
        let before = self.len();
        self.prior.retain(|entry| entry != partner);
        self.later.retain(|entry| entry != partner);
        before != self.len()
    }

    pub fn contains(&self, partner: &ConfusionPartner) -> bool {
        self.prior.contains(partner) || self.later.contains(partner)
    }

    /// Returns whether a saved partner with `id` is present.
    pub fn contains_id(&self, id: RecordId) -> bool {
        self.iter()
            .any(|entry| entry.identity == Identity::Saved(id))
    }

    /// Union of both sides, materialized fresh on every call.
    pub fn confusions(&self) -> Vec<ConfusionPartner> {
        self.iter().cloned().collect()
    }

    /// Ids of all saved partners, ascending.
    pub fn partner_ids(&self) -> Vec<RecordId> {
        let mut ids = self
            .iter()
            .filter_map(|entry| entry.identity.id())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    pub fn prior_side(&self) -> &[ConfusionPartner] {
        &self.prior
    }

    pub fn later_side(&self) -> &[ConfusionPartner] {
        &self.later
    }

    /// Overwrites or extends the relation.
    ///
    /// A non-empty input links every partner (merge, idempotent). An empty
    /// input clears both sides.
    pub fn set_confusions(
        &mut self,
        owner: &ConfusionPartner,
        partners: impl IntoIterator<Item = ConfusionPartner>,
    ) {
        let mut partners = partners.into_iter().peekable();
        if partners.peek().is_none() {
            self.clear();
            return;
        }
        for partner in partners {
            self.link(owner, partner);
        }
    }

    pub fn clear(&mut self) {
        self.prior.clear();
        self.later.clear();
    }

    pub fn len(&self) -> usize {
        self.prior.len() + self.later.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prior.is_empty() && self.later.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = &ConfusionPartner> {
        self.prior.iter().chain(self.later.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        canonical_edge, side_for, ConfusionPartner, ConfusionRelation, ConfusionSide,
    };
    use crate::model::identity::Identity;

    #[test]
    fn side_for_follows_identity_order() {
        assert_eq!(
            side_for(Identity::Saved(5), Identity::Saved(2)),
            ConfusionSide::Prior
        );
        assert_eq!(
            side_for(Identity::Saved(2), Identity::Saved(5)),
            ConfusionSide::Later
        );
        assert_eq!(
            side_for(Identity::Unsaved, Identity::Saved(9)),
            ConfusionSide::Prior
        );
        assert_eq!(
            side_for(Identity::Saved(9), Identity::Unsaved),
            ConfusionSide::Later
        );
        assert_eq!(
            side_for(Identity::Unsaved, Identity::Unsaved),
            ConfusionSide::Later
        );
    }

    #[test]
    fn canonical_edge_is_owned_by_higher_id() {
        assert_eq!(canonical_edge(3, 8), Some((8, 3)));
        assert_eq!(canonical_edge(8, 3), Some((8, 3)));
        assert_eq!(canonical_edge(4, 4), None);
    }

    #[test]
    fn link_rejects_owner_and_duplicates() {
        let owner = ConfusionPartner::saved(4, "性");
        let mut relation = ConfusionRelation::new();

        assert!(!relation.link(&owner, owner.clone()));
        assert!(relation.link(&owner, ConfusionPartner::saved(1, "牲")));
        assert!(!relation.link(&owner, ConfusionPartner::saved(1, "牲")));
        assert_eq!(relation.len(), 1);
        assert_eq!(relation.prior_side().len(), 1);
        assert!(relation.later_side().is_empty());
    }

    #[test]
    fn saved_partners_compare_by_id_only() {
        let left = ConfusionPartner::saved(1, "a");
        let right = ConfusionPartner::saved(1, "b");
        assert_eq!(left, right);

        let unsaved = ConfusionPartner::new(Identity::Unsaved, "a");
        assert_ne!(left, unsaved);
        assert_eq!(unsaved, ConfusionPartner::new(Identity::Unsaved, "a"));
    }

    #[test]
    fn set_confusions_merges_non_empty_and_clears_on_empty() {
        let owner = ConfusionPartner::saved(10, "未");
        let mut relation = ConfusionRelation::new();
        relation.link(&owner, ConfusionPartner::saved(3, "末"));

        relation.set_confusions(
            &owner,
            vec![
                ConfusionPartner::saved(3, "末"),
                ConfusionPartner::saved(12, "朱"),
                ConfusionPartner::saved(12, "朱"),
            ],
        );
        assert_eq!(relation.partner_ids(), vec![3, 12]);

        relation.set_confusions(&owner, Vec::new());
        assert!(relation.is_empty());
    }

    #[test]
    fn unlink_removes_from_either_side() {
        let owner = ConfusionPartner::saved(5, "土");
        let mut relation = ConfusionRelation::new();
        relation.link(&owner, ConfusionPartner::saved(2, "士"));
        relation.link(&owner, ConfusionPartner::saved(7, "工"));

        assert!(relation.unlink(&ConfusionPartner::saved(7, "工")));
        assert!(!relation.unlink(&ConfusionPartner::saved(7, "工")));
        assert_eq!(relation.partner_ids(), vec![2]);
        assert!(relation.contains_id(2));
    }
}
