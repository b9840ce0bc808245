//! Domain model for the study corpus.
//!
//! # Responsibility
//! - Define Kanji and Word records with store-assigned identity.
//! - Own the symmetric confusion relation embedded in every Kanji.
//!
//! # Invariants
//! - Records are `Identity::Unsaved` until the datastore assigns an id.
//! - The confusion relation is symmetric, irreflexive and duplicate-free.

pub mod confusion;
pub mod dto;
pub mod identity;
pub mod kanji;
pub mod validation;
pub mod word;
