//! Meaning search policy.
//!
//! # Responsibility
//! - Own the "is `term` one of the slash-delimited meanings" regex policy
//!   shared by Kanji and Word lookups.

pub mod meaning;
