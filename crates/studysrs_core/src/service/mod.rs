//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into Kanji and Word use-cases.
//! - Keep outer surfaces decoupled from storage details.
//!
//! # Invariants
//! - "Not found" and incomplete input are `Ok(None)`; duplicates are errors.
//!   Callers tell the two apart by control flow.

pub mod kanji_service;
pub mod word_service;
