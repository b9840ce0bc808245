//! Whole-segment matching over slash-delimited meanings.
//!
//! # Responsibility
//! - Build the regex used by meaning-term lookups in both services.
//! - Offer an in-process matcher with the same semantics as the SQL filter.
//!
//! # Invariants
//! - A term matches only as a complete `/`-delimited segment: searching `Cut`
//!   never matches `Cut off`.
//! - Term text is always matched literally; metacharacters are escaped.
//! - Matching is case-sensitive.

use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Builds the meaning-term pattern `(^|.*/)<term>(/.*$|$)`.
pub fn meaning_term_pattern(term: &str) -> String {
    format!("(^|.*/){}(/.*$|$)", regex::escape(term))
}

/// Error raised when a meaning pattern cannot be compiled.
#[derive(Debug)]
pub struct MeaningFilterError {
    pattern: String,
    source: regex::Error,
}

impl Display for MeaningFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid meaning pattern `{}`: {}", self.pattern, self.source)
    }
}

impl Error for MeaningFilterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Compiled matcher for one meaning term.
#[derive(Debug, Clone)]
pub struct MeaningFilter {
    term: String,
    pattern: String,
    regex: Regex,
}

impl MeaningFilter {
    /// Compiles the whole-segment pattern for `term`.
    ///
    /// Returns `Ok(None)` for blank terms; callers treat that as "no results".
    pub fn new(term: &str) -> Result<Option<Self>, MeaningFilterError> {
        if term.trim().is_empty() {
            return Ok(None);
        }

        let pattern = meaning_term_pattern(term);
        let regex = Regex::new(&pattern).map_err(|source| MeaningFilterError {
            pattern: pattern.clone(),
            source,
        })?;

        Ok(Some(Self {
            term: term.to_string(),
            pattern,
            regex,
        }))
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Pattern string handed to the datastore's regex filter.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, meaning: &str) -> bool {
        self.regex.is_match(meaning)
    }
}

#[cfg(test)]
mod tests {
    use super::{meaning_term_pattern, MeaningFilter};

    fn filter(term: &str) -> MeaningFilter {
        MeaningFilter::new(term)
            .expect("pattern should compile")
            .expect("term should not be blank")
    }

    #[test]
    fn pattern_wraps_term_with_segment_anchors() {
        assert_eq!(meaning_term_pattern("Cut"), "(^|.*/)Cut(/.*$|$)");
    }

    #[test]
    fn matches_term_as_whole_segment_only() {
        let cut = filter("Cut");
        assert!(cut.is_match("Cut"));
        assert!(cut.is_match("Cut/Sever"));
        assert!(cut.is_match("Sever/Cut"));
        assert!(cut.is_match("Sever/Cut/Slice"));
        assert!(!cut.is_match("Cut off"));
        assert!(!cut.is_match("Uncut"));
        assert!(!cut.is_match("cut"));
    }

    #[test]
    fn metacharacters_in_term_are_literal() {
        let dotted = filter("a.b");
        assert!(dotted.is_match("x/a.b"));
        assert!(!dotted.is_match("axb"));

        let grouped = filter("(to) go");
        assert!(grouped.is_match("(to) go/leave"));
    }

    #[test]
    fn blank_term_yields_no_filter() {
        assert!(MeaningFilter::new("  ").expect("blank is not an error").is_none());
    }
}
