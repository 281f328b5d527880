//! Candidate email extraction from page text
//!
//! Three passes run over the text in a fixed priority order and their matches
//! are concatenated:
//!
//! 1. Plain addresses (`jane@example.com`)
//! 2. Bracket-obfuscated addresses (`jane [at] example.com`)
//! 3. Parenthesis-obfuscated addresses (`jane (at) example.com`)
//!
//! Within a pass matches appear in order of first occurrence. Duplicates are
//! kept; callers pick the first candidate that validates.

use lazy_static::lazy_static;
use regex::Regex;

// ASCII-only word boundaries: adjacent Hangul is never part of an address.
lazy_static! {
    static ref STANDARD_PATTERN: Regex =
        Regex::new(r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?-u:\b)")
            .expect("standard email pattern compiles");

    static ref BRACKET_AT_PATTERN: Regex =
        Regex::new(r"(?i)(?-u:\b)[A-Za-z0-9._%+-]+\s*\[at\]\s*[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?-u:\b)")
            .expect("bracket email pattern compiles");

    static ref PAREN_AT_PATTERN: Regex =
        Regex::new(r"(?i)(?-u:\b)[A-Za-z0-9._%+-]+\s*\(at\)\s*[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?-u:\b)")
            .expect("paren email pattern compiles");

    static ref BRACKET_MARKER: Regex = Regex::new(r"(?i)\[at\]").expect("marker compiles");

    static ref PAREN_MARKER: Regex = Regex::new(r"(?i)\(at\)").expect("marker compiles");
}

/// Which pass produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// `local@domain.tld`
    Standard,
    /// `local [at] domain.tld`
    BracketAt,
    /// `local (at) domain.tld`
    ParenAt,
}

/// Extracts candidate email addresses from free text
///
/// The result is deterministic for a given input. Obfuscated matches are
/// normalized (marker replaced with `@`, whitespace removed) but case is left
/// untouched; lower-casing happens during validation.
///
/// # Example
///
/// ```
/// use email_enricher::extract_candidates;
///
/// let found = extract_candidates("Write to jane [at] example.com or bob@example.org");
/// assert_eq!(found, vec!["bob@example.org", "jane@example.com"]);
/// ```
pub fn extract_candidates(text: &str) -> Vec<String> {
    extract_tagged(text)
        .into_iter()
        .map(|(_, candidate)| candidate)
        .collect()
}

/// Same as [`extract_candidates`] but keeps track of the pass of each match
pub fn extract_tagged(text: &str) -> Vec<(CandidateSource, String)> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<(CandidateSource, String)> = STANDARD_PATTERN
        .find_iter(text)
        .map(|m| (CandidateSource::Standard, m.as_str().to_string()))
        .collect();

    candidates.extend(
        BRACKET_AT_PATTERN
            .find_iter(text)
            .map(|m| (CandidateSource::BracketAt, deobfuscate(m.as_str(), &BRACKET_MARKER))),
    );

    candidates.extend(
        PAREN_AT_PATTERN
            .find_iter(text)
            .map(|m| (CandidateSource::ParenAt, deobfuscate(m.as_str(), &PAREN_MARKER))),
    );

    candidates
}

fn deobfuscate(raw: &str, marker: &Regex) -> String {
    marker
        .replace_all(raw, "@")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
