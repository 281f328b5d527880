//! Email extraction and validation
//!
//! Pure text functions with no I/O:
//! - Candidate extraction with prioritized patterns
//! - Address validation against a grammar and an extension denylist

mod patterns;
mod validate;

pub use patterns::{extract_candidates, extract_tagged, CandidateSource};
pub use validate::{normalize_email, EmailValidator, MAX_EMAIL_LEN};
