use crate::config::ExtractorConfig;
use lazy_static::lazy_static;
use regex::Regex;

/// Longest address accepted (RFC 5321 path limit)
pub const MAX_EMAIL_LEN: usize = 254;

lazy_static! {
    static ref EMAIL_GRAMMAR: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email grammar compiles");
}

/// Lower-cases and trims a raw match
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Accepts or rejects candidate addresses
///
/// A candidate is rejected when it is empty, longer than [`MAX_EMAIL_LEN`],
/// ends with one of the denied file extensions, or does not fully match
/// `local@domain.tld` with an alphabetic TLD of two or more letters.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    denied_extensions: Vec<String>,
}

impl EmailValidator {
    pub fn new(denied_extensions: &[String]) -> Self {
        Self {
            denied_extensions: denied_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(&config.denied_extensions)
    }

    /// Returns true if `email` is a plausible contact address
    pub fn is_valid(&self, email: &str) -> bool {
        let email = normalize_email(email);

        if email.is_empty() || email.len() > MAX_EMAIL_LEN {
            return false;
        }

        if self
            .denied_extensions
            .iter()
            .any(|ext| email.ends_with(ext.as_str()))
        {
            return false;
        }

        EMAIL_GRAMMAR.is_match(&email)
    }

    /// Normalizes `raw` and returns it if it validates
    pub fn accept(&self, raw: &str) -> Option<String> {
        let email = normalize_email(raw);
        self.is_valid(&email).then_some(email)
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_address() {
        let validator = EmailValidator::default();
        assert!(validator.is_valid("jane@example.com"));
        assert!(validator.is_valid("first.last+tag@mail.example.co.kr"));
    }

    #[test]
    fn test_rejects_empty_and_overlong() {
        let validator = EmailValidator::default();
        assert!(!validator.is_valid(""));
        assert!(!validator.is_valid("   "));

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(long.len() > MAX_EMAIL_LEN);
        assert!(!validator.is_valid(&long));
    }

    #[test]
    fn test_rejects_denied_extensions() {
        let validator = EmailValidator::default();
        assert!(!validator.is_valid("photo@example.com/banner.png"));
        assert!(!validator.is_valid("logo@2x.png"));
        assert!(!validator.is_valid("LOGO@2X.PNG"));
        assert!(!validator.is_valid("brochure@site.pdf"));
    }

    #[test]
    fn test_rejects_bad_grammar() {
        let validator = EmailValidator::default();
        assert!(!validator.is_valid("no-at-sign.example.com"));
        assert!(!validator.is_valid("user@domain"));
        assert!(!validator.is_valid("user@domain.c0m"));
        assert!(!validator.is_valid("user name@example.com"));
    }

    #[test]
    fn test_accept_normalizes() {
        let validator = EmailValidator::default();
        assert_eq!(
            validator.accept("  JOHN@EXAMPLE.ORG "),
            Some("john@example.org".to_string())
        );
        assert_eq!(validator.accept("banner@site.jpg"), None);
    }

    #[test]
    fn test_custom_denylist() {
        let validator = EmailValidator::new(&[".COM".to_string()]);
        assert!(!validator.is_valid("jane@example.com"));
        assert!(validator.is_valid("jane@example.org"));
    }
}
