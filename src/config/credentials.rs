//! API key validation for the settings surface.
//!
//! Keys are accepted only after cleanup and format checks, and are carried
//! around as [`SecureString`] so they never end up in logs.

use thiserror::Error;

/// Literal prefix every Anthropic API key starts with.
pub const API_KEY_PREFIX: &str = "sk-ant-";

/// Reasons a submitted key is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Please enter an API key.")]
    Empty,

    #[error("Invalid key format. Keys start with sk-ant-")]
    InvalidPrefix,
}

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// A key that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(SecureString);

impl ApiKey {
    /// Clean and validate raw user input.
    ///
    /// Characters outside printable ASCII are stripped (pasting from rich
    /// text often drags in zero-width or non-breaking characters), then the
    /// result is trimmed and checked for emptiness and the key prefix.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let cleaned: String = raw.chars().filter(|c| matches!(c, ' '..='~')).collect();
        let key = cleaned.trim();

        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        if !key.starts_with(API_KEY_PREFIX) {
            return Err(CredentialError::InvalidPrefix);
        }
        Ok(Self(SecureString::new(key.to_string())))
    }

    pub fn secret(&self) -> &SecureString {
        &self.0
    }

    pub fn into_secret(self) -> SecureString {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_key() {
        let key = ApiKey::parse("sk-ant-abc123").unwrap();
        assert_eq!(key.secret().expose(), "sk-ant-abc123");
    }

    #[test]
    fn strips_non_printable_and_trims() {
        let key = ApiKey::parse("  sk-ant-\u{200b}abc\u{a0}\t\n").unwrap();
        assert_eq!(key.secret().expose(), "sk-ant-abc");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(ApiKey::parse("   "), Err(CredentialError::Empty));
        assert_eq!(ApiKey::parse("\u{200b}\u{feff}"), Err(CredentialError::Empty));
    }

    #[test]
    fn rejects_wrong_prefix() {
        assert_eq!(ApiKey::parse("sk-proj-123"), Err(CredentialError::InvalidPrefix));
        assert_eq!(
            CredentialError::InvalidPrefix.to_string(),
            "Invalid key format. Keys start with sk-ant-"
        );
    }

    #[test]
    fn test_secure_string_does_not_leak() {
        let secret = SecureString::new("my-secret-key".to_string());

        let debug_output = format!("{:?}", secret);
        assert!(!debug_output.contains("my-secret-key"));
        assert!(debug_output.contains("••••••••"));

        let display_output = format!("{}", secret);
        assert!(!display_output.contains("my-secret-key"));

        assert_eq!(secret.expose(), "my-secret-key");
    }
}
