//! # Credentials
//!
//! The bearer token authorizing GitHub API calls.

use std::fmt;

/// A GitHub personal access token.
///
/// The value is unvalidated until first use. `Debug` never shows it; use
/// [`Credential::masked`] for display.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header and persistence.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A display form showing only the first and last four characters.
    ///
    /// Tokens of twelve characters or fewer are fully masked.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len().max(4));
        }

        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}
