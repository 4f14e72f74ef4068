//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty (after trimming).
    #[error("email cannot be empty")]
    Empty,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The input does not contain a dot.
    #[error("email must contain a dot")]
    MissingDot,
}

/// A normalized email address.
///
/// Validation is deliberately loose: the address must contain an `@` and a
/// `.`, nothing more. The catalog browser only ever compares addresses the
/// user typed against addresses the user previously typed, so stricter RFC
/// validation buys nothing here.
///
/// Parsing trims whitespace and lowercases the address, so two `Email`
/// values compare equal whenever the account system must treat them as the
/// same user. This is the case-folded key favorites are stored under.
///
/// ## Examples
///
/// ```
/// use atlas_core::Email;
///
/// let email = Email::parse("  Morty@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "morty@example.com");
///
/// assert!(Email::parse("no-at-symbol.com").is_err());
/// assert!(Email::parse("no-dot@com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string, trimming and lowercasing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, or is missing an `@` or a `.`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }
        if !normalized.contains('@') {
            return Err(EmailError::MissingAtSymbol);
        }
        if !normalized.contains('.') {
            return Err(EmailError::MissingDot);
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
