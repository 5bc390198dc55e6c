//! Email addresses as typed into the public forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why some input is not an [`Email`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email cannot contain whitespace")]
    Whitespace,
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    #[error("email needs a name before the @")]
    NoMailbox,
    #[error("email needs a domain after the @")]
    NoDomain,
}

/// A trimmed email address, otherwise kept exactly as typed.
///
/// Case is preserved, so the store's uniqueness constraint sees
/// `Fan@Example.com` and `fan@example.com` as different addresses. Only the
/// shape is checked; deliverability never is.
///
/// ```
/// use mediarch_core::Email;
///
/// let email = Email::parse("  Fan@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "Fan@Example.COM");
///
/// assert!(Email::parse("fan@localhost").is_ok());
/// assert!(Email::parse("fan").is_err());
/// assert!(Email::parse("a@b@c.com").is_err());
/// ```
///
/// Deserialization does not re-validate: rows coming back from the store
/// are taken as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Trim and validate user input.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the input trips over.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let address = input.trim();

        if address.is_empty() {
            return Err(EmailError::Empty);
        }
        if address.chars().count() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if address.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (mailbox, domain) = address.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if mailbox.is_empty() {
            return Err(EmailError::NoMailbox);
        }
        if domain.is_empty() {
            return Err(EmailError::NoDomain);
        }

        Ok(Self(address.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `mailto:` link for handing off to the admin's mail client.
    #[must_use]
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
