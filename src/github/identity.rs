//! Identity wrappers for the user being queried and the API token.

use std::fmt;

use super::error::ContributionError;

/// GitHub user login used as the cache key and the self-exclusion rule.
///
/// Logins are compared case-sensitively; GitHub returns owner logins with
/// their canonical casing, so a request for `Octocat` does not exclude
/// repositories owned by `octocat`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserLogin(String);

impl UserLogin {
    /// Validates that the login is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ContributionError::InvalidUserLogin` when the supplied string
    /// is blank.
    pub fn new(login: impl AsRef<str>) -> Result<Self, ContributionError> {
        let trimmed = login.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContributionError::InvalidUserLogin);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserLogin {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserLogin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ContributionError::MissingToken` when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ContributionError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContributionError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

// Keeps the secret out of logs and panic messages.
impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}
