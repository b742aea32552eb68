//! Validated agent identifier.

use super::ManifestError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique agent identifier matching `[a-z0-9-]+`.
///
/// Identifiers are stored exactly as given. Neither whitespace nor case is
/// normalised, so ` mail-agent` and `Mail-Agent` are both rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(String);

impl AgentId {
    /// Creates a validated agent identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::EmptyAgentId`] when the value is blank or
    /// [`ManifestError::InvalidAgentId`] when it contains characters outside
    /// `[a-z0-9-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, ManifestError> {
        let raw = value.into();

        if raw.trim().is_empty() {
            return Err(ManifestError::EmptyAgentId);
        }

        let is_valid = raw.chars().all(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || character == '-'
        });
        if !is_valid {
            return Err(ManifestError::InvalidAgentId(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AgentId {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentId> for String {
    fn from(value: AgentId) -> Self {
        value.0
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for AgentId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
