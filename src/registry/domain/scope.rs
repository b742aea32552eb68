//! Data scope tags.

use super::ManifestError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse data-domain tag of the form `domain:area`, e.g. `mail:inbox`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataScope(String);

impl DataScope {
    /// Creates a validated data scope matching `[a-z]+:[a-z-]+`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidDataScope`] when the value does not
    /// match the pattern.
    pub fn new(value: impl Into<String>) -> Result<Self, ManifestError> {
        let raw = value.into();

        let is_valid = raw.split_once(':').is_some_and(|(domain, area)| {
            !domain.is_empty()
                && domain.chars().all(|character| character.is_ascii_lowercase())
                && !area.is_empty()
                && area
                    .chars()
                    .all(|character| character.is_ascii_lowercase() || character == '-')
        });
        if !is_valid {
            return Err(ManifestError::InvalidDataScope(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the scope as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DataScope {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataScope> for String {
    fn from(value: DataScope) -> Self {
        value.0
    }
}

impl fmt::Display for DataScope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
