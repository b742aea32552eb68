//! Manifest semantic version.

use super::ManifestError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `MAJOR.MINOR.PATCH` version with numeric components only.
///
/// Pre-release and build suffixes are not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManifestVersion {
    major: u64,
    minor: u64,
    patch: u64,
}

impl ManifestVersion {
    /// Creates a version from its numeric components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a `X.Y.Z` version string.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidVersion`] when the string does not
    /// contain exactly three dot-separated decimal components.
    pub fn parse(value: &str) -> Result<Self, ManifestError> {
        let invalid = || ManifestError::InvalidVersion(value.to_owned());
        let mut components = value.trim().split('.').map(parse_component);

        let major = components.next().flatten().ok_or_else(invalid)?;
        let minor = components.next().flatten().ok_or_else(invalid)?;
        let patch = components.next().flatten().ok_or_else(invalid)?;
        if components.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(major, minor, patch))
    }
}

fn parse_component(component: &str) -> Option<u64> {
    if component.is_empty() || !component.chars().all(|digit| digit.is_ascii_digit()) {
        return None;
    }
    component.parse().ok()
}

impl TryFrom<String> for ManifestVersion {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ManifestVersion> for String {
    fn from(value: ManifestVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
