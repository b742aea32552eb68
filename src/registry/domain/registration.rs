//! Registration request submitted by an agent.

use super::{Manifest, ManifestError};

/// A validated manifest paired with the agent's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    manifest: Manifest,
    health_endpoint: String,
}

impl Registration {
    /// Creates a registration request.
    ///
    /// A trailing `/` on the base URL is dropped so derived URLs never carry
    /// a doubled separator.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidHealthEndpoint`] when the base URL is
    /// not `http://` or `https://`.
    pub fn new(manifest: Manifest, health_endpoint: impl Into<String>) -> Result<Self, ManifestError> {
        let raw = health_endpoint.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let has_host = ["http://", "https://"]
            .iter()
            .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
        if !has_host {
            return Err(ManifestError::InvalidHealthEndpoint(raw));
        }

        Ok(Self {
            manifest,
            health_endpoint: trimmed.to_owned(),
        })
    }

    /// Returns the manifest.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn health_endpoint(&self) -> &str {
        &self.health_endpoint
    }

    /// Splits the registration into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Manifest, String) {
        (self.manifest, self.health_endpoint)
    }
}
