//! Error types for manifest validation and egress policy enforcement.

use thiserror::Error;

/// Errors returned while constructing manifest domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestError {
    /// The agent identifier is empty after trimming.
    #[error("agent id must not be empty")]
    EmptyAgentId,

    /// The agent identifier contains characters outside `[a-z0-9-]`.
    #[error(
        "agent id '{0}' contains invalid characters (only lowercase alphanumeric and hyphens allowed)"
    )]
    InvalidAgentId(String),

    /// The manifest version is not of the form `X.Y.Z`.
    #[error("version '{0}' is not a semantic version of the form X.Y.Z")]
    InvalidVersion(String),

    /// The manifest declares no capabilities.
    #[error("manifest must declare at least one capability")]
    NoCapabilities,

    /// The same verb is declared more than once in one manifest.
    #[error("capability '{0}' is declared more than once")]
    DuplicateCapability(String),

    /// A capability verb does not match `[a-z]+\.[a-z_]+`.
    #[error("capability verb '{0}' must look like 'namespace.action' ([a-z]+.[a-z_]+)")]
    InvalidVerb(String),

    /// A safety annotation is outside the closed annotation set.
    #[error("unknown safety annotation: {0}")]
    UnknownSafetyAnnotation(String),

    /// A data scope does not match `[a-z]+:[a-z-]+`.
    #[error("data scope '{0}' must look like 'domain:area' ([a-z]+:[a-z-]+)")]
    InvalidDataScope(String),

    /// The health check interval is below the 30 second floor.
    #[error("health check interval of {0}s is below the 30s minimum")]
    HealthIntervalTooShort(u64),

    /// The health check timeout is outside the 5 to 60 second window.
    #[error("health check timeout of {0}s must be between 5s and 60s")]
    HealthTimeoutOutOfRange(u64),

    /// The health check path does not start with `/`.
    #[error("health check endpoint '{0}' must start with '/'")]
    InvalidHealthCheckPath(String),

    /// The agent base URL is not an `http://` or `https://` URL.
    #[error("health endpoint '{0}' must start with 'http://' or 'https://'")]
    InvalidHealthEndpoint(String),

    /// The submitted manifest document could not be decoded.
    #[error("malformed manifest document: {0}")]
    Malformed(String),
}

/// Raised when a manifest declares an egress domain the policy does not allow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("egress domain '{domain}' is not permitted by the registry egress policy")]
pub struct PolicyViolation {
    domain: String,
}

impl PolicyViolation {
    /// Creates a violation naming the offending domain.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Returns the rejected domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }
}
