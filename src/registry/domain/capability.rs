//! Capability declarations and their safety metadata.

use super::ManifestError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Capability verb of the form `namespace.action`, e.g. `messages.search`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityVerb(String);

impl CapabilityVerb {
    /// Creates a validated verb matching `[a-z]+\.[a-z_]+`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidVerb`] when the value does not match.
    pub fn new(value: impl Into<String>) -> Result<Self, ManifestError> {
        let raw = value.into();

        let is_valid = raw.split_once('.').is_some_and(|(namespace, action)| {
            !namespace.is_empty()
                && namespace
                    .chars()
                    .all(|character| character.is_ascii_lowercase())
                && !action.is_empty()
                && action
                    .chars()
                    .all(|character| character.is_ascii_lowercase() || character == '_')
        });
        if !is_valid {
            return Err(ManifestError::InvalidVerb(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the verb as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CapabilityVerb {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CapabilityVerb> for String {
    fn from(value: CapabilityVerb) -> Self {
        value.0
    }
}

impl Borrow<str> for CapabilityVerb {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CapabilityVerb {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Closed set of safety annotations a capability may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SafetyAnnotation {
    /// The capability never mutates user data.
    ReadOnly,
    /// Writes must be approved by a human before execution.
    WriteRequiresApproval,
    /// The capability only touches local resources.
    LocalOnly,
    /// The capability makes no outbound network calls.
    NoEgress,
    /// The capability handles personally identifiable information.
    PiiSensitive,
}

impl SafetyAnnotation {
    /// Returns the canonical manifest representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::WriteRequiresApproval => "write-requires-approval",
            Self::LocalOnly => "local-only",
            Self::NoEgress => "no-egress",
            Self::PiiSensitive => "pii-sensitive",
        }
    }
}

impl fmt::Display for SafetyAnnotation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SafetyAnnotation {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "read-only" => Ok(Self::ReadOnly),
            "write-requires-approval" => Ok(Self::WriteRequiresApproval),
            "local-only" => Ok(Self::LocalOnly),
            "no-egress" => Ok(Self::NoEgress),
            "pii-sensitive" => Ok(Self::PiiSensitive),
            _ => Err(ManifestError::UnknownSafetyAnnotation(value.to_owned())),
        }
    }
}

/// Declared performance targets for a capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySla {
    /// Target latency in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Maximum calls per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
    /// Maximum tokens produced per call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    /// Hard timeout for a single call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// A named action an agent can perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capability {
    verb: CapabilityVerb,
    input_schema: Value,
    output_schema: Value,
    safety_annotations: BTreeSet<SafetyAnnotation>,
    sla: Option<CapabilitySla>,
    description: Option<String>,
    examples: Vec<Value>,
}

impl Capability {
    /// Creates a capability annotated `read-only` with no SLA.
    #[must_use]
    pub fn new(verb: CapabilityVerb, input_schema: Value, output_schema: Value) -> Self {
        Self {
            verb,
            input_schema,
            output_schema,
            safety_annotations: BTreeSet::from([SafetyAnnotation::ReadOnly]),
            sla: None,
            description: None,
            examples: Vec::new(),
        }
    }

    /// Replaces the safety annotations.
    #[must_use]
    pub fn with_safety_annotations(
        mut self,
        annotations: impl IntoIterator<Item = SafetyAnnotation>,
    ) -> Self {
        self.safety_annotations = annotations.into_iter().collect();
        self
    }

    /// Sets the declared SLA.
    #[must_use]
    pub const fn with_sla(mut self, sla: CapabilitySla) -> Self {
        self.sla = Some(sla);
        self
    }

    /// Sets a human-readable description. Blank descriptions are ignored.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let normalized = description.into().trim().to_owned();
        if !normalized.is_empty() {
            self.description = Some(normalized);
        }
        self
    }

    /// Sets example invocations.
    #[must_use]
    pub fn with_examples(mut self, examples: impl IntoIterator<Item = Value>) -> Self {
        self.examples = examples.into_iter().collect();
        self
    }

    /// Returns the capability verb.
    #[must_use]
    pub const fn verb(&self) -> &CapabilityVerb {
        &self.verb
    }

    /// Returns the input schema.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Returns the output schema.
    #[must_use]
    pub const fn output_schema(&self) -> &Value {
        &self.output_schema
    }

    /// Returns the safety annotations.
    #[must_use]
    pub const fn safety_annotations(&self) -> &BTreeSet<SafetyAnnotation> {
        &self.safety_annotations
    }

    /// Returns the declared SLA, if any.
    #[must_use]
    pub const fn sla(&self) -> Option<&CapabilitySla> {
        self.sla.as_ref()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the example invocations.
    #[must_use]
    pub fn examples(&self) -> &[Value] {
        &self.examples
    }
}
