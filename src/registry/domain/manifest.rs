//! Agent manifest aggregate.

use super::{
    AgentId, Capability, CapabilityDocument, CapabilityVerb, DataScope, HealthCheckConfig,
    HealthCheckDocument, ManifestDocument, ManifestError, ManifestVersion, SafetyAnnotation,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Declarative description of an agent, immutable once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    agent_id: AgentId,
    version: ManifestVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    capabilities: Vec<Capability>,
    data_scopes: Vec<DataScope>,
    tool_access: Vec<String>,
    egress_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health_check: Option<HealthCheckConfig>,
    metadata: Map<String, Value>,
}

impl Manifest {
    /// Creates a manifest with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NoCapabilities`] when `capabilities` is empty
    /// or [`ManifestError::DuplicateCapability`] when a verb repeats.
    pub fn new(
        agent_id: AgentId,
        version: ManifestVersion,
        capabilities: Vec<Capability>,
    ) -> Result<Self, ManifestError> {
        if capabilities.is_empty() {
            return Err(ManifestError::NoCapabilities);
        }

        let mut seen = HashSet::with_capacity(capabilities.len());
        for capability in &capabilities {
            if !seen.insert(capability.verb().as_str()) {
                return Err(ManifestError::DuplicateCapability(
                    capability.verb().to_string(),
                ));
            }
        }

        Ok(Self {
            agent_id,
            version,
            display_name: None,
            description: None,
            capabilities,
            data_scopes: Vec::new(),
            tool_access: Vec::new(),
            egress_domains: Vec::new(),
            health_check: None,
            metadata: Map::new(),
        })
    }

    /// Decodes and validates a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Malformed`] when the text is not a manifest
    /// document, or any constructor error raised by [`Self::from_document`].
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let document: ManifestDocument = serde_json::from_str(json)
            .map_err(|err| ManifestError::Malformed(err.to_string()))?;
        Self::from_document(document)
    }

    /// Validates a decoded manifest document.
    ///
    /// # Errors
    ///
    /// Returns the first [`ManifestError`] raised while validating the
    /// document's fields.
    pub fn from_document(document: ManifestDocument) -> Result<Self, ManifestError> {
        let ManifestDocument {
            agent_id,
            version,
            display_name,
            description,
            capabilities: capability_documents,
            data_scopes,
            tool_access,
            egress_domains,
            health_check,
            metadata,
        } = document;

        let capabilities = capability_documents
            .into_iter()
            .map(capability_from_document)
            .collect::<Result<Vec<_>, _>>()?;
        let scopes = data_scopes
            .into_iter()
            .map(DataScope::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut manifest = Self::new(
            AgentId::new(agent_id)?,
            ManifestVersion::parse(&version)?,
            capabilities,
        )?
        .with_data_scopes(scopes)
        .with_tool_access(tool_access)
        .with_egress_domains(egress_domains)
        .with_metadata(metadata);

        if let Some(name) = display_name {
            manifest = manifest.with_display_name(name);
        }
        if let Some(text) = description {
            manifest = manifest.with_description(text);
        }
        if let Some(HealthCheckDocument {
            endpoint,
            interval_seconds,
            timeout_seconds,
        }) = health_check
        {
            manifest = manifest.with_health_check(HealthCheckConfig::new(
                endpoint,
                interval_seconds,
                timeout_seconds,
            )?);
        }

        Ok(manifest)
    }

    /// Sets the display name. Blank names are ignored.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = non_blank(&display_name.into());
        self
    }

    /// Sets the description. Blank descriptions are ignored.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(&description.into());
        self
    }

    /// Sets the data scopes.
    #[must_use]
    pub fn with_data_scopes(mut self, scopes: impl IntoIterator<Item = DataScope>) -> Self {
        self.data_scopes = scopes.into_iter().collect();
        self
    }

    /// Sets the tool access list.
    #[must_use]
    pub fn with_tool_access(mut self, tools: impl IntoIterator<Item = String>) -> Self {
        self.tool_access = tools.into_iter().collect();
        self
    }

    /// Sets the declared egress domains.
    #[must_use]
    pub fn with_egress_domains(mut self, domains: impl IntoIterator<Item = String>) -> Self {
        self.egress_domains = domains.into_iter().collect();
        self
    }

    /// Sets explicit health check settings.
    #[must_use]
    pub fn with_health_check(mut self, health_check: HealthCheckConfig) -> Self {
        self.health_check = Some(health_check);
        self
    }

    /// Sets opaque metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Returns the manifest version.
    #[must_use]
    pub const fn version(&self) -> ManifestVersion {
        self.version
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the name shown to operators: the display name, or the agent id.
    #[must_use]
    pub fn agent_name(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.agent_id.as_str())
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the declared capabilities in manifest order.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns the data scopes.
    #[must_use]
    pub fn data_scopes(&self) -> &[DataScope] {
        &self.data_scopes
    }

    /// Returns `true` when the manifest declares `scope`.
    #[must_use]
    pub fn covers_scope(&self, scope: &str) -> bool {
        self.data_scopes.iter().any(|declared| declared.as_str() == scope)
    }

    /// Returns the tool access list.
    #[must_use]
    pub fn tool_access(&self) -> &[String] {
        &self.tool_access
    }

    /// Returns the declared egress domains.
    #[must_use]
    pub fn egress_domains(&self) -> &[String] {
        &self.egress_domains
    }

    /// Returns the effective health check settings.
    ///
    /// Manifests without an explicit block use [`HealthCheckConfig::default`].
    #[must_use]
    pub fn health_check(&self) -> HealthCheckConfig {
        self.health_check.clone().unwrap_or_default()
    }

    /// Returns the opaque metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

fn capability_from_document(document: CapabilityDocument) -> Result<Capability, ManifestError> {
    let CapabilityDocument {
        verb,
        input_schema,
        output_schema,
        safety_annotations,
        sla,
        description,
        examples,
    } = document;

    let annotations = safety_annotations
        .iter()
        .map(|name| SafetyAnnotation::try_from(name.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut capability = Capability::new(CapabilityVerb::new(verb)?, input_schema, output_schema)
        .with_safety_annotations(annotations)
        .with_examples(examples);
    if let Some(declared) = sla {
        capability = capability.with_sla(declared);
    }
    if let Some(text) = description {
        capability = capability.with_description(text);
    }
    Ok(capability)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
