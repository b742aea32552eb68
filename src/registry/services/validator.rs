//! Manifest validation and egress policy enforcement.

use crate::registry::{
    domain::{PolicyViolation, Registration},
    ports::EgressPolicy,
};
use std::sync::Arc;

/// Checks registrations against the registry egress policy.
///
/// Structural checks run when domain values are constructed; this service
/// adds the policy checks that need the injected [`EgressPolicy`].
#[derive(Debug)]
pub struct ManifestValidator<E>
where
    E: EgressPolicy,
{
    policy: Arc<E>,
}

impl<E> Clone for ManifestValidator<E>
where
    E: EgressPolicy,
{
    fn clone(&self) -> Self {
        Self {
            policy: Arc::clone(&self.policy),
        }
    }
}

impl<E> ManifestValidator<E>
where
    E: EgressPolicy,
{
    /// Creates a validator enforcing `policy`.
    #[must_use]
    pub const fn new(policy: Arc<E>) -> Self {
        Self { policy }
    }

    /// Checks each domain in order against the policy.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyViolation`] naming the first domain the policy
    /// rejects.
    pub fn validate_egress_domains(&self, domains: &[String]) -> Result<(), PolicyViolation> {
        domains
            .iter()
            .find(|domain| !self.policy.permits(domain))
            .map_or(Ok(()), |domain| Err(PolicyViolation::new(domain.as_str())))
    }

    /// Runs every policy check for a registration.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyViolation`] when a declared egress domain is not
    /// permitted.
    pub fn validate(&self, registration: &Registration) -> Result<(), PolicyViolation> {
        self.validate_egress_domains(registration.manifest().egress_domains())
    }
}
