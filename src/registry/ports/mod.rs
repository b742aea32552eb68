//! Port contracts for the agent registry.
//!
//! Ports define the infrastructure seams used by registry services: the
//! egress allowlist and the HTTP health probe.

pub mod egress;
pub mod probe;

pub use egress::EgressPolicy;
pub use probe::{HealthProbe, HealthProbeError, HealthProbeResult};
