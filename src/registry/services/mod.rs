//! Registry services: validation, indexing, monitoring, and aggregation.

pub mod aggregator;
pub mod index;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod validator;

pub use aggregator::{HealthAggregator, SUCCESS_RATE_TARGET_PERCENT, recommendations};
pub use index::CapabilityIndex;
pub use registry::{AgentRegistry, LocalAgentRegistry};
pub use scheduler::{HealthScheduler, MonitorHandle};
pub use store::{RegistrationStore, RegistryError, RegistryResult};
pub use validator::ManifestValidator;
