//! Agent registration, discovery, and health monitoring.
//!
//! Agents register a declarative manifest of the capabilities they provide.
//! The registry validates it, indexes the capabilities for discovery, and
//! polls each agent in the background. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
