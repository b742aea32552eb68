//! Switchboard: control-plane agent registry.
//!
//! Independently running agents register a manifest of the capabilities
//! they provide. Other components discover, route to, and monitor those
//! agents through the registry, which is the single source of truth for
//! which agents exist, what each can do, and whether they are healthy.
//!
//! # Architecture
//!
//! Switchboard follows hexagonal architecture principles:
//!
//! - **Domain**: Validated manifest types and the agent status aggregate
//! - **Ports**: The egress policy and health probe seams
//! - **Adapters**: Allowlist policy, `reqwest` probe, scripted probe
//! - **Services**: Validation, capability index, monitors, aggregation
//!
//! # Modules
//!
//! - [`registry`]: Registration, discovery, and health monitoring
//! - [`config`]: Runtime configuration

pub mod config;
pub mod registry;
