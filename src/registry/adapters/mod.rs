//! Adapter implementations for registry ports.

pub mod egress;
pub mod http;
pub mod memory;

pub use egress::{AllowlistEgressPolicy, EgressRule};
pub use http::HttpHealthProbe;
pub use memory::ScriptedHealthProbe;
