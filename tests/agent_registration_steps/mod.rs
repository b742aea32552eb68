//! Step definitions for agent registration BDD scenarios.

pub mod world;

mod then;
mod when;
