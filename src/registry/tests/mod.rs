//! Unit tests for the registry module.
//!
//! Tests are organised by component. Monitor tests run on a paused Tokio
//! clock so interval sleeps complete instantly.

mod support;
