//! Egress allowlist port.

/// Decides whether an agent may declare an egress destination.
pub trait EgressPolicy: Send + Sync {
    /// Returns `true` when `domain` is allowed.
    fn permits(&self, domain: &str) -> bool;
}
