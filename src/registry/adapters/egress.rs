//! Allowlist-based egress policy.

use crate::registry::ports::EgressPolicy;
use std::net::IpAddr;

/// One allowlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EgressRule {
    /// Matches one host name exactly.
    Exact(String),
    /// Matches strict subdomains of the suffix, e.g. `local` for `*.local`.
    Suffix(String),
    /// Matches any loopback IP address.
    Loopback,
}

impl EgressRule {
    /// Parses `pattern` as `*.suffix` or an exact host name.
    ///
    /// Returns `None` for blank patterns.
    #[must_use]
    pub fn parse(pattern: &str) -> Option<Self> {
        let normalized = normalize(pattern);
        if normalized.is_empty() {
            return None;
        }
        match normalized.strip_prefix("*.") {
            Some("") => None,
            Some(suffix) => Some(Self::Suffix(suffix.to_owned())),
            None => Some(Self::Exact(normalized)),
        }
    }

    /// Lowercases host names and strips a trailing dot. Returns `None` when
    /// nothing is left to match.
    fn normalized(self) -> Option<Self> {
        match self {
            Self::Exact(name) => Some(normalize(&name))
                .filter(|host| !host.is_empty())
                .map(Self::Exact),
            Self::Suffix(suffix) => Some(normalize(&suffix))
                .map(|host| host.trim_start_matches('.').to_owned())
                .filter(|host| !host.is_empty())
                .map(Self::Suffix),
            Self::Loopback => Some(Self::Loopback),
        }
    }

    fn matches(&self, host: &str) -> bool {
        match self {
            Self::Exact(name) => host == name,
            Self::Suffix(suffix) => host
                .strip_suffix(suffix.as_str())
                .and_then(|label| label.strip_suffix('.'))
                .is_some_and(|label| !label.is_empty()),
            Self::Loopback => host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .is_ok_and(|address| address.is_loopback()),
        }
    }
}

/// Egress policy backed by an ordered list of [`EgressRule`]s.
///
/// Host names are compared case-insensitively and a trailing dot is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistEgressPolicy {
    rules: Vec<EgressRule>,
}

impl AllowlistEgressPolicy {
    /// Creates a policy that permits nothing.
    #[must_use]
    pub const fn deny_all() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates the local-only policy: loopback addresses, `localhost`,
    /// `localhost.localdomain`, and `*.local`.
    #[must_use]
    pub fn local_default() -> Self {
        Self {
            rules: vec![
                EgressRule::Loopback,
                EgressRule::Exact("localhost".to_owned()),
                EgressRule::Exact("localhost.localdomain".to_owned()),
                EgressRule::Suffix("local".to_owned()),
            ],
        }
    }

    /// Creates a policy from textual patterns. Blank patterns are skipped.
    #[must_use]
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: patterns
                .into_iter()
                .filter_map(|pattern| EgressRule::parse(pattern.as_ref()))
                .collect(),
        }
    }

    /// Adds a textual pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.rules.extend(EgressRule::parse(pattern));
        self
    }

    /// Adds a rule, normalising its host name the way patterns are.
    /// Rules with a blank host name are skipped.
    #[must_use]
    pub fn with_rule(mut self, rule: EgressRule) -> Self {
        self.rules.extend(rule.normalized());
        self
    }

    /// Returns the configured rules.
    #[must_use]
    pub fn rules(&self) -> &[EgressRule] {
        &self.rules
    }
}

impl Default for AllowlistEgressPolicy {
    fn default() -> Self {
        Self::local_default()
    }
}

impl EgressPolicy for AllowlistEgressPolicy {
    fn permits(&self, domain: &str) -> bool {
        let host = normalize(domain);
        !host.is_empty() && self.rules.iter().any(|rule| rule.matches(&host))
    }
}

fn normalize(value: &str) -> String {
    value.trim().trim_end_matches('.').to_ascii_lowercase()
}
