//! First-party host allowlist resolution.
//!
//! # Responsibilities
//! - Resolve each configured host value to a hostname (URL host or bare host)
//! - Collect "localhost" plus the resolved hosts, lower-cased, deduplicated
//! - Absorb malformed values silently (a bad URL contributes no entry)
//!
//! # Design Decisions
//! - Built once per config snapshot, immutable afterwards
//! - Never raises: misconfiguration degrades to a smaller allowlist

use std::collections::HashSet;

use url::Url;

use crate::config::schema::HostsConfig;

/// Set of lower-cased first-party hostnames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAllowlist {
    hosts: HashSet<String>,
}

impl HostAllowlist {
    /// Build the allowlist from the configured first-party host values.
    pub fn from_hosts(hosts: &HostsConfig) -> Self {
        let mut set = HashSet::new();
        set.insert("localhost".to_string());

        let configured = [
            hosts.app_base_host.as_deref(),
            hosts.auth_url.as_deref(),
            hosts.marketing_url.as_deref(),
            hosts.webhook_base_host.as_deref(),
        ];
        for value in configured.into_iter().flatten() {
            if let Some(host) = parse_host_from_url(value) {
                set.insert(host.to_lowercase());
            }
        }

        Self { hosts: set }
    }

    /// Exact membership test. Callers are expected to pass a lower-cased host.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Sorted entries, for introspection.
    pub fn entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = self.hosts.iter().cloned().collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Resolve a configured value to a hostname.
///
/// An absolute URL contributes its host component (with the port when the
/// URL carries a non-default one, matching what a `Host` header would hold).
/// A value that does not parse as a URL is kept verbatim when it contains no
/// `/`; anything else contributes nothing.
pub fn parse_host_from_url(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(value) {
        return match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => Some(format!("{host}:{port}")),
            (Some(host), None) => Some(host.to_string()),
            (None, _) => None,
        };
    }
    if value.contains('/') {
        None
    } else {
        Some(value.to_string())
    }
}
