//! Host classification.
//!
//! # Responsibilities
//! - Classify a `Host` header as first-party, local-dev, or tenant-owned
//! - Recognize hosts dedicated to inbound webhook delivery
//!
//! # Design Decisions
//! - Classification is case-insensitive (per HTTP spec)
//! - Total over its input: an empty/absent host is the empty string and
//!   never classifies as a tenant domain by accident
//! - Development mode never yields `Custom`; `.local` and `papermark.dev`
//!   hosts classify `Local` so tenant-domain flows can be exercised locally

use crate::config::allowlist::HostAllowlist;
use crate::config::schema::GatewayMode;

/// First-party apex domains recognized by substring in production.
const FIRST_PARTY_APEX_DOMAINS: [&str; 2] = ["papermark.io", "papermark.com"];

/// Preview deployments on the platform PaaS.
const PAAS_WILDCARD_SUFFIX: &str = ".vercel.app";

/// Development-only host markers.
const LOCAL_DEV_MARKERS: [&str; 2] = [".local", "papermark.dev"];

/// Outcome of classifying a `Host` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClassification {
    /// Development-only host (`.local`, `papermark.dev`); the development
    /// counterpart of `Custom`.
    Local,

    /// First-party or configured host.
    Allowed,

    /// Tenant-owned viewer domain (production only).
    Custom,
}

impl HostClassification {
    /// Hosts that receive tenant-domain handling.
    pub fn is_tenant_facing(self) -> bool {
        matches!(self, Self::Custom | Self::Local)
    }
}

/// Classify a host against the allowlist under the given mode.
///
/// Pure and total: every host string maps to exactly one classification.
pub fn classify_host(
    host: &str,
    mode: GatewayMode,
    allowlist: &HostAllowlist,
) -> HostClassification {
    let h = host.to_lowercase();

    // An absent host cannot belong to a tenant.
    if h.is_empty() {
        return HostClassification::Allowed;
    }

    if mode == GatewayMode::Development {
        if LOCAL_DEV_MARKERS.iter().any(|marker| h.contains(marker)) {
            return HostClassification::Local;
        }
        // Arbitrary hosts default to the app domain in development.
        return HostClassification::Allowed;
    }

    if FIRST_PARTY_APEX_DOMAINS.iter().any(|apex| h.contains(apex))
        || h.ends_with(PAAS_WILDCARD_SUFFIX)
        || allowlist.contains(&h)
    {
        return HostClassification::Allowed;
    }

    HostClassification::Custom
}

/// True iff `host` equals or is a subdomain of the configured webhook base
/// host. An unconfigured base never matches.
pub fn is_webhook_host(host: &str, webhook_base_host: Option<&str>) -> bool {
    let Some(base) = webhook_base_host else {
        return false;
    };
    if base.is_empty() {
        return false;
    }

    let h = host.to_lowercase();
    let base = base.to_lowercase();
    h == base || h.ends_with(&format!(".{base}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::HostsConfig;

    fn allowlist_with(app_base_host: &str) -> HostAllowlist {
        HostAllowlist::from_hosts(&HostsConfig {
            app_base_host: Some(app_base_host.to_string()),
            ..HostsConfig::default()
        })
    }

    #[test]
    fn test_localhost_is_allowed_in_any_mode() {
        let allowlist = HostAllowlist::default();
        for mode in [GatewayMode::Development, GatewayMode::Production] {
            assert_eq!(
                classify_host("localhost", mode, &allowlist_with("x.example.com")),
                HostClassification::Allowed
            );
        }
        // Even with an empty allowlist, dev mode stays non-custom.
        assert_eq!(
            classify_host("localhost", GatewayMode::Development, &allowlist),
            HostClassification::Allowed
        );
    }

    #[test]
    fn test_development_never_returns_custom() {
        let allowlist = HostAllowlist::default();
        for host in [
            "",
            "tenant.example.com",
            "docs.tenant.local",
            "demo.papermark.dev",
            "UPPER.CASE.COM",
        ] {
            let classification = classify_host(host, GatewayMode::Development, &allowlist);
            assert_ne!(classification, HostClassification::Custom, "host {host:?}");
        }
    }

    #[test]
    fn test_development_local_markers() {
        let allowlist = HostAllowlist::default();
        assert_eq!(
            classify_host("docs.tenant.local", GatewayMode::Development, &allowlist),
            HostClassification::Local
        );
        assert_eq!(
            classify_host("demo.papermark.dev", GatewayMode::Development, &allowlist),
            HostClassification::Local
        );
        // Markers are development-only.
        assert_eq!(
            classify_host("demo.papermark.dev", GatewayMode::Production, &allowlist),
            HostClassification::Custom
        );
    }

    #[test]
    fn test_production_first_party_domains() {
        let allowlist = HostAllowlist::default();
        assert_eq!(
            classify_host("app.papermark.io", GatewayMode::Production, &allowlist),
            HostClassification::Allowed
        );
        assert_eq!(
            classify_host("WWW.PAPERMARK.COM", GatewayMode::Production, &allowlist),
            HostClassification::Allowed
        );
        assert_eq!(
            classify_host("preview-abc123.vercel.app", GatewayMode::Production, &allowlist),
            HostClassification::Allowed
        );
    }

    #[test]
    fn test_production_unknown_host_is_custom() {
        let allowlist = allowlist_with("app.papermark.io");
        assert_eq!(
            classify_host("tenant.example.com", GatewayMode::Production, &allowlist),
            HostClassification::Custom
        );
        // An empty host degrades to non-custom, never a tenant domain.
        assert_eq!(
            classify_host("", GatewayMode::Production, &allowlist),
            HostClassification::Allowed
        );
    }

    #[test]
    fn test_allowlist_membership_wins_in_production() {
        let allowlist = allowlist_with("docs.acme.com");
        assert_eq!(
            classify_host("docs.acme.com", GatewayMode::Production, &allowlist),
            HostClassification::Allowed
        );
        assert_eq!(
            classify_host("Docs.Acme.Com", GatewayMode::Production, &allowlist),
            HostClassification::Allowed
        );
    }

    #[test]
    fn test_webhook_host_predicate() {
        let base = Some("hooks.papermark.io");
        assert!(is_webhook_host("hooks.papermark.io", base));
        assert!(is_webhook_host("HOOKS.PAPERMARK.IO", base));
        assert!(is_webhook_host("t1.hooks.papermark.io", base));
        assert!(!is_webhook_host("evilhooks.papermark.io", base));
        assert!(!is_webhook_host("app.papermark.io", base));
        assert!(!is_webhook_host("hooks.papermark.io", None));
        assert!(!is_webhook_host("hooks.papermark.io", Some("")));
    }
}
