//! Dispatch router: one ordered lane decision per request.
//!
//! # Responsibilities
//! - Compose host and path classification into a single decision
//! - Guarantee a deterministic precedence order across overlapping rules
//! - Return the lane outcome; delegation itself lives in the HTTP layer
//!
//! # Evaluation order (first match wins)
//! 1. analytics path            → DelegateAnalytics
//! 2. webhook host              → DelegateWebhook
//! 3. tenant host, no bypass    → DelegateCustomDomain
//! 4. ordinary app path         → DelegateApp
//! 5. disallowed viewer path    → RewriteNotFound
//! 6. everything else           → PassThrough

use crate::config::allowlist::HostAllowlist;
use crate::config::schema::{GatewayConfig, GatewayMode};
use crate::routing::host::{classify_host, is_webhook_host};
use crate::routing::path::{PathCategory, PathClassifier};

/// Terminal outcome of the dispatch router. Produced fresh per request and
/// consumed immediately by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    DelegateAnalytics,
    DelegateWebhook,
    DelegateCustomDomain,
    DelegateApp,

    /// Respond 404 inline with the path rewritten to the not-found route.
    RewriteNotFound,

    /// Forward the request unmodified.
    PassThrough,
}

impl RoutingDecision {
    /// Label used for logging and metrics.
    pub fn lane(self) -> &'static str {
        match self {
            Self::DelegateAnalytics => "analytics",
            Self::DelegateWebhook => "webhooks",
            Self::DelegateCustomDomain => "domains",
            Self::DelegateApp => "app",
            Self::RewriteNotFound => "not_found",
            Self::PassThrough => "pass_through",
        }
    }
}

/// Immutable dispatch state compiled from one config snapshot.
///
/// Classification is pure given `(host, path)`; concurrent requests share a
/// snapshot without coordination, and reloads swap the whole snapshot
/// atomically.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: GatewayMode,
    allowlist: HostAllowlist,
    webhook_base_host: Option<String>,
    paths: PathClassifier,
}

impl Dispatcher {
    /// Compile a dispatcher from a validated config.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            mode: config.mode,
            allowlist: HostAllowlist::from_hosts(&config.hosts),
            webhook_base_host: config.hosts.webhook_base_host.clone(),
            paths: PathClassifier::new(config.viewer.blocked_pathnames.clone()),
        }
    }

    /// Decide the handling lane for a request. First match wins; no two
    /// lanes fire for the same request.
    pub fn dispatch(&self, host: &str, path: &str) -> RoutingDecision {
        let category = self.paths.classify(path);

        // 1. Analytics ingestion wins over everything, including webhook
        //    hosts and tenant domains.
        if category == PathCategory::Analytics {
            return RoutingDecision::DelegateAnalytics;
        }

        // 2. Webhook hosts are dedicated: any path on them is ingress.
        if is_webhook_host(host, self.webhook_base_host.as_deref()) {
            return RoutingDecision::DelegateWebhook;
        }

        // 3. Tenant domains, unless the path must reach first-party auth
        //    and verification pages.
        let host_class = classify_host(host, self.mode, &self.allowlist);
        if host_class.is_tenant_facing() && category != PathCategory::ViewerBypass {
            return RoutingDecision::DelegateCustomDomain;
        }

        // 4. Ordinary application traffic.
        if category == PathCategory::StandardApp {
            return RoutingDecision::DelegateApp;
        }

        // 5. Disallowed viewer paths are answered with a rewritten 404.
        if category == PathCategory::Viewer && self.paths.is_blocked_viewer_path(path) {
            return RoutingDecision::RewriteNotFound;
        }

        // 6. Everything else passes through untouched.
        RoutingDecision::PassThrough
    }

    pub fn mode(&self) -> GatewayMode {
        self.mode
    }

    pub fn allowlist(&self) -> &HostAllowlist {
        &self.allowlist
    }
}
