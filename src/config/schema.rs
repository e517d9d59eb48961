//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Process mode. Production classifies unknown hosts as tenant
    /// domains; development never does.
    pub mode: GatewayMode,

    /// First-party host configuration feeding the allowlist.
    pub hosts: HostsConfig,

    /// Upstream addresses for the four dispatch lanes.
    pub upstreams: UpstreamsConfig,

    /// Viewer-path policy.
    pub viewer: ViewerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Process mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Development,
    #[default]
    Production,
}

/// First-party host values, resolved into the allowlist at startup.
///
/// Each value may be an absolute URL or a bare hostname; malformed values
/// contribute no allowlist entry (see `config::allowlist`).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostsConfig {
    /// Main application host (e.g., "app.papermark.io").
    pub app_base_host: Option<String>,

    /// Auth provider URL (e.g., "https://app.papermark.io").
    pub auth_url: Option<String>,

    /// Marketing site URL (e.g., "https://www.papermark.com").
    pub marketing_url: Option<String>,

    /// Base host for inbound webhook delivery (e.g., "hooks.papermark.io").
    /// Also drives the webhook-host predicate in the dispatcher.
    pub webhook_base_host: Option<String>,
}

/// Upstream addresses the four dispatch lanes forward to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Main application handler (also the pass-through origin).
    pub app: String,

    /// Analytics ingestion proxy.
    pub analytics: String,

    /// Webhook ingress handler (does its own signature verification).
    pub webhooks: String,

    /// Tenant-domain handler (resolves tenant by host).
    pub domains: String,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            app: "127.0.0.1:3000".to_string(),
            analytics: "127.0.0.1:3001".to_string(),
            webhooks: "127.0.0.1:3002".to_string(),
            domains: "127.0.0.1:3003".to_string(),
        }
    }
}

/// Viewer-path policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Substrings that disallow a viewer path when contained in it.
    /// Consulted only for `/view/` paths.
    pub blocked_pathnames: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            blocked_pathnames: default_blocked_pathnames(),
        }
    }
}

fn default_blocked_pathnames() -> Vec<String> {
    [
        "/phpmyadmin",
        "/server-status",
        "/wordpress",
        "/wp-admin",
        "/_all_dbs",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
