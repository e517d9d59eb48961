//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses (listener, upstreams, admin, metrics)
//! - Catch degenerate viewer policy entries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("invalid upstream address `{address}` for lane `{lane}`")]
    InvalidUpstream { lane: &'static str, address: String },

    #[error("invalid admin bind address `{0}`")]
    InvalidAdminAddress(String),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),

    #[error("blocked pathname entries must be non-empty")]
    EmptyBlockedPathname,

    #[error("admin API enabled without an api_key")]
    MissingAdminKey,
}

/// Render a validation error list the way `ConfigError` displays it.
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Semantic checks over an already-deserialized config.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    // Upstreams may be "host:port", so validate as URI authorities.
    let lanes = [
        ("app", &config.upstreams.app),
        ("analytics", &config.upstreams.analytics),
        ("webhooks", &config.upstreams.webhooks),
        ("domains", &config.upstreams.domains),
    ];
    for (lane, address) in lanes {
        if Authority::from_str(address).is_err() {
            errors.push(ValidationError::InvalidUpstream {
                lane,
                address: address.clone(),
            });
        }
    }

    if config.admin.enabled {
        if config.admin.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAdminAddress(
                config.admin.bind_address.clone(),
            ));
        }
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::MissingAdminKey);
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.viewer.blocked_pathnames.iter().any(String::is_empty) {
        errors.push(ValidationError::EmptyBlockedPathname);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.upstreams.app = String::new();
        config.viewer.blocked_pathnames.push(String::new());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyBlockedPathname));
    }

    #[test]
    fn test_admin_requires_key() {
        let mut config = GatewayConfig::default();
        config.admin.enabled = true;
        config.admin.api_key = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingAdminKey]);
    }
}
