//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, GatewayMode};
use crate::config::validation::{join_errors, validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay the environment surface onto a config, read once at startup.
///
/// `GATEWAY_MODE` selects the process mode; the host variables feed the
/// allowlist and the webhook predicate. Empty values are ignored.
pub fn apply_env_overrides(config: &mut GatewayConfig) {
    match std::env::var("GATEWAY_MODE").as_deref() {
        Ok("development") => config.mode = GatewayMode::Development,
        Ok("production") => config.mode = GatewayMode::Production,
        Ok(other) if !other.is_empty() => {
            tracing::warn!(value = other, "Unrecognized GATEWAY_MODE, keeping configured mode");
        }
        _ => {}
    }

    let host_vars: [(&str, &mut Option<String>); 4] = [
        ("APP_BASE_HOST", &mut config.hosts.app_base_host),
        ("AUTH_URL", &mut config.hosts.auth_url),
        ("MARKETING_URL", &mut config.hosts.marketing_url),
        ("WEBHOOK_BASE_HOST", &mut config.hosts.webhook_base_host),
    ];
    for (var, slot) in host_vars {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                *slot = Some(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            mode = "development"

            [hosts]
            app_base_host = "app.papermark.io"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, GatewayMode::Development);
        assert_eq!(
            config.hosts.app_base_host.as_deref(),
            Some("app.papermark.io")
        );
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(!config.viewer.blocked_pathnames.is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = std::env::temp_dir().join("tenant-gateway-loader-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        fs::write(&path, "[listener]\nbind_address = \"nope\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("bind address"));
    }
}
