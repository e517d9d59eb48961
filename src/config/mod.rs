//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + environment overrides
//!     → loader.rs (parse & deserialize, env overlay)
//!     → validation.rs (semantic checks)
//!     → allowlist.rs (resolve first-party hosts)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the server's state snapshot
//!     → subsystems observe new config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Malformed host values shrink the allowlist instead of failing

pub mod allowlist;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use allowlist::HostAllowlist;
pub use schema::GatewayConfig;
pub use schema::GatewayMode;
pub use schema::HostsConfig;
pub use schema::UpstreamsConfig;
