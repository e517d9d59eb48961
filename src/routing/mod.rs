//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → dispatch.rs (ordered lane decision)
//!     → host.rs (host classification, webhook predicate)
//!     → path.rs (path classification, viewer denylist)
//!     → Return: RoutingDecision
//!
//! Dispatcher Compilation (at startup and on reload):
//!     GatewayConfig
//!     → Resolve host allowlist
//!     → Compile path patterns
//!     → Freeze as immutable Dispatcher
//! ```
//!
//! # Design Decisions
//! - Dispatcher compiled per config snapshot, immutable at runtime
//! - Patterns precompiled, never rebuilt in the hot path
//! - Deterministic: first match wins, no two lanes fire per request
//! - Every classification is total; malformed input degrades to a safe
//!   default instead of raising

pub mod dispatch;
pub mod host;
pub mod path;

pub use dispatch::{Dispatcher, RoutingDecision};
pub use host::HostClassification;
pub use path::{PathCategory, PathClassifier};
