//! Lottery Server
//!
//! HTTP transport for `lottery-core`: configuration, startup, and a JSON
//! API that maps requests onto draw, redraw, revoke and accessor calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Startup from snapshot or source files
pub mod bootstrap;

/// TOML server configuration
pub mod config;

/// Router and request handlers
pub mod routes;

pub use bootstrap::{open_lottery, StartMode};
pub use config::{ConfigError, ServerConfig};
pub use routes::{router, AppState, Envelope};
