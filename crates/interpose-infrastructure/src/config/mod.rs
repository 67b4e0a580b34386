//! Configuration
//!
//! Typed configuration for the container, the proxy generator and logging,
//! loaded with Figment from defaults, an optional TOML file and
//! `INTERPOSE_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, ContainerConfig, LoggingConfig, ProxyConfig};
