//! Main application configuration

use serde::{Deserialize, Serialize};

use super::{ContainerConfig, LoggingConfig, ProxyConfig};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Proxy generator configuration
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Container configuration
    #[serde(default)]
    pub container: ContainerConfig,
}
