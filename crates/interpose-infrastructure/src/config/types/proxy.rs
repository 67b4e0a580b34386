//! Proxy generator configuration types

use crate::constants::DEFAULT_PROXY_TYPE_PREFIX;
use serde::{Deserialize, Serialize};

/// Proxy generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Namespace prefix for generated type names (`Proxies.AccountProxy`)
    pub type_name_prefix: String,

    /// Reuse a generated type when the same base, interfaces and options are requested again
    pub cache_generated_types: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            type_name_prefix: DEFAULT_PROXY_TYPE_PREFIX.to_string(),
            cache_generated_types: true,
        }
    }
}
