//! Container configuration types

use crate::constants::DEFAULT_MAX_RESOLVE_DEPTH;
use serde::{Deserialize, Serialize};

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Nesting depth after which a resolution is treated as circular
    pub max_resolve_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
        }
    }
}
