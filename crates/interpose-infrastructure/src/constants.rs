//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `interpose_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "interpose.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "interpose";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "INTERPOSE";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding a tracing filter directive
pub const LOG_FILTER_ENV_VAR: &str = "INTERPOSE_LOG";

/// File stem used for rolling log files
pub const LOG_FILE_STEM: &str = "interpose";

// ============================================================================
// PROXY GENERATION CONSTANTS
// ============================================================================

/// Namespace prefix for generated proxy type names
pub const DEFAULT_PROXY_TYPE_PREFIX: &str = "Proxies";

/// Suffix appended to the proxied type's name
pub const PROXY_TYPE_SUFFIX: &str = "Proxy";

// ============================================================================
// CONTAINER CONSTANTS
// ============================================================================

/// Maximum nesting of resolutions before a circular dependency is assumed
pub const DEFAULT_MAX_RESOLVE_DEPTH: usize = 50;
