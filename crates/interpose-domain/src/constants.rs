//! Domain layer constants
//!
//! Names shared between the interception core and the infrastructure
//! collaborators.

/// Name of the interface every interceptor component satisfies
pub const INTERCEPTOR_CAPABILITY_TYPE: &str = "IInterceptor";

/// Metadata key holding explicitly associated interceptor services
pub const INTERCEPTORS_METADATA_KEY: &str = "interpose.interception.interceptors";

/// Metadata key holding interceptor services declared on the implementation type
pub const DECLARED_INTERCEPTORS_METADATA_KEY: &str = "interpose.interception.declared-interceptors";
