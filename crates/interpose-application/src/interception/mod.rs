//! Interception Core
//!
//! Resolves which interceptors apply to a registration and injects the
//! right proxy during activation.
//!
//! ## Organization
//!
//! - **declarations** - type-level interceptor declarations
//! - **associations** - per-registration association store and merge
//! - **class_proxy** - subclass proxies for concrete types
//! - **interface_proxy** - delegating proxies over activated instances
//! - **transparent_proxy** - delegating proxies over remote-call stubs

/// Per-registration association store
pub mod associations;
/// Subclass proxies for concrete types
pub mod class_proxy;
/// Type-level interceptor declarations
pub mod declarations;
/// Delegating proxies over activated instances
pub mod interface_proxy;
/// Delegating proxies over remote-call stubs
pub mod transparent_proxy;

pub use associations::{
    AssociationRecord, InterceptorServices, associate, effective_interceptors, record_declared,
    resolve_interceptors,
};
pub use class_proxy::ClassInterceptionStrategy;
pub use declarations::{DeclarationTable, INTERCEPT_DECLARATIONS, InterceptDeclaration};
pub use interface_proxy::{
    InterfaceInterceptionMiddleware, ensure_interface_interception_applies, proxyable_interfaces,
};
pub use transparent_proxy::TransparentProxyMiddleware;
