//! # interpose
//!
//! Interceptors and dynamic proxies for a dependency-injection container.
//!
//! Registrations opt into interception; when the container activates them,
//! the instance handed out is a proxy that routes calls through the
//! associated interceptors (logging, caching, retries) before reaching the
//! real object. Consumers cannot tell the proxy from its target.
//!
//! ## Features
//!
//! - **Class interception**: a generated subclass proxy replaces the
//!   implementation type; overridable members are intercepted
//! - **Interface interception**: activated instances are wrapped in a
//!   delegating proxy implementing every exposed interface
//! - **Transparent-proxy interception**: remote-call stubs are checked for
//!   the requested interfaces, then wrapped like local instances
//! - **Declarations and associations**: interceptors attached to types
//!   (link time or composition root) and to single registrations, merged
//!   at resolution time
//! - **Generation options**: mixins, interceptor selectors, inclusion hooks
//!
//! ## Example
//!
//! ```ignore
//! use interpose::prelude::*;
//!
//! let runtime = bootstrap(&AppConfig::default());
//! let mut builder = runtime.container_builder();
//! builder.register_instance(InterceptorComponent::instance(&add_one_type, AddOne));
//! builder
//!     .register_type(&calculator_type)
//!     .enable_class_interceptors(runtime.interception())?
//!     .intercepted_by_types(&[add_one_type.clone()])?;
//!
//! let container = builder.build()?;
//! let calculator = container.resolve_type(&calculator_type)?;
//! assert_eq!(calculator.invoke("add", &[json!(5), json!(5)])?, json!(11));
//! ```
//!
//! ## Architecture
//!
//! - `domain` - value objects, the error type and every port trait
//! - `application` - declarations, associations and the interception strategies
//! - `infrastructure` - container, proxy generator, remoting, config and logging

/// Domain layer - value objects, errors and port traits
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use interpose_domain::*;
}

/// Application layer - interceptor resolution and proxy injection
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use interpose_application::*;
}

/// Infrastructure layer - container, proxy generator, remoting, config
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use interpose_infrastructure::*;
}

/// Everything needed to configure and resolve intercepted components
pub mod prelude {
    pub use interpose_application::{
        DeclarationTable, Interception, InterceptionExt, ScanningInterceptionExt,
    };
    pub use interpose_domain::error::{Error, Result};
    pub use interpose_domain::ports::{
        Component, Instance, Interceptor, InterceptorComponent, InterceptorSelector, Invocation,
        ProxyGenerationHook, ProxyGenerationOptions,
    };
    pub use interpose_domain::value_objects::{
        ConstructorInfo, MethodInfo, Parameter, ParameterInfo, ServiceRef, TypeInfo, TypeRef,
        ValueKind, Visibility,
    };
    pub use interpose_infrastructure::config::{AppConfig, ConfigLoader};
    pub use interpose_infrastructure::di::{Container, ContainerBuilder, bootstrap};
    pub use interpose_infrastructure::remoting::TransparentProxy;
    pub use serde_json::{Value, json};
}

// Re-export commonly used types at the crate root
pub use domain::{Component, Error, Instance, Result, ServiceRef, TypeInfo, TypeRef};
pub use infrastructure::{AppConfig, Container, ContainerBuilder, bootstrap};
