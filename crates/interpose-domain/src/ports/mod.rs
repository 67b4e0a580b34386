//! Domain Port Interfaces
//!
//! Defines all boundary contracts between the interception core and its
//! collaborators. The core depends only on these traits; the container,
//! the proxy generator and the remoting layer implement them.
//!
//! ## Organization
//!
//! - **component** - resolved objects and dynamic member calls
//! - **interception** - interceptors, selectors, hooks, invocations, generation options
//! - **proxy** - the dynamic proxy generator
//! - **remoting** - transparent-proxy capability queries
//! - **container** - registration configuration and activation hooks

/// Resolved objects
pub mod component;
/// Registration configuration and activation hooks
pub mod container;
/// Interceptor capability and proxy generation options
pub mod interception;
/// Dynamic proxy generator
pub mod proxy;
/// Remoting capability queries
pub mod remoting;

// Re-export commonly used port traits for convenience
pub use component::{Component, Instance, unknown_member};
pub use container::{
    ActivationContext, ActivationMiddleware, ComponentRegistrationView, ConfigurationAction,
    Metadata, MetadataValue, Next, PreparingEvent, PreparingHandler, RegistrationConfigurator,
    ResolveContext, ScanningConfigurator,
};
pub use interception::{
    Interceptor, InterceptorComponent, InterceptorSelector, Invocation, InvocationTarget,
    ProxyGenerationHook, ProxyGenerationOptions,
};
pub use proxy::ProxyGenerator;
pub use remoting::{CapabilityAnswer, RemotingServices};
