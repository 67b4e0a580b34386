//! Application Layer - interpose
//!
//! Interceptor resolution and proxy injection for a dependency-injection
//! container.
//!
//! ## Architecture
//!
//! The application layer:
//! - Looks up interceptor declarations for implementation types
//! - Stores and merges per-registration interceptor associations
//! - Swaps concrete registrations for generated subclass proxies
//! - Wraps activated instances (and remote-call stubs) in interface proxies
//! - Exposes the chainable registration extensions
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `interpose-domain`: value objects and the container, proxy generator
//!   and remoting ports
//! - `linkme` for link-time declarations, `dashmap` for shared memo tables

pub mod interception;
pub mod registration;

pub use interception::{
    ClassInterceptionStrategy, DeclarationTable, INTERCEPT_DECLARATIONS, InterceptDeclaration,
    InterceptorServices, InterfaceInterceptionMiddleware, TransparentProxyMiddleware,
};
pub use registration::{Interception, InterceptionExt, ScanningInterceptionExt};
