//! # interpose domain
//!
//! Core types and port traits for proxy-based interception in a
//! dependency-injection container.
//!
//! - [`value_objects`] - service references, type descriptors, constructor parameters
//! - [`ports`] - component model, interceptor capability, proxy generator,
//!   remoting and container contracts
//! - [`error`] - the domain error type

/// Domain layer constants
pub mod constants;
/// Error handling types
pub mod error;
/// Port traits implemented by collaborators
pub mod ports;
/// Immutable value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{Component, Instance, Interceptor, Invocation, ProxyGenerationOptions};
pub use value_objects::{ServiceRef, TypeInfo, TypeRef};

/// Dynamic value passed to and returned from member calls
pub use serde_json::Value;
