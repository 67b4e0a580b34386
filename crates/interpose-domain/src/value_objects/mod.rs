//! Domain Value Objects
//!
//! Immutable value objects shared by the container, the proxy generator and
//! the interception core.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`ServiceRef`] | Structurally comparable identifier of a requestable service |
//! | [`TypeInfo`] | Class or interface descriptor: interfaces, members, constructors |
//! | [`ParameterInfo`] | What a constructor parameter expects |
//! | [`Parameter`] | Argument supplied for a constructor parameter |

/// Constructor parameters and arguments
pub mod parameters;
/// Service references
pub mod service;
/// Type descriptors
pub mod types;

// Re-export commonly used value objects
pub use parameters::{Argument, Arguments, Parameter, ParameterInfo, ParameterKind};
pub use service::{ServiceRef, interceptor_type};
pub use types::{
    Activator, ConstructorInfo, MethodInfo, TypeBuilder, TypeInfo, TypeKind, TypeRef, ValueKind,
    Visibility,
};
