//! Service References
//!
//! A [`ServiceRef`] names something a component can be requested as. The
//! same value is used by registrations to expose services and by interceptor
//! declarations to point at interceptor components.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::constants::INTERCEPTOR_CAPABILITY_TYPE;
use crate::value_objects::types::{TypeInfo, TypeRef, ValueKind};

static INTERCEPTOR_TYPE: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface(INTERCEPTOR_CAPABILITY_TYPE)
        .method("Intercept", ValueKind::Unit)
        .build()
});

/// The interface every interceptor component is requested through
pub fn interceptor_type() -> TypeRef {
    Arc::clone(&INTERCEPTOR_TYPE)
}

/// Identifier of a requestable service; equality is structural
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceRef {
    /// Service requested by type
    Typed(TypeRef),
    /// Service requested by name only
    Named(String),
    /// Service requested by name within a type
    Keyed {
        /// Service key
        key: String,
        /// Type the key applies to
        service_type: TypeRef,
    },
}

impl ServiceRef {
    /// Service requested by type
    pub fn typed(service_type: &TypeRef) -> Self {
        Self::Typed(Arc::clone(service_type))
    }

    /// Service requested by name
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self::Named(name.into())
    }

    /// Service requested by name within a type
    pub fn keyed<S: Into<String>>(key: S, service_type: &TypeRef) -> Self {
        Self::Keyed {
            key: key.into(),
            service_type: Arc::clone(service_type),
        }
    }

    /// Interceptor service registered under `name`
    pub fn interceptor_named<S: Into<String>>(name: S) -> Self {
        Self::keyed(name, &interceptor_type())
    }

    /// Type carried by the reference, when it has one
    pub fn service_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Typed(service_type) | Self::Keyed { service_type, .. } => Some(service_type),
            Self::Named(_) => None,
        }
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(service_type) => write!(f, "{}", service_type.name()),
            Self::Named(name) => write!(f, "'{name}'"),
            Self::Keyed { key, service_type } => {
                write!(f, "({}) {}", key, service_type.name())
            }
        }
    }
}

impl From<&TypeRef> for ServiceRef {
    fn from(service_type: &TypeRef) -> Self {
        Self::typed(service_type)
    }
}
