//! Component Port
//!
//! Every object a container hands out is a [`Component`]: it knows its
//! runtime type, accepts dynamic member calls, and answers capability
//! queries (is it an interceptor? a selector?). Generated proxies are
//! components too, so callers cannot tell a proxy from its target.

use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::ports::interception::{Interceptor, InterceptorSelector};
use crate::value_objects::TypeRef;

/// Shared handle to a resolved component
pub type Instance = Arc<dyn Component>;

/// Object activated by a container
pub trait Component: Any + Send + Sync {
    /// Concrete type of this object
    fn runtime_type(&self) -> TypeRef;

    /// Call a member by name
    fn invoke(&self, method: &str, arguments: &[Value]) -> Result<Value>;

    /// Access the concrete object
    fn as_any(&self) -> &dyn Any;

    /// The interceptor capability, when this component provides it
    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        None
    }

    /// The selector capability, when this component provides it
    fn as_selector(self: Arc<Self>) -> Option<Arc<dyn InterceptorSelector>> {
        None
    }
}

impl dyn Component {
    /// Whether the component can be used as `service_type`
    pub fn supports(&self, service_type: &TypeRef) -> bool {
        self.runtime_type().is_assignable_to(service_type)
    }

    /// Call a member exposed through `service_type`, failing when the
    /// component does not implement it
    pub fn invoke_as(
        &self,
        service_type: &TypeRef,
        method: &str,
        arguments: &[Value],
    ) -> Result<Value> {
        if !self.supports(service_type) || service_type.find_method(method).is_none() {
            return Err(Error::missing_member(
                format!("{} as {}", self.runtime_type(), service_type),
                method,
            ));
        }
        self.invoke(method, arguments)
    }

    /// Borrow the concrete object
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Fail a dynamic call for a member the type does not have
pub fn unknown_member<T>(runtime_type: &TypeRef, method: &str) -> Result<T> {
    Err(Error::missing_member(runtime_type.name(), method))
}
