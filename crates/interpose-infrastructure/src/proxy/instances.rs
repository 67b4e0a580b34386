//! Proxy Instances
//!
//! [`ClassProxy`] stands in for an instance of a generated subclass: it
//! owns the base-class part it extends. [`InterfaceProxy`] wraps a target
//! it does not own and is only reachable through the interfaces it
//! implements.

use std::any::Any;

use interpose_domain::error::Result;
use interpose_domain::ports::{Component, Instance};
use interpose_domain::value_objects::TypeRef;
use interpose_domain::Value;

use super::dispatch::ProxyDispatch;

/// Instance of a generated class proxy type
pub struct ClassProxy {
    base: Instance,
    dispatch: ProxyDispatch,
}

impl ClassProxy {
    pub(crate) fn new(base: Instance, dispatch: ProxyDispatch) -> Self {
        Self { base, dispatch }
    }

    /// The base-class part of the proxy
    pub fn base(&self) -> &Instance {
        &self.base
    }

    /// The mixin implementing `interface`, if any
    pub fn mixin(&self, interface: &TypeRef) -> Option<&Instance> {
        self.dispatch.mixin_for_interface(interface)
    }

    /// Number of interceptors the proxy was constructed with
    pub fn interceptor_count(&self) -> usize {
        self.dispatch.interceptors.len()
    }
}

impl Component for ClassProxy {
    fn runtime_type(&self) -> TypeRef {
        self.dispatch.proxy_type.clone()
    }

    fn invoke(&self, method: &str, arguments: &[Value]) -> Result<Value> {
        self.dispatch.dispatch(self.base.as_ref(), method, arguments)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Delegating proxy over a target instance or remote-call stub
pub struct InterfaceProxy {
    target: Instance,
    dispatch: ProxyDispatch,
}

impl InterfaceProxy {
    pub(crate) fn new(target: Instance, dispatch: ProxyDispatch) -> Self {
        Self { target, dispatch }
    }

    /// The wrapped target
    pub fn target(&self) -> &Instance {
        &self.target
    }

    /// The interface the proxy was generated for
    pub fn primary_interface(&self) -> &TypeRef {
        &self.dispatch.target_type
    }

    /// The mixin implementing `interface`, if any
    pub fn mixin(&self, interface: &TypeRef) -> Option<&Instance> {
        self.dispatch.mixin_for_interface(interface)
    }

    /// Number of interceptors the proxy forwards through
    pub fn interceptor_count(&self) -> usize {
        self.dispatch.interceptors.len()
    }
}

impl Component for InterfaceProxy {
    fn runtime_type(&self) -> TypeRef {
        self.dispatch.proxy_type.clone()
    }

    fn invoke(&self, method: &str, arguments: &[Value]) -> Result<Value> {
        self.dispatch.dispatch(self.target.as_ref(), method, arguments)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
