//! Proxy Generator Port
//!
//! Narrow interface to the dynamic proxy generator. The interception core
//! never builds proxies itself; it asks a generator for a subclass proxy
//! type (class interception) or for a delegating proxy instance wrapped
//! around an existing target (interface interception).

use std::sync::Arc;

use crate::error::Result;
use crate::ports::component::Instance;
use crate::ports::interception::{Interceptor, ProxyGenerationOptions};
use crate::value_objects::{TypeRef, Visibility};

/// Builds proxy types and proxy instances
pub trait ProxyGenerator: Send + Sync {
    /// Generated subclass of `base` that also implements `additional_interfaces`
    ///
    /// Every constructor of the generated type takes, ahead of the base
    /// constructor's own parameters: one argument per mixin in `options`,
    /// then the interceptor list, then the selector when `options` has one.
    /// Only overridable members of `base` are intercepted.
    fn create_class_proxy_type(
        &self,
        base: &TypeRef,
        additional_interfaces: &[TypeRef],
        options: &ProxyGenerationOptions,
    ) -> Result<TypeRef>;

    /// Delegating proxy implementing `interface` and `additional_interfaces`
    /// that forwards to `target` once interceptors proceed
    fn create_interface_proxy_with_target(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        options: Option<&ProxyGenerationOptions>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Instance>;

    /// Like [`create_interface_proxy_with_target`](Self::create_interface_proxy_with_target),
    /// but the target is only known through its interface (a remoting stub)
    fn create_interface_proxy_with_target_interface(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        options: Option<&ProxyGenerationOptions>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Instance>;

    /// Whether generated proxies can implement or extend `target_type`
    fn is_accessible(&self, target_type: &TypeRef) -> bool {
        match target_type.visibility() {
            Visibility::Public => true,
            Visibility::Internal { visible_to_proxies } => visible_to_proxies,
            Visibility::Private => false,
        }
    }
}
