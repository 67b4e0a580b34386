//! Call Dispatch
//!
//! Routes a dynamic call made on a proxy:
//!
//! 1. members of a mixin interface go straight to the mixin
//! 2. overridable members the hook accepts run the interceptor chain,
//!    ending at the target
//! 3. everything else calls the target directly

use std::sync::Arc;

use interpose_domain::error::Result;
use interpose_domain::ports::{
    Component, Instance, Interceptor, InterceptorSelector, Invocation, ProxyGenerationHook,
    unknown_member,
};
use interpose_domain::value_objects::{MethodInfo, TypeRef};
use interpose_domain::Value;

/// Interception state carried by a proxy instance
#[derive(Clone)]
pub struct ProxyDispatch {
    pub(crate) proxy_type: TypeRef,
    pub(crate) target_type: TypeRef,
    pub(crate) mixins: Vec<Instance>,
    pub(crate) interceptors: Vec<Arc<dyn Interceptor>>,
    pub(crate) selector: Option<Arc<dyn InterceptorSelector>>,
    pub(crate) hook: Option<Arc<dyn ProxyGenerationHook>>,
}

impl ProxyDispatch {
    /// Mixin whose interfaces declare `method`
    pub fn mixin_for_method(&self, method: &str) -> Option<&Instance> {
        self.mixins.iter().find(|mixin| {
            mixin
                .runtime_type()
                .interfaces()
                .iter()
                .any(|interface| interface.find_method(method).is_some())
        })
    }

    /// Mixin implementing `interface`
    pub fn mixin_for_interface(&self, interface: &TypeRef) -> Option<&Instance> {
        self.mixins.iter().find(|mixin| mixin.supports(interface))
    }

    fn intercepts(&self, method: &MethodInfo) -> bool {
        method.is_virtual
            && self
                .hook
                .as_ref()
                .is_none_or(|hook| hook.should_intercept_method(&self.target_type, method))
    }

    fn select(&self, method: &MethodInfo) -> Vec<Arc<dyn Interceptor>> {
        match &self.selector {
            Some(selector) => {
                selector.select_interceptors(&self.target_type, method, &self.interceptors)
            }
            None => self.interceptors.clone(),
        }
    }

    /// Route a call on the proxy to a mixin, the interceptor chain or `target`
    pub fn dispatch(&self, target: &dyn Component, method: &str, arguments: &[Value]) -> Result<Value> {
        if let Some(mixin) = self.mixin_for_method(method) {
            return mixin.invoke(method, arguments);
        }

        let Some(info) = self.proxy_type.find_method(method) else {
            return unknown_member(&self.proxy_type, method);
        };
        if !self.intercepts(info) {
            return target.invoke(method, arguments);
        }

        let interceptors = self.select(info);
        let proceed = |member: &MethodInfo, arguments: &[Value]| target.invoke(&member.name, arguments);
        Invocation::new(
            &self.proxy_type,
            info,
            arguments.to_vec(),
            &interceptors,
            &proceed,
        )
        .run()
    }
}
