//! Interception Ports
//!
//! Contracts shared between interceptor authors, the proxy generator and
//! the interception core:
//!
//! - [`Interceptor`] - wraps one call, may proceed to the target and alter the result
//! - [`InterceptorSelector`] - chooses which interceptors apply to a member
//! - [`ProxyGenerationHook`] - decides whether a member is intercepted at all
//! - [`ProxyGenerationOptions`] - mixins, selector, hook and extra interfaces for a proxy
//! - [`Invocation`] - one intercepted call travelling down the interceptor chain

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::ports::component::{Component, Instance, unknown_member};
use crate::value_objects::{MethodInfo, TypeRef};

/// Cross-cutting behaviour applied to intercepted calls
pub trait Interceptor: Send + Sync {
    /// Name used by selectors and diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Handle a call; call [`Invocation::proceed`] to reach the target
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()>;
}

/// Chooses, per member, the interceptors that apply
pub trait InterceptorSelector: Send + Sync {
    /// Subset (in application order) of `interceptors` for `method`
    fn select_interceptors(
        &self,
        target_type: &TypeRef,
        method: &MethodInfo,
        interceptors: &[Arc<dyn Interceptor>],
    ) -> Vec<Arc<dyn Interceptor>>;
}

/// Decides which members of a proxied type are intercepted
pub trait ProxyGenerationHook: Send + Sync {
    /// Whether calls to `method` go through the interceptor chain
    fn should_intercept_method(&self, target_type: &TypeRef, method: &MethodInfo) -> bool;

    /// Called for members a subclass proxy cannot override
    fn non_proxyable_member_notification(&self, _target_type: &TypeRef, _method: &MethodInfo) {}

    /// Called once every member of the type has been inspected
    fn methods_inspected(&self) {}
}

/// Calls the original member once the interceptor chain is exhausted
pub type InvocationTarget<'a> = &'a (dyn Fn(&MethodInfo, &[Value]) -> Result<Value> + Send + Sync);

/// One intercepted call
pub struct Invocation<'a> {
    proxy_type: &'a TypeRef,
    method: &'a MethodInfo,
    arguments: Vec<Value>,
    return_value: Value,
    interceptors: &'a [Arc<dyn Interceptor>],
    position: usize,
    target: InvocationTarget<'a>,
}

impl<'a> Invocation<'a> {
    /// Start a call through `interceptors`, ending at `target`
    pub fn new(
        proxy_type: &'a TypeRef,
        method: &'a MethodInfo,
        arguments: Vec<Value>,
        interceptors: &'a [Arc<dyn Interceptor>],
        target: InvocationTarget<'a>,
    ) -> Self {
        Self {
            proxy_type,
            method,
            arguments,
            return_value: Value::Null,
            interceptors,
            position: 0,
            target,
        }
    }

    /// Type of the proxy that received the call
    pub fn proxy_type(&self) -> &TypeRef {
        self.proxy_type
    }

    /// Member being called
    pub fn method(&self) -> &MethodInfo {
        self.method
    }

    /// Call arguments
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Replace the argument at `position` before proceeding
    pub fn set_argument(&mut self, position: usize, value: Value) {
        if let Some(slot) = self.arguments.get_mut(position) {
            *slot = value;
        }
    }

    /// Current return value
    pub fn return_value(&self) -> &Value {
        &self.return_value
    }

    /// Replace the return value
    pub fn set_return_value(&mut self, value: Value) {
        self.return_value = value;
    }

    /// Run the next interceptor, or the target when none are left
    pub fn proceed(&mut self) -> Result<()> {
        match self.interceptors.get(self.position).cloned() {
            Some(next) => {
                self.position += 1;
                let outcome = next.intercept(self);
                self.position -= 1;
                outcome
            }
            None => {
                self.return_value = (self.target)(self.method, &self.arguments)?;
                Ok(())
            }
        }
    }

    /// Run the whole chain and hand back the final return value
    pub fn run(mut self) -> Result<Value> {
        self.proceed()?;
        Ok(self.return_value)
    }
}

/// Settings applied when generating a proxy; immutable once built
#[derive(Clone, Default)]
pub struct ProxyGenerationOptions {
    mixins: Vec<Instance>,
    selector: Option<Arc<dyn InterceptorSelector>>,
    hook: Option<Arc<dyn ProxyGenerationHook>>,
    additional_interfaces: Vec<TypeRef>,
}

impl ProxyGenerationOptions {
    /// Options with nothing configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mixin whose interfaces the proxy also exposes
    pub fn with_mixin(mut self, mixin: Instance) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Set the interceptor selector
    pub fn with_selector(mut self, selector: Arc<dyn InterceptorSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Set the inclusion hook
    pub fn with_hook(mut self, hook: Arc<dyn ProxyGenerationHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Add an interface the generated type must implement
    pub fn with_additional_interface(mut self, interface: &TypeRef) -> Self {
        if !self.additional_interfaces.contains(interface) {
            self.additional_interfaces.push(Arc::clone(interface));
        }
        self
    }

    /// Mixin instances, in order
    pub fn mixins(&self) -> &[Instance] {
        &self.mixins
    }

    /// Whether any mixins are configured
    pub fn has_mixins(&self) -> bool {
        !self.mixins.is_empty()
    }

    /// Interceptor selector
    pub fn selector(&self) -> Option<&Arc<dyn InterceptorSelector>> {
        self.selector.as_ref()
    }

    /// Inclusion hook
    pub fn hook(&self) -> Option<&Arc<dyn ProxyGenerationHook>> {
        self.hook.as_ref()
    }

    /// Extra interfaces for the generated type
    pub fn additional_interfaces(&self) -> &[TypeRef] {
        &self.additional_interfaces
    }

    /// Whether calls to `method` on `target_type` are intercepted
    pub fn should_intercept(&self, target_type: &TypeRef, method: &MethodInfo) -> bool {
        self.hook
            .as_ref()
            .is_none_or(|hook| hook.should_intercept_method(target_type, method))
    }

    /// Interceptors applying to `method`, honouring the selector
    pub fn select(
        &self,
        target_type: &TypeRef,
        method: &MethodInfo,
        interceptors: &[Arc<dyn Interceptor>],
    ) -> Vec<Arc<dyn Interceptor>> {
        match &self.selector {
            Some(selector) => selector.select_interceptors(target_type, method, interceptors),
            None => interceptors.to_vec(),
        }
    }
}

impl fmt::Debug for ProxyGenerationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyGenerationOptions")
            .field(
                "mixins",
                &self
                    .mixins
                    .iter()
                    .map(|m| m.runtime_type().name().to_string())
                    .collect::<Vec<_>>(),
            )
            .field("selector", &self.selector.is_some())
            .field("hook", &self.hook.is_some())
            .field(
                "additional_interfaces",
                &self
                    .additional_interfaces
                    .iter()
                    .map(|i| i.name().to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Exposes an [`Interceptor`] as a resolvable component
pub struct InterceptorComponent {
    component_type: TypeRef,
    interceptor: Arc<dyn Interceptor>,
}

impl InterceptorComponent {
    /// Wrap `interceptor` as a component of `component_type`
    pub fn new<I: Interceptor + 'static>(component_type: &TypeRef, interceptor: I) -> Self {
        Self {
            component_type: Arc::clone(component_type),
            interceptor: Arc::new(interceptor),
        }
    }

    /// Wrap and share as an [`Instance`]
    pub fn instance<I: Interceptor + 'static>(component_type: &TypeRef, interceptor: I) -> Instance {
        Arc::new(Self::new(component_type, interceptor))
    }
}

impl Component for InterceptorComponent {
    fn runtime_type(&self) -> TypeRef {
        Arc::clone(&self.component_type)
    }

    fn invoke(&self, method: &str, _arguments: &[Value]) -> Result<Value> {
        unknown_member(&self.component_type, method)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        Some(Arc::clone(&self.interceptor))
    }
}
