//! In-process remote-call stubs
//!
//! A [`TransparentProxy`] presents an interface type but owns no local
//! object: every call is handed to an endpoint closure, the way a remoting
//! channel forwards calls to another process.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use interpose_domain::error::Result;
use interpose_domain::ports::{Component, Instance, unknown_member};
use interpose_domain::value_objects::TypeRef;
use interpose_domain::Value;

/// Receives the calls made on a stub
pub type Endpoint = Arc<dyn Fn(&str, &[Value]) -> Result<Value> + Send + Sync>;

/// Remote-call stub presenting `proxy_type`
pub struct TransparentProxy {
    proxy_type: TypeRef,
    supported: Vec<TypeRef>,
    endpoint: Endpoint,
}

impl TransparentProxy {
    /// Stub for `proxy_type` forwarding to `endpoint`
    pub fn new<F>(proxy_type: &TypeRef, endpoint: F) -> Self
    where
        F: Fn(&str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            proxy_type: Arc::clone(proxy_type),
            supported: Vec::new(),
            endpoint: Arc::new(endpoint),
        }
    }

    /// Declare that the remote object can also be used as `interface`
    pub fn supporting(mut self, interface: &TypeRef) -> Self {
        if !self.supported.contains(interface) {
            self.supported.push(Arc::clone(interface));
        }
        self
    }

    /// Share as an [`Instance`]
    pub fn into_instance(self) -> Instance {
        Arc::new(self)
    }

    /// Whether a cast to `interface` would succeed on the remote side
    pub fn supports_interface(&self, interface: &TypeRef) -> bool {
        self.proxy_type.is_assignable_to(interface)
            || self
                .supported
                .iter()
                .any(|candidate| candidate.is_assignable_to(interface))
    }

    fn knows_member(&self, method: &str) -> bool {
        self.proxy_type.find_method(method).is_some()
            || self
                .supported
                .iter()
                .any(|candidate| candidate.find_method(method).is_some())
    }
}

impl Component for TransparentProxy {
    fn runtime_type(&self) -> TypeRef {
        Arc::clone(&self.proxy_type)
    }

    fn invoke(&self, method: &str, arguments: &[Value]) -> Result<Value> {
        if !self.knows_member(method) {
            return unknown_member(&self.proxy_type, method);
        }
        (self.endpoint)(method, arguments)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for TransparentProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransparentProxy")
            .field("proxy_type", &self.proxy_type.name())
            .field(
                "supported",
                &self.supported.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
