//! Transparent-Proxy Interception
//!
//! Variant of interface interception for instances that are remote-call
//! stubs. Before wrapping, the stub is checked with the remoting
//! collaborator: it must be a stub, its type must be an interface, and it
//! must support every additional interface requested.

use std::sync::Arc;

use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{
    ActivationContext, ActivationMiddleware, Instance, Next, ProxyGenerationOptions,
    ProxyGenerator, RemotingServices,
};
use interpose_domain::value_objects::TypeRef;
use tracing::trace;

use super::associations::{effective_interceptors, resolve_interceptors};
use super::declarations::DeclarationTable;
use super::interface_proxy::ensure_interface_interception_applies;

/// Wraps activated remote-call stubs in interface proxies
pub struct TransparentProxyMiddleware {
    generator: Arc<dyn ProxyGenerator>,
    remoting: Arc<dyn RemotingServices>,
    declarations: Arc<DeclarationTable>,
    options: Option<Arc<ProxyGenerationOptions>>,
    additional_interfaces: Vec<TypeRef>,
}

impl TransparentProxyMiddleware {
    /// Middleware checking stubs with `remoting` before wrapping them
    pub fn new(
        generator: Arc<dyn ProxyGenerator>,
        remoting: Arc<dyn RemotingServices>,
        declarations: Arc<DeclarationTable>,
        options: Option<Arc<ProxyGenerationOptions>>,
        additional_interfaces: Vec<TypeRef>,
    ) -> Self {
        Self {
            generator,
            remoting,
            declarations,
            options,
            additional_interfaces,
        }
    }

    fn verify_stub(&self, target: &Instance) -> Result<TypeRef> {
        let stub_type = target.runtime_type();
        if !self.remoting.is_transparent_proxy(target) {
            return Err(Error::dependency_resolution_with_source(
                format!("cannot intercept {stub_type} as a transparent proxy"),
                Error::not_transparent_proxy(stub_type.name()),
            ));
        }
        if !stub_type.is_interface() {
            return Err(Error::dependency_resolution_with_source(
                format!("cannot intercept {stub_type} as a transparent proxy"),
                Error::TransparentProxyNotInterface {
                    type_name: stub_type.name().to_string(),
                },
            ));
        }

        let unsupported: Vec<String> = self
            .additional_interfaces
            .iter()
            .map(|interface| self.remoting.can_cast_to(target, interface))
            .filter(|answer| !answer.supported)
            .map(|answer| answer.queried.name().to_string())
            .collect();
        if !unsupported.is_empty() {
            return Err(Error::dependency_resolution_with_source(
                format!("transparent proxy {stub_type} cannot be cast to the requested interfaces"),
                Error::interface_not_supported(stub_type.name(), unsupported),
            ));
        }
        Ok(stub_type)
    }
}

impl ActivationMiddleware for TransparentProxyMiddleware {
    fn name(&self) -> &str {
        "transparent-proxy-interception"
    }

    fn execute(&self, context: &mut ActivationContext<'_>, next: Next<'_>) -> Result<()> {
        ensure_interface_interception_applies(context.registration, self.generator.as_ref())?;

        next(context)?;

        let Some(target) = context.instance.take() else {
            return Ok(());
        };

        let stub_type = self.verify_stub(&target)?;
        let services =
            effective_interceptors(context.registration.metadata(), &stub_type, &self.declarations);
        let interceptors = resolve_interceptors(context.context, &services)?;
        trace!(
            stub = %stub_type,
            additional = self.additional_interfaces.len(),
            interceptors = interceptors.len(),
            "Wrapping transparent proxy"
        );

        let proxy = self.generator.create_interface_proxy_with_target_interface(
            &stub_type,
            &self.additional_interfaces,
            target,
            self.options.as_deref(),
            interceptors,
        )?;
        context.instance = Some(proxy);
        Ok(())
    }
}
