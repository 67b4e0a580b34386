//! Interface-Proxy Activation Strategy
//!
//! Activation middleware that lets the rest of the pipeline produce the
//! instance, then replaces it with a delegating proxy over the accessible
//! interfaces of its runtime type. Anything that still holds the original
//! instance bypasses interception.

use std::sync::Arc;

use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{
    ActivationContext, ActivationMiddleware, ComponentRegistrationView, Next,
    ProxyGenerationOptions, ProxyGenerator,
};
use interpose_domain::value_objects::TypeRef;
use tracing::trace;

use super::associations::{effective_interceptors, resolve_interceptors};
use super::declarations::DeclarationTable;

/// Check that every typed service of `registration` is an interface the
/// generator can implement
///
/// Services without a type (plain names) carry nothing to proxy and are
/// skipped.
///
/// # Errors
///
/// Returns a configuration error naming the registration and the first
/// offending service.
pub fn ensure_interface_interception_applies(
    registration: &dyn ComponentRegistrationView,
    generator: &dyn ProxyGenerator,
) -> Result<()> {
    for service in registration.services() {
        let Some(service_type) = service.service_type() else {
            continue;
        };
        if !service_type.is_interface() {
            return Err(Error::configuration(format!(
                "the component {registration} cannot use interface interception as it provides services that are not publicly visible interfaces: {service_type} is not an interface"
            )));
        }
        if !generator.is_accessible(service_type) {
            return Err(Error::configuration(format!(
                "the component {registration} cannot use interface interception as it provides services that are not publicly visible interfaces: {service_type} is not accessible to the proxy generator"
            )));
        }
    }
    Ok(())
}

/// Interfaces of `runtime_type` the generator can implement, in declaration order
pub fn proxyable_interfaces(runtime_type: &TypeRef, generator: &dyn ProxyGenerator) -> Vec<TypeRef> {
    runtime_type
        .interfaces()
        .iter()
        .filter(|interface| generator.is_accessible(interface))
        .cloned()
        .collect()
}

/// Wraps activated instances in interface proxies
pub struct InterfaceInterceptionMiddleware {
    generator: Arc<dyn ProxyGenerator>,
    declarations: Arc<DeclarationTable>,
    options: Option<Arc<ProxyGenerationOptions>>,
}

impl InterfaceInterceptionMiddleware {
    /// Middleware using `generator`, with optional generation options
    pub fn new(
        generator: Arc<dyn ProxyGenerator>,
        declarations: Arc<DeclarationTable>,
        options: Option<Arc<ProxyGenerationOptions>>,
    ) -> Self {
        Self {
            generator,
            declarations,
            options,
        }
    }
}

impl ActivationMiddleware for InterfaceInterceptionMiddleware {
    fn name(&self) -> &str {
        "interface-interception"
    }

    fn execute(&self, context: &mut ActivationContext<'_>, next: Next<'_>) -> Result<()> {
        ensure_interface_interception_applies(context.registration, self.generator.as_ref())?;

        next(context)?;

        let Some(target) = context.instance.take() else {
            return Ok(());
        };

        let runtime_type = target.runtime_type();
        let mut interfaces = proxyable_interfaces(&runtime_type, self.generator.as_ref());
        if interfaces.is_empty() {
            trace!(
                runtime_type = %runtime_type,
                "No proxyable interfaces, leaving instance unwrapped"
            );
            context.instance = Some(target);
            return Ok(());
        }
        let primary = interfaces.remove(0);

        let services = effective_interceptors(
            context.registration.metadata(),
            &runtime_type,
            &self.declarations,
        );
        let interceptors = resolve_interceptors(context.context, &services)?;
        trace!(
            runtime_type = %runtime_type,
            primary = %primary,
            additional = interfaces.len(),
            interceptors = interceptors.len(),
            "Wrapping instance in interface proxy"
        );

        let proxy = self.generator.create_interface_proxy_with_target(
            &primary,
            &interfaces,
            target,
            self.options.as_deref(),
            interceptors,
        )?;
        context.instance = Some(proxy);
        Ok(())
    }
}
