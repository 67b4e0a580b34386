//! Class-Proxy Activation Strategy
//!
//! Swaps a registration's implementation type for a generated subclass
//! proxy and, on every activation, prepends the proxy's extra constructor
//! arguments to whatever the caller supplied:
//!
//! ```text
//! position 0..m   one per mixin, in mixin order
//! position m      resolved interceptor instances
//! position m+1    selector (only when configured)
//! ```
//!
//! Only virtual members of the base class are routed through interceptors.
//! Calls to non-virtual members reach the base implementation directly.

use std::sync::Arc;

use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{
    Interceptor, PreparingEvent, ProxyGenerationOptions, ProxyGenerator,
    RegistrationConfigurator,
};
use interpose_domain::value_objects::{Argument, Parameter, TypeRef};
use tracing::{debug, trace};

use super::associations::{effective_interceptors, record_declared, resolve_interceptors};
use super::declarations::DeclarationTable;

/// Applies class interception to concrete-type registrations
pub struct ClassInterceptionStrategy {
    generator: Arc<dyn ProxyGenerator>,
    declarations: Arc<DeclarationTable>,
}

impl ClassInterceptionStrategy {
    /// Strategy backed by `generator`, consulting `declarations`
    pub fn new(generator: Arc<dyn ProxyGenerator>, declarations: Arc<DeclarationTable>) -> Self {
        Self {
            generator,
            declarations,
        }
    }

    /// Configure `registration` to activate a generated subclass proxy
    ///
    /// The proxy type is generated once, here, and reused for every
    /// activation. Returns the generated type.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the registration has no known
    /// implementation type, when that type is not an accessible class, or
    /// when the generator rejects it.
    pub fn apply<R>(
        &self,
        registration: &mut R,
        options: Arc<ProxyGenerationOptions>,
    ) -> Result<TypeRef>
    where
        R: RegistrationConfigurator + ?Sized,
    {
        let base = registration.implementation_type().cloned().ok_or_else(|| {
            Error::configuration(format!(
                "class interception requires a type-based registration: {}",
                registration.describe()
            ))
        })?;
        if !base.is_class() {
            return Err(Error::configuration(format!(
                "class interception requires a concrete class, but {base} is an interface ({})",
                registration.describe()
            )));
        }
        if !self.generator.is_accessible(&base) {
            return Err(Error::configuration(format!(
                "type {base} is not accessible to the proxy generator ({})",
                registration.describe()
            )));
        }

        let proxy_type =
            self.generator
                .create_class_proxy_type(&base, options.additional_interfaces(), &options)?;
        registration.set_implementation_type(Arc::clone(&proxy_type))?;
        record_declared(registration, &self.declarations.interceptors_for(&proxy_type));

        debug!(
            base = %base,
            proxy = %proxy_type,
            mixins = options.mixins().len(),
            selector = options.selector().is_some(),
            "Enabled class interception"
        );

        let declarations = Arc::clone(&self.declarations);
        let activated_type = Arc::clone(&proxy_type);
        registration.on_preparing(Arc::new(move |event: &mut PreparingEvent<'_>| {
            let services =
                effective_interceptors(event.registration.metadata(), &activated_type, &declarations);
            let interceptors = resolve_interceptors(event.context, &services)?;
            trace!(
                proxy = %activated_type,
                interceptors = interceptors.len(),
                "Injecting class proxy arguments"
            );

            let mut injected = proxy_arguments(&options, interceptors);
            injected.append(&mut event.parameters);
            event.parameters = injected;
            Ok(())
        }));

        Ok(proxy_type)
    }
}

fn proxy_arguments(
    options: &ProxyGenerationOptions,
    interceptors: Vec<Arc<dyn Interceptor>>,
) -> Vec<Parameter> {
    let mut arguments: Vec<Argument> = options
        .mixins()
        .iter()
        .map(|mixin| Argument::Instance(Arc::clone(mixin)))
        .collect();
    arguments.push(Argument::Interceptors(interceptors));
    if let Some(selector) = options.selector() {
        arguments.push(Argument::Selector(Arc::clone(selector)));
    }

    arguments
        .into_iter()
        .enumerate()
        .map(|(position, argument)| Parameter::positional(position, argument))
        .collect()
}
