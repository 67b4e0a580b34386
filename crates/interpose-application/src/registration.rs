//! Registration Extensions
//!
//! Chainable operations that turn interception on for a registration and
//! associate interceptors with it. Every operation takes the
//! [`Interception`] collaborators explicitly; there is no process-wide
//! proxy generator.
//!
//! # Example
//!
//! ```ignore
//! let interception = Interception::new(generator);
//! builder
//!     .register_type(calculator_type)
//!     .enable_class_interceptors(&interception)?
//!     .intercepted_by_types(&[add_one_type])?;
//! ```

use std::sync::Arc;

use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{
    ConfigurationAction, ProxyGenerationOptions, ProxyGenerator, RegistrationConfigurator,
    RemotingServices, ScanningConfigurator,
};
use interpose_domain::value_objects::{ServiceRef, TypeRef};
use tracing::debug;

use crate::interception::{
    ClassInterceptionStrategy, DeclarationTable, InterfaceInterceptionMiddleware,
    TransparentProxyMiddleware, associate,
};

/// Collaborators shared by every interception-enabled registration
#[derive(Clone)]
pub struct Interception {
    generator: Arc<dyn ProxyGenerator>,
    declarations: Arc<DeclarationTable>,
    remoting: Option<Arc<dyn RemotingServices>>,
}

impl Interception {
    /// Interception with `generator` and the link-time declarations
    pub fn new(generator: Arc<dyn ProxyGenerator>) -> Self {
        Self {
            generator,
            declarations: Arc::new(DeclarationTable::with_registered()),
            remoting: None,
        }
    }

    /// Replace the declaration table
    pub fn with_declarations(mut self, declarations: DeclarationTable) -> Self {
        self.declarations = Arc::new(declarations);
        self
    }

    /// Enable transparent-proxy interception with `remoting`
    pub fn with_remoting(mut self, remoting: Arc<dyn RemotingServices>) -> Self {
        self.remoting = Some(remoting);
        self
    }

    /// The proxy generator
    pub fn generator(&self) -> &Arc<dyn ProxyGenerator> {
        &self.generator
    }

    /// The declaration table
    pub fn declarations(&self) -> &Arc<DeclarationTable> {
        &self.declarations
    }

    /// The remoting collaborator, if configured
    pub fn remoting(&self) -> Option<&Arc<dyn RemotingServices>> {
        self.remoting.as_ref()
    }

    fn class_strategy(&self) -> ClassInterceptionStrategy {
        ClassInterceptionStrategy::new(Arc::clone(&self.generator), Arc::clone(&self.declarations))
    }
}

/// Interception operations on a single registration
pub trait InterceptionExt: RegistrationConfigurator {
    /// Activate a generated subclass proxy instead of the implementation type
    fn enable_class_interceptors(&mut self, interception: &Interception) -> Result<&mut Self> {
        self.enable_class_interceptors_with(interception, ProxyGenerationOptions::new())
    }

    /// Class interception with mixins, selector, hook or extra interfaces
    fn enable_class_interceptors_with(
        &mut self,
        interception: &Interception,
        options: ProxyGenerationOptions,
    ) -> Result<&mut Self> {
        interception
            .class_strategy()
            .apply(self, Arc::new(options))?;
        Ok(self)
    }

    /// Wrap activated instances in interface proxies
    fn enable_interface_interceptors(&mut self, interception: &Interception) -> &mut Self {
        add_interface_middleware(self, interception, None);
        self
    }

    /// Interface interception with generation options
    fn enable_interface_interceptors_with(
        &mut self,
        interception: &Interception,
        options: ProxyGenerationOptions,
    ) -> &mut Self {
        add_interface_middleware(self, interception, Some(Arc::new(options)));
        self
    }

    /// Wrap activated remote-call stubs in interface proxies
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `interception` has no remoting
    /// collaborator.
    fn intercept_transparent_proxy(
        &mut self,
        interception: &Interception,
        additional_interfaces: &[TypeRef],
    ) -> Result<&mut Self> {
        add_transparent_middleware(self, interception, additional_interfaces, None)?;
        Ok(self)
    }

    /// Transparent-proxy interception with generation options
    fn intercept_transparent_proxy_with(
        &mut self,
        interception: &Interception,
        additional_interfaces: &[TypeRef],
        options: ProxyGenerationOptions,
    ) -> Result<&mut Self> {
        add_transparent_middleware(
            self,
            interception,
            additional_interfaces,
            Some(Arc::new(options)),
        )?;
        Ok(self)
    }

    /// Associate interceptor services
    fn intercepted_by(&mut self, services: &[ServiceRef]) -> Result<&mut Self> {
        associate(self, services)?;
        Ok(self)
    }

    /// Associate interceptors registered under names
    fn intercepted_by_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<&mut Self> {
        let services = services_from_names(names)?;
        self.intercepted_by(&services)
    }

    /// Associate interceptors registered by type
    fn intercepted_by_types(&mut self, types: &[TypeRef]) -> Result<&mut Self> {
        let services: Vec<ServiceRef> = types.iter().map(ServiceRef::typed).collect();
        self.intercepted_by(&services)
    }
}

impl<R: RegistrationConfigurator + ?Sized> InterceptionExt for R {}

fn add_interface_middleware<R>(
    registration: &mut R,
    interception: &Interception,
    options: Option<Arc<ProxyGenerationOptions>>,
) where
    R: RegistrationConfigurator + ?Sized,
{
    debug!(registration = %registration.describe(), "Enabled interface interception");
    registration.use_activation_middleware(Arc::new(InterfaceInterceptionMiddleware::new(
        Arc::clone(&interception.generator),
        Arc::clone(&interception.declarations),
        options,
    )));
}

fn add_transparent_middleware<R>(
    registration: &mut R,
    interception: &Interception,
    additional_interfaces: &[TypeRef],
    options: Option<Arc<ProxyGenerationOptions>>,
) -> Result<()>
where
    R: RegistrationConfigurator + ?Sized,
{
    let remoting = interception.remoting().cloned().ok_or_else(|| {
        Error::configuration(format!(
            "transparent-proxy interception of {} requires a remoting collaborator",
            registration.describe()
        ))
    })?;
    debug!(
        registration = %registration.describe(),
        additional = additional_interfaces.len(),
        "Enabled transparent-proxy interception"
    );
    registration.use_activation_middleware(Arc::new(TransparentProxyMiddleware::new(
        Arc::clone(&interception.generator),
        remoting,
        Arc::clone(&interception.declarations),
        options,
        additional_interfaces.to_vec(),
    )));
    Ok(())
}

fn services_from_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<ServiceRef>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(Error::invalid_argument(
                    "interceptor service names must not be empty",
                ));
            }
            Ok(ServiceRef::interceptor_named(name))
        })
        .collect()
}

fn deferred<F>(configure: F) -> ConfigurationAction
where
    F: Fn(&mut dyn RegistrationConfigurator) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(move |_scanned: &TypeRef, registration: &mut dyn RegistrationConfigurator| {
        configure(registration)
    })
}

/// Interception operations deferred to every registration a scan produces
pub trait ScanningInterceptionExt: ScanningConfigurator {
    /// Class interception for every scanned type
    fn enable_class_interceptors(&mut self, interception: &Interception) -> &mut Self {
        self.enable_class_interceptors_with(interception, ProxyGenerationOptions::new())
    }

    /// Class interception with options for every scanned type
    fn enable_class_interceptors_with(
        &mut self,
        interception: &Interception,
        options: ProxyGenerationOptions,
    ) -> &mut Self {
        let strategy = interception.class_strategy();
        let options = Arc::new(options);
        self.add_configuration_action(deferred(move |registration| {
            strategy.apply(registration, Arc::clone(&options)).map(|_| ())
        }));
        self
    }

    /// Interface interception for every scanned type
    fn enable_interface_interceptors(&mut self, interception: &Interception) -> &mut Self {
        let interception = interception.clone();
        self.add_configuration_action(deferred(move |registration| {
            add_interface_middleware(registration, &interception, None);
            Ok(())
        }));
        self
    }

    /// Associate interceptor services with every scanned type
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error when `services` is empty.
    fn intercepted_by(&mut self, services: &[ServiceRef]) -> Result<&mut Self> {
        if services.is_empty() {
            return Err(Error::invalid_argument(format!(
                "at least one interceptor service is required to intercept {}",
                self.describe()
            )));
        }
        let services = services.to_vec();
        self.add_configuration_action(deferred(move |registration| {
            associate(registration, &services)
        }));
        Ok(self)
    }

    /// Associate interceptors registered under names with every scanned type
    fn intercepted_by_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<&mut Self> {
        let services = services_from_names(names)?;
        ScanningInterceptionExt::intercepted_by(self, &services)
    }

    /// Associate interceptors registered by type with every scanned type
    fn intercepted_by_types(&mut self, types: &[TypeRef]) -> Result<&mut Self> {
        let services: Vec<ServiceRef> = types.iter().map(ServiceRef::typed).collect();
        ScanningInterceptionExt::intercepted_by(self, &services)
    }
}

impl<S: ScanningConfigurator + ?Sized> ScanningInterceptionExt for S {}
