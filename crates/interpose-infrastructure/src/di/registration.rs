//! Component Registrations
//!
//! A [`RegistrationBuilder`] is the mutable, configuration-time form of a
//! registration; [`ComponentRegistration`] is the immutable form the
//! container resolves against.

use std::fmt;
use std::sync::Arc;

use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{
    ActivationMiddleware, ComponentRegistrationView, Instance, Metadata, PreparingHandler,
    RegistrationConfigurator, ResolveContext,
};
use interpose_domain::value_objects::{Parameter, ServiceRef, TypeRef};
use once_cell::sync::OnceCell;

/// Creates an instance from the resolve context and the supplied parameters
pub type FactoryFn =
    Arc<dyn Fn(&dyn ResolveContext, &[Parameter]) -> Result<Instance> + Send + Sync>;

/// Raised after the activator produced an instance; handlers may replace it
pub struct ActivatingEvent<'a> {
    /// Context for resolving further services
    pub context: &'a dyn ResolveContext,
    /// Instance produced so far
    pub instance: Instance,
}

/// Handler run after the activator
pub type ActivatingHandler = Arc<dyn Fn(&mut ActivatingEvent<'_>) -> Result<()> + Send + Sync>;

/// How many instances a registration produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifetime {
    /// A new instance for every resolution
    #[default]
    InstancePerDependency,
    /// One instance shared by every resolution
    SingleInstance,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstancePerDependency => f.write_str("InstancePerDependency"),
            Self::SingleInstance => f.write_str("SingleInstance"),
        }
    }
}

/// What produces a registration's instances
#[derive(Clone)]
pub enum InstanceActivator {
    /// Constructor selection over the type's constructors
    Reflection(TypeRef),
    /// Delegate producing instances of `limit_type`
    Factory {
        /// Most specific type the delegate is known to return
        limit_type: TypeRef,
        /// The delegate
        factory: FactoryFn,
    },
    /// Pre-built instance
    Provided(Instance),
}

impl InstanceActivator {
    /// Most specific type instances are known to have
    pub fn limit_type(&self) -> TypeRef {
        match self {
            Self::Reflection(implementation_type) => Arc::clone(implementation_type),
            Self::Factory { limit_type, .. } => Arc::clone(limit_type),
            Self::Provided(instance) => instance.runtime_type(),
        }
    }
}

impl fmt::Display for InstanceActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reflection(implementation_type) => {
                write!(f, "{implementation_type} (ReflectionActivator)")
            }
            Self::Factory { limit_type, .. } => write!(f, "{limit_type} (DelegateActivator)"),
            Self::Provided(instance) => {
                write!(f, "{} (ProvidedInstanceActivator)", instance.runtime_type())
            }
        }
    }
}

fn describe(activator: &InstanceActivator, services: &[ServiceRef], lifetime: Lifetime) -> String {
    let services = services
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Activator = {activator}, Services = [{services}], Lifetime = {lifetime}")
}

/// Registration under construction
pub struct RegistrationBuilder {
    activator: InstanceActivator,
    default_service: ServiceRef,
    services: Vec<ServiceRef>,
    metadata: Metadata,
    lifetime: Lifetime,
    preparing: Vec<PreparingHandler>,
    activating: Vec<ActivatingHandler>,
    middleware: Vec<Arc<dyn ActivationMiddleware>>,
}

impl RegistrationBuilder {
    /// Registration activating `implementation_type` through constructor selection
    pub fn for_type(implementation_type: &TypeRef) -> Self {
        Self::with_activator(InstanceActivator::Reflection(Arc::clone(implementation_type)))
    }

    /// Registration activating instances with `factory`
    pub fn for_factory<F>(limit_type: &TypeRef, factory: F) -> Self
    where
        F: Fn(&dyn ResolveContext, &[Parameter]) -> Result<Instance> + Send + Sync + 'static,
    {
        Self::with_activator(InstanceActivator::Factory {
            limit_type: Arc::clone(limit_type),
            factory: Arc::new(factory),
        })
    }

    /// Registration handing out `instance`; always single-instance
    pub fn for_instance(instance: Instance) -> Self {
        let mut builder = Self::with_activator(InstanceActivator::Provided(instance));
        builder.lifetime = Lifetime::SingleInstance;
        builder
    }

    fn with_activator(activator: InstanceActivator) -> Self {
        let default_service = ServiceRef::typed(&activator.limit_type());
        Self {
            activator,
            default_service,
            services: Vec::new(),
            metadata: Metadata::new(),
            lifetime: Lifetime::default(),
            preparing: Vec::new(),
            activating: Vec::new(),
            middleware: Vec::new(),
        }
    }

    fn add_service(&mut self, service: ServiceRef) -> &mut Self {
        if !self.services.contains(&service) {
            self.services.push(service);
        }
        self
    }

    /// Expose the registration as its own type
    pub fn as_self(&mut self) -> &mut Self {
        let service = ServiceRef::typed(&self.activator.limit_type());
        self.add_service(service)
    }

    /// Expose the registration as `service_type`
    pub fn as_type(&mut self, service_type: &TypeRef) -> &mut Self {
        self.add_service(ServiceRef::typed(service_type))
    }

    /// Expose the registration under `name`
    pub fn named<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.add_service(ServiceRef::named(name))
    }

    /// Expose the registration as `service_type` under `key`
    pub fn keyed<S: Into<String>>(&mut self, key: S, service_type: &TypeRef) -> &mut Self {
        self.add_service(ServiceRef::keyed(key, service_type))
    }

    /// Expose the registration as every interface its type implements
    pub fn as_implemented_interfaces(&mut self) -> &mut Self {
        let limit_type = self.activator.limit_type();
        for interface in limit_type.interfaces() {
            self.add_service(ServiceRef::typed(interface));
        }
        self
    }

    /// Share one instance across all resolutions
    pub fn single_instance(&mut self) -> &mut Self {
        self.lifetime = Lifetime::SingleInstance;
        self
    }

    /// Create a new instance for every resolution
    pub fn instance_per_dependency(&mut self) -> &mut Self {
        self.lifetime = Lifetime::InstancePerDependency;
        self
    }

    /// Attach a metadata value
    pub fn with_metadata<S, V>(&mut self, key: S, value: V) -> &mut Self
    where
        S: Into<String>,
        V: std::any::Any + Send + Sync,
    {
        self.metadata.insert(key.into(), Arc::new(value));
        self
    }

    /// Run `handler` after each activation; it may replace the instance
    pub fn on_activating<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut ActivatingEvent<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.activating.push(Arc::new(handler));
        self
    }

    /// Configured lifetime
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Freeze the registration
    pub fn build(self, id: usize) -> ComponentRegistration {
        let services = if self.services.is_empty() {
            vec![self.default_service]
        } else {
            self.services
        };
        ComponentRegistration {
            id,
            activator: self.activator,
            services,
            metadata: self.metadata,
            lifetime: self.lifetime,
            preparing: self.preparing,
            activating: self.activating,
            middleware: self.middleware,
            shared: OnceCell::new(),
        }
    }
}

impl RegistrationConfigurator for RegistrationBuilder {
    fn describe(&self) -> String {
        describe(&self.activator, RegistrationConfigurator::services(self), self.lifetime)
    }

    fn services(&self) -> &[ServiceRef] {
        if self.services.is_empty() {
            std::slice::from_ref(&self.default_service)
        } else {
            &self.services
        }
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    fn implementation_type(&self) -> Option<&TypeRef> {
        match &self.activator {
            InstanceActivator::Reflection(implementation_type) => Some(implementation_type),
            _ => None,
        }
    }

    fn set_implementation_type(&mut self, implementation_type: TypeRef) -> Result<()> {
        match &mut self.activator {
            InstanceActivator::Reflection(current) => {
                *current = implementation_type;
                Ok(())
            }
            _ => Err(Error::configuration(format!(
                "the implementation type of {} is fixed by its activator",
                RegistrationConfigurator::describe(self)
            ))),
        }
    }

    fn on_preparing(&mut self, handler: PreparingHandler) {
        self.preparing.push(handler);
    }

    fn use_activation_middleware(&mut self, middleware: Arc<dyn ActivationMiddleware>) {
        self.middleware.push(middleware);
    }
}

/// Immutable registration held by a built container
pub struct ComponentRegistration {
    id: usize,
    activator: InstanceActivator,
    services: Vec<ServiceRef>,
    metadata: Metadata,
    lifetime: Lifetime,
    preparing: Vec<PreparingHandler>,
    activating: Vec<ActivatingHandler>,
    middleware: Vec<Arc<dyn ActivationMiddleware>>,
    shared: OnceCell<Instance>,
}

impl ComponentRegistration {
    /// Position of the registration in its container
    pub fn id(&self) -> usize {
        self.id
    }

    /// What produces instances
    pub fn activator(&self) -> &InstanceActivator {
        &self.activator
    }

    /// Configured lifetime
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub(crate) fn preparing_handlers(&self) -> &[PreparingHandler] {
        &self.preparing
    }

    pub(crate) fn activating_handlers(&self) -> &[ActivatingHandler] {
        &self.activating
    }

    pub(crate) fn middleware(&self) -> &[Arc<dyn ActivationMiddleware>] {
        &self.middleware
    }

    pub(crate) fn shared_instance(&self) -> &OnceCell<Instance> {
        &self.shared
    }
}

impl ComponentRegistrationView for ComponentRegistration {
    fn services(&self) -> &[ServiceRef] {
        &self.services
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn implementation_type(&self) -> Option<&TypeRef> {
        match &self.activator {
            InstanceActivator::Reflection(implementation_type) => Some(implementation_type),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(&self.activator, &self.services, self.lifetime))
    }
}
