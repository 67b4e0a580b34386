//! Container Builder
//!
//! Collects registrations (single types, factories, instances and scans of
//! many types) and freezes them into a [`Container`].

use std::sync::Arc;

use interpose_domain::error::Result;
use interpose_domain::ports::{
    ConfigurationAction, Instance, RegistrationConfigurator, ResolveContext, ScanningConfigurator,
};
use interpose_domain::value_objects::{Parameter, TypeRef};
use tracing::{debug, info};

use crate::config::ContainerConfig;
use crate::di::container::Container;
use crate::di::registration::{Lifetime, RegistrationBuilder};

/// Builds a [`Container`]
#[derive(Default)]
pub struct ContainerBuilder {
    config: ContainerConfig,
    registrations: Vec<RegistrationBuilder>,
    scans: Vec<ScanningRegistrationBuilder>,
}

impl ContainerBuilder {
    /// Builder with default container settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with explicit container settings
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn push(&mut self, registration: RegistrationBuilder) -> &mut RegistrationBuilder {
        let index = self.registrations.len();
        self.registrations.push(registration);
        &mut self.registrations[index]
    }

    /// Register a type activated through constructor selection
    pub fn register_type(&mut self, implementation_type: &TypeRef) -> &mut RegistrationBuilder {
        self.push(RegistrationBuilder::for_type(implementation_type))
    }

    /// Register a delegate producing instances of `limit_type`
    pub fn register_factory<F>(&mut self, limit_type: &TypeRef, factory: F) -> &mut RegistrationBuilder
    where
        F: Fn(&dyn ResolveContext, &[Parameter]) -> Result<Instance> + Send + Sync + 'static,
    {
        self.push(RegistrationBuilder::for_factory(limit_type, factory))
    }

    /// Register an already built instance
    pub fn register_instance(&mut self, instance: Instance) -> &mut RegistrationBuilder {
        self.push(RegistrationBuilder::for_instance(instance))
    }

    /// Register every class in `types`, one registration each
    pub fn register_types<I>(&mut self, types: I) -> &mut ScanningRegistrationBuilder
    where
        I: IntoIterator<Item = TypeRef>,
    {
        let index = self.scans.len();
        self.scans
            .push(ScanningRegistrationBuilder::new(types.into_iter().collect()));
        &mut self.scans[index]
    }

    /// Freeze the registrations into a container
    ///
    /// Scans expand into individual registrations here, after which their
    /// deferred configuration actions run.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a deferred configuration action.
    pub fn build(self) -> Result<Container> {
        let mut registrations = self.registrations;
        for scan in self.scans {
            registrations.extend(scan.expand()?);
        }

        let registrations: Vec<_> = registrations
            .into_iter()
            .enumerate()
            .map(|(id, registration)| registration.build(id))
            .collect();
        info!(
            registrations = registrations.len(),
            max_resolve_depth = self.config.max_resolve_depth,
            "Container built"
        );
        Ok(Container::new(registrations, self.config))
    }
}

/// Registration of many types sharing one configuration
pub struct ScanningRegistrationBuilder {
    types: Vec<TypeRef>,
    filters: Vec<Arc<dyn Fn(&TypeRef) -> bool + Send + Sync>>,
    as_self: bool,
    as_implemented_interfaces: bool,
    lifetime: Lifetime,
    actions: Vec<ConfigurationAction>,
}

impl ScanningRegistrationBuilder {
    fn new(types: Vec<TypeRef>) -> Self {
        Self {
            types,
            filters: Vec::new(),
            as_self: false,
            as_implemented_interfaces: false,
            lifetime: Lifetime::default(),
            actions: Vec::new(),
        }
    }

    /// Only register types matching `predicate`
    pub fn where_type<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&TypeRef) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(predicate));
        self
    }

    /// Expose each type as itself
    pub fn as_self(&mut self) -> &mut Self {
        self.as_self = true;
        self
    }

    /// Expose each type as every interface it implements
    pub fn as_implemented_interfaces(&mut self) -> &mut Self {
        self.as_implemented_interfaces = true;
        self
    }

    /// Share one instance per scanned type
    pub fn single_instance(&mut self) -> &mut Self {
        self.lifetime = Lifetime::SingleInstance;
        self
    }

    fn selected(&self) -> impl Iterator<Item = &TypeRef> {
        self.types
            .iter()
            .filter(|candidate| candidate.is_class())
            .filter(|candidate| self.filters.iter().all(|filter| filter(*candidate)))
    }

    fn expand(&self) -> Result<Vec<RegistrationBuilder>> {
        let mut registrations = Vec::new();
        for scanned in self.selected() {
            let mut registration = RegistrationBuilder::for_type(scanned);
            if self.as_self {
                registration.as_self();
            }
            if self.as_implemented_interfaces {
                registration.as_implemented_interfaces();
            }
            if self.lifetime == Lifetime::SingleInstance {
                registration.single_instance();
            }
            let configurator: &mut dyn RegistrationConfigurator = &mut registration;
            for action in &self.actions {
                action(scanned, &mut *configurator)?;
            }
            debug!(registration = %registration.describe(), "Registered scanned type");
            registrations.push(registration);
        }
        Ok(registrations)
    }
}

impl ScanningConfigurator for ScanningRegistrationBuilder {
    fn describe(&self) -> String {
        format!(
            "scan of {} type(s): [{}]",
            self.types.len(),
            self.types
                .iter()
                .map(|t| t.name().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    fn add_configuration_action(&mut self, action: ConfigurationAction) {
        self.actions.push(action);
    }
}
