//! Container
//!
//! Resolves services against built registrations. Every activation runs
//! the same pipeline:
//!
//! ```text
//! preparing handlers (may rewrite parameters)
//!        │
//!        ▼
//! middleware[0] → middleware[1] → … → activator → activating handlers
//!        ▲                                              │
//!        └──────────── instance flows back out ─────────┘
//! ```
//!
//! Any failure inside the pipeline surfaces as a dependency-resolution
//! error naming the registration, with the original failure as its source.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{
    ActivationContext, ActivationMiddleware, ComponentRegistrationView, Instance, PreparingEvent,
    ResolveContext,
};
use interpose_domain::value_objects::{Parameter, ServiceRef, TypeRef};
use tracing::trace;

use crate::config::ContainerConfig;
use crate::di::activation::activate_type;
use crate::di::registration::{
    ActivatingEvent, ComponentRegistration, InstanceActivator, Lifetime,
};
use crate::error_ext::into_resolution_error;

/// Built, immutable container
pub struct Container {
    registrations: Vec<Arc<ComponentRegistration>>,
    services: HashMap<ServiceRef, usize>,
    config: ContainerConfig,
}

impl Container {
    pub(crate) fn new(registrations: Vec<ComponentRegistration>, config: ContainerConfig) -> Self {
        let mut services = HashMap::new();
        for registration in &registrations {
            for service in registration.services() {
                // Later registrations override earlier ones
                services.insert(service.clone(), registration.id());
            }
        }
        Self {
            registrations: registrations.into_iter().map(Arc::new).collect(),
            services,
            config,
        }
    }

    /// Resolve `service`
    ///
    /// # Errors
    ///
    /// Returns a dependency-resolution error when the service is not
    /// registered or its activation fails.
    pub fn resolve(&self, service: &ServiceRef) -> Result<Instance> {
        self.resolve_with(service, Vec::new())
    }

    /// Resolve the service registered as `service_type`
    pub fn resolve_type(&self, service_type: &TypeRef) -> Result<Instance> {
        self.resolve(&ServiceRef::typed(service_type))
    }

    /// Resolve the service registered under `name`
    pub fn resolve_named(&self, name: &str) -> Result<Instance> {
        self.resolve(&ServiceRef::named(name))
    }

    /// Resolve `service_type` registered under `key`
    pub fn resolve_keyed(&self, key: &str, service_type: &TypeRef) -> Result<Instance> {
        self.resolve(&ServiceRef::keyed(key, service_type))
    }

    /// Resolve `service`, supplying extra constructor parameters
    pub fn resolve_with(&self, service: &ServiceRef, parameters: Vec<Parameter>) -> Result<Instance> {
        ResolveOperation::new(self).resolve_service_with(service, parameters)
    }

    /// Whether any registration exposes `service`
    pub fn is_registered(&self, service: &ServiceRef) -> bool {
        self.services.contains_key(service)
    }

    /// The registration that currently provides `service`
    pub fn registration_for(&self, service: &ServiceRef) -> Option<&Arc<ComponentRegistration>> {
        self.services
            .get(service)
            .and_then(|id| self.registrations.get(*id))
    }

    /// Every registration, in registration order
    pub fn registrations(&self) -> &[Arc<ComponentRegistration>] {
        &self.registrations
    }
}

impl ResolveContext for Container {
    fn resolve_service(&self, service: &ServiceRef) -> Result<Instance> {
        self.resolve(service)
    }

    fn resolve_service_with(
        &self,
        service: &ServiceRef,
        parameters: Vec<Parameter>,
    ) -> Result<Instance> {
        self.resolve_with(service, parameters)
    }

    fn is_registered(&self, service: &ServiceRef) -> bool {
        Container::is_registered(self, service)
    }
}

/// One top-level resolution and everything it resolves transitively
struct ResolveOperation<'c> {
    container: &'c Container,
    activating: RefCell<Vec<usize>>,
}

impl<'c> ResolveOperation<'c> {
    fn new(container: &'c Container) -> Self {
        Self {
            container,
            activating: RefCell::new(Vec::new()),
        }
    }

    fn enter(&self, registration: &ComponentRegistration) -> Result<()> {
        let mut activating = self.activating.borrow_mut();
        if activating.len() >= self.container.config.max_resolve_depth {
            return Err(Error::dependency_resolution(format!(
                "Probable circular dependency: maximum resolve depth of {} exceeded while activating {registration}",
                self.container.config.max_resolve_depth
            )));
        }
        if activating.contains(&registration.id()) {
            let path = activating
                .iter()
                .chain(std::iter::once(&registration.id()))
                .filter_map(|id| self.container.registrations.get(*id))
                .map(|r| r.activator().limit_type().name().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::dependency_resolution(format!(
                "Circular component dependency detected: {path}"
            )));
        }
        activating.push(registration.id());
        Ok(())
    }

    fn leave(&self) {
        self.activating.borrow_mut().pop();
    }

    fn share(
        &self,
        registration: &Arc<ComponentRegistration>,
        parameters: Vec<Parameter>,
    ) -> Result<Instance> {
        match registration.lifetime() {
            Lifetime::SingleInstance => registration
                .shared_instance()
                .get_or_try_init(|| self.activate(registration, parameters))
                .cloned(),
            Lifetime::InstancePerDependency => self.activate(registration, parameters),
        }
    }

    fn activate(
        &self,
        registration: &Arc<ComponentRegistration>,
        parameters: Vec<Parameter>,
    ) -> Result<Instance> {
        trace!(registration = %registration, "Activating component");
        self.run_pipeline(registration, parameters).map_err(|err| {
            into_resolution_error(
                err,
                format!("An error occurred while activating {registration}"),
            )
        })
    }

    fn run_pipeline(
        &self,
        registration: &Arc<ComponentRegistration>,
        parameters: Vec<Parameter>,
    ) -> Result<Instance> {
        let mut preparing = PreparingEvent {
            registration: &**registration,
            context: self,
            parameters,
        };
        for handler in registration.preparing_handlers() {
            handler(&mut preparing)?;
        }

        let mut context = ActivationContext {
            registration: &**registration,
            context: self,
            parameters: preparing.parameters,
            instance: None,
        };
        let core = |context: &mut ActivationContext<'_>| self.activate_core(registration, context);
        run_middleware(registration.middleware(), &mut context, &core)?;

        context.instance.ok_or_else(|| {
            Error::dependency_resolution(format!("activation of {registration} produced no instance"))
        })
    }

    fn activate_core(
        &self,
        registration: &ComponentRegistration,
        context: &mut ActivationContext<'_>,
    ) -> Result<()> {
        let instance = match registration.activator() {
            InstanceActivator::Reflection(implementation_type) => {
                activate_type(implementation_type, &context.parameters, self)?
            }
            InstanceActivator::Factory { factory, .. } => factory(self, &context.parameters)?,
            InstanceActivator::Provided(instance) => Arc::clone(instance),
        };

        let mut activating = ActivatingEvent {
            context: self,
            instance,
        };
        for handler in registration.activating_handlers() {
            handler(&mut activating)?;
        }
        context.instance = Some(activating.instance);
        Ok(())
    }
}

fn run_middleware(
    middleware: &[Arc<dyn ActivationMiddleware>],
    context: &mut ActivationContext<'_>,
    core: &dyn Fn(&mut ActivationContext<'_>) -> Result<()>,
) -> Result<()> {
    match middleware.split_first() {
        Some((outer, inner)) => {
            trace!(middleware = outer.name(), "Running activation middleware");
            outer.execute(context, &|context: &mut ActivationContext<'_>| {
                run_middleware(inner, context, core)
            })
        }
        None => core(context),
    }
}

impl ResolveContext for ResolveOperation<'_> {
    fn resolve_service(&self, service: &ServiceRef) -> Result<Instance> {
        self.resolve_service_with(service, Vec::new())
    }

    fn resolve_service_with(
        &self,
        service: &ServiceRef,
        parameters: Vec<Parameter>,
    ) -> Result<Instance> {
        let registration = self.container.registration_for(service).ok_or_else(|| {
            Error::dependency_resolution(format!(
                "The requested service '{service}' has not been registered"
            ))
        })?;
        let registration = Arc::clone(registration);

        self.enter(&registration)?;
        let outcome = self.share(&registration, parameters);
        self.leave();
        outcome
    }

    fn is_registered(&self, service: &ServiceRef) -> bool {
        self.container.is_registered(service)
    }
}
