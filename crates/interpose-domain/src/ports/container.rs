//! Container Ports
//!
//! The slice of a dependency-injection container the interception core
//! relies on. The container itself (service graph, lifetimes, constructor
//! selection) lives elsewhere; these traits are what it exposes to
//! registration-time configuration and to activation-time hooks.
//!
//! ```text
//! configuration time                    activation time
//! ──────────────────                    ───────────────
//! RegistrationConfigurator              PreparingEvent  (mutable parameters)
//!   metadata / services                         │
//!   implementation type                         ▼
//!   on_preparing ──────────────────────▶ ActivationContext (mutable instance)
//!   use_activation_middleware ─────────▶   middleware → next → activator
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::ports::component::Instance;
use crate::value_objects::{Parameter, ServiceRef, TypeRef};

/// Value stored in registration metadata
pub type MetadataValue = Arc<dyn Any + Send + Sync>;

/// Registration metadata: string keys to arbitrary shared values
pub type Metadata = HashMap<String, MetadataValue>;

/// Resolution entry point available inside activation hooks
pub trait ResolveContext {
    /// Resolve a service, failing with a dependency-resolution error
    fn resolve_service(&self, service: &ServiceRef) -> Result<Instance>;

    /// Resolve a service with extra constructor parameters
    fn resolve_service_with(
        &self,
        service: &ServiceRef,
        parameters: Vec<Parameter>,
    ) -> Result<Instance>;

    /// Whether any registration exposes `service`
    fn is_registered(&self, service: &ServiceRef) -> bool;
}

/// Read-only view of a built registration
pub trait ComponentRegistrationView: fmt::Display + Send + Sync {
    /// Services the registration exposes
    fn services(&self) -> &[ServiceRef];

    /// Registration metadata
    fn metadata(&self) -> &Metadata;

    /// Type the registration activates, when it activates a known type
    fn implementation_type(&self) -> Option<&TypeRef>;
}

/// Raised before the activator runs; handlers may rewrite the parameters
pub struct PreparingEvent<'a> {
    /// Registration being activated
    pub registration: &'a dyn ComponentRegistrationView,
    /// Context for resolving further services
    pub context: &'a dyn ResolveContext,
    /// Parameters the activator will receive
    pub parameters: Vec<Parameter>,
}

/// Handler run before activation
pub type PreparingHandler = Arc<dyn Fn(&mut PreparingEvent<'_>) -> Result<()> + Send + Sync>;

/// State threaded through the activation pipeline
pub struct ActivationContext<'a> {
    /// Registration being activated
    pub registration: &'a dyn ComponentRegistrationView,
    /// Context for resolving further services
    pub context: &'a dyn ResolveContext,
    /// Parameters handed to the activator
    pub parameters: Vec<Parameter>,
    /// Instance produced by the activator; middleware may replace it
    pub instance: Option<Instance>,
}

/// Continues the activation pipeline
pub type Next<'n> = &'n dyn Fn(&mut ActivationContext<'_>) -> Result<()>;

/// Step wrapped around activation
pub trait ActivationMiddleware: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Run the step; call `next` to activate the instance
    fn execute(&self, context: &mut ActivationContext<'_>, next: Next<'_>) -> Result<()>;
}

/// Registration under construction, as seen by configuration extensions
pub trait RegistrationConfigurator {
    /// Human-readable description used in error messages
    fn describe(&self) -> String;

    /// Services exposed so far
    fn services(&self) -> &[ServiceRef];

    /// Registration metadata
    fn metadata(&self) -> &Metadata;

    /// Mutable registration metadata
    fn metadata_mut(&mut self) -> &mut Metadata;

    /// Type activated by constructor selection; `None` for factory or instance registrations
    fn implementation_type(&self) -> Option<&TypeRef>;

    /// Replace the activated type; fails for factory or instance registrations
    fn set_implementation_type(&mut self, implementation_type: TypeRef) -> Result<()>;

    /// Add a handler run before the activator
    fn on_preparing(&mut self, handler: PreparingHandler);

    /// Add a step wrapped around the activator
    fn use_activation_middleware(&mut self, middleware: Arc<dyn ActivationMiddleware>);
}

/// Deferred configuration of every registration a scan produces
pub type ConfigurationAction =
    Arc<dyn Fn(&TypeRef, &mut dyn RegistrationConfigurator) -> Result<()> + Send + Sync>;

/// Registration of many scanned types at once
pub trait ScanningConfigurator {
    /// Human-readable description used in error messages
    fn describe(&self) -> String;

    /// Run `action` against each produced registration when the container is built
    fn add_configuration_action(&mut self, action: ConfigurationAction);
}
