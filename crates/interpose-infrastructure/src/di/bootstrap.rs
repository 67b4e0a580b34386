//! Composition Root
//!
//! Wires the proxy generator, the remoting collaborator and the
//! interception extensions from configuration. The generator is created
//! once here and shared by every strategy through [`Interception`].
//!
//! ```text
//! AppConfig ─▶ DynamicProxyGenerator ─┐
//!              InProcessRemoting ─────┼─▶ Interception ─▶ registrations
//!              DeclarationTable ──────┘
//!              ContainerConfig ─────────▶ ContainerBuilder
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let runtime = bootstrap(&ConfigLoader::new().load()?);
//! let mut builder = runtime.container_builder();
//! builder
//!     .register_type(&calculator)
//!     .enable_class_interceptors(runtime.interception())?;
//! let container = builder.build()?;
//! ```

use std::sync::Arc;

use interpose_application::interception::DeclarationTable;
use interpose_application::registration::Interception;
use tracing::info;

use crate::config::AppConfig;
use crate::di::builder::ContainerBuilder;
use crate::proxy::DynamicProxyGenerator;
use crate::remoting::InProcessRemoting;

/// Shared collaborators for one process
#[derive(Clone)]
pub struct InterceptionRuntime {
    config: AppConfig,
    generator: Arc<DynamicProxyGenerator>,
    interception: Interception,
}

impl InterceptionRuntime {
    /// Loaded configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The proxy generator
    pub fn generator(&self) -> &Arc<DynamicProxyGenerator> {
        &self.generator
    }

    /// Interception collaborators for registration extensions
    pub fn interception(&self) -> &Interception {
        &self.interception
    }

    /// Empty container builder using the configured container settings
    pub fn container_builder(&self) -> ContainerBuilder {
        ContainerBuilder::with_config(self.config.container.clone())
    }

    /// Replace the declaration table
    pub fn with_declarations(mut self, declarations: DeclarationTable) -> Self {
        self.interception = self.interception.with_declarations(declarations);
        self
    }
}

/// Build the runtime described by `config`
pub fn bootstrap(config: &AppConfig) -> InterceptionRuntime {
    let generator = Arc::new(DynamicProxyGenerator::new(config.proxy.clone()));
    let interception =
        Interception::new(generator.clone()).with_remoting(Arc::new(InProcessRemoting::new()));
    info!(
        type_name_prefix = %config.proxy.type_name_prefix,
        cache_generated_types = config.proxy.cache_generated_types,
        declarations = interception.declarations().len(),
        "Interception runtime ready"
    );
    InterceptionRuntime {
        config: config.clone(),
        generator,
        interception,
    }
}
