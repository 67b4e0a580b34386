//! Dependency Injection Container
//!
//! In-memory container the interception strategies plug into through the
//! domain's container ports.
//!
//! ## Architecture Overview
//!
//! ```text
//! ContainerBuilder
//! ├── register_type / register_factory / register_instance → RegistrationBuilder
//! └── register_types → ScanningRegistrationBuilder (deferred actions)
//!             │ build()
//!             ▼
//! Container ── resolve(service) ── ResolveOperation (circular guard)
//!                                        │
//!                                        ▼
//!                 preparing → middleware → constructor selection → activating
//! ```

pub mod activation;
pub mod bootstrap;
pub mod builder;
pub mod container;
pub mod registration;

pub use bootstrap::{InterceptionRuntime, bootstrap};
pub use builder::{ContainerBuilder, ScanningRegistrationBuilder};
pub use container::Container;
pub use registration::{
    ActivatingEvent, ActivatingHandler, ComponentRegistration, FactoryFn, InstanceActivator,
    Lifetime, RegistrationBuilder,
};
