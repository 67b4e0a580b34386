//! # Infrastructure Layer
//!
//! Concrete collaborators behind the domain ports, plus the cross-cutting
//! technical concerns shared by the whole system.
//!
//! ## Module Categories
//!
//! ### Collaborators
//! | Module | Description |
//! |--------|-------------|
//! | [`di`] | In-memory container: registrations, activation pipeline, lifetimes, scanning |
//! | [`proxy`] | Dynamic proxy generator: class proxy types, interface proxies, call dispatch |
//! | [`remoting`] | In-process remote-call stubs and their capability queries |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration through figment |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context helpers mapping collaborator errors into domain errors |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;
pub mod proxy;
pub mod remoting;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader};
pub use di::{Container, ContainerBuilder, InterceptionRuntime, bootstrap};
pub use error_ext::ErrorContext;
pub use proxy::DynamicProxyGenerator;
pub use remoting::{InProcessRemoting, TransparentProxy};
