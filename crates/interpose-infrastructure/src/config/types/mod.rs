//! Configuration types module

pub mod app;
pub mod container;
pub mod logging;
pub mod proxy;

// Re-export main types
pub use app::AppConfig;
pub use container::ContainerConfig;
pub use logging::LoggingConfig;
pub use proxy::ProxyConfig;
