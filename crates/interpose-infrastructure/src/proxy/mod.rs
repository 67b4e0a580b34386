//! Dynamic Proxies
//!
//! ```text
//! DynamicProxyGenerator
//! ├── create_class_proxy_type ──▶ TypeInfo (subclass) ──ctor──▶ ClassProxy
//! └── create_interface_proxy_* ─▶ TypeInfo (interfaces) ──────▶ InterfaceProxy
//!                                                                  │
//!                                                   ProxyDispatch ◀┘
//!                                       (mixins, hook, selector, interceptors)
//! ```

pub mod dispatch;
pub mod generator;
pub mod instances;

pub use dispatch::ProxyDispatch;
pub use generator::DynamicProxyGenerator;
pub use instances::{ClassProxy, InterfaceProxy};
