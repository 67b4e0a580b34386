//! Interceptor Declarations
//!
//! Associates interceptor services with types, independent of any single
//! registration. A declaration on a class applies to every registration
//! activating that class; a declaration on an interface applies to every
//! class implementing it.
//!
//! Declarations come from two places:
//!
//! ```text
//! #[distributed_slice(INTERCEPT_DECLARATIONS)]     DeclarationTable::declare(..)
//! (link time, any crate)                          (composition root)
//!                 │                                        │
//!                 └──────────────┬─────────────────────────┘
//!                                ▼
//!                   DeclarationTable::interceptors_for(type)
//!                   class + base classes, then interfaces
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use interpose_domain::value_objects::{ServiceRef, TypeRef};
use tracing::debug;

use super::associations::InterceptorServices;

/// Declaration contributed at link time
///
/// # Example
///
/// ```ignore
/// use interpose_application::interception::{INTERCEPT_DECLARATIONS, InterceptDeclaration};
/// use interpose_domain::ServiceRef;
///
/// #[linkme::distributed_slice(INTERCEPT_DECLARATIONS)]
/// static AUDITED_ACCOUNTS: InterceptDeclaration = InterceptDeclaration {
///     target: "AccountService",
///     interceptor: || ServiceRef::interceptor_named("audit"),
/// };
/// ```
pub struct InterceptDeclaration {
    /// Name of the class or interface the declaration is attached to
    pub target: &'static str,
    /// Interceptor service the target must be intercepted by
    pub interceptor: fn() -> ServiceRef,
}

/// Link-time declarations collected from every crate in the binary
#[linkme::distributed_slice]
pub static INTERCEPT_DECLARATIONS: [InterceptDeclaration] = [..];

/// Explicit, queryable declaration table keyed by type name
#[derive(Default)]
pub struct DeclarationTable {
    declared: HashMap<String, InterceptorServices>,
    scans: DashMap<String, Arc<InterceptorServices>>,
}

impl DeclarationTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with every link-time declaration
    pub fn with_registered() -> Self {
        let mut table = Self::new();
        for entry in INTERCEPT_DECLARATIONS {
            table.declare_on(entry.target, (entry.interceptor)());
        }
        debug!(
            count = INTERCEPT_DECLARATIONS.len(),
            "Loaded link-time interceptor declarations"
        );
        table
    }

    /// Declare that `target` must be intercepted by `interceptor`
    pub fn declare(&mut self, target: &TypeRef, interceptor: ServiceRef) -> &mut Self {
        self.declare_on(target.name(), interceptor);
        self
    }

    /// Declare an interceptor registered by type
    pub fn declare_type(&mut self, target: &TypeRef, interceptor_type: &TypeRef) -> &mut Self {
        self.declare(target, ServiceRef::typed(interceptor_type))
    }

    /// Declare an interceptor registered by name
    pub fn declare_named<S: Into<String>>(&mut self, target: &TypeRef, name: S) -> &mut Self {
        self.declare(target, ServiceRef::interceptor_named(name))
    }

    fn declare_on(&mut self, target: &str, interceptor: ServiceRef) {
        self.declared
            .entry(target.to_string())
            .or_default()
            .push_distinct(interceptor);
        self.scans.clear();
    }

    /// Declarations attached directly to `target`
    pub fn declared_on(&self, target: &TypeRef) -> InterceptorServices {
        self.declared
            .get(target.name())
            .cloned()
            .unwrap_or_default()
    }

    /// Interceptors declared for an implementation type
    ///
    /// Returns the declarations on the class (and, for generated subclasses,
    /// on its base classes) followed by those on every interface it
    /// implements, without duplicates. Interfaces and other non-class types
    /// yield an empty set. Results are cached per type; concurrent first
    /// scans compute the same value.
    pub fn interceptors_for(&self, implementation_type: &TypeRef) -> Arc<InterceptorServices> {
        if let Some(cached) = self.scans.get(implementation_type.name()) {
            return Arc::clone(cached.value());
        }

        let scanned = Arc::new(self.scan(implementation_type));
        self.scans
            .entry(implementation_type.name().to_string())
            .or_insert_with(|| Arc::clone(&scanned));
        scanned
    }

    fn scan(&self, implementation_type: &TypeRef) -> InterceptorServices {
        if !implementation_type.is_class() {
            return InterceptorServices::new();
        }

        let mut services = InterceptorServices::new();
        let mut class = Some(implementation_type);
        while let Some(current) = class {
            services.extend(self.declared_on(current).iter().cloned());
            class = current.base_type();
        }
        for interface in implementation_type.interfaces() {
            services.extend(self.declared_on(interface).iter().cloned());
        }
        services
    }

    /// Number of types with at least one declaration
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    /// Whether no declarations exist
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}
