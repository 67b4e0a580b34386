//! Interceptor Associations
//!
//! Per-registration record of which interceptor services apply. Two
//! sequences are tracked independently in registration metadata:
//!
//! - explicit associations, added by `intercepted_by` calls
//! - declared associations, captured from the [`DeclarationTable`] when a
//!   registration's implementation type is known at configuration time
//!
//! The effective set is their union, explicit first, with no duplicates.

use std::sync::Arc;

use interpose_domain::constants::{
    DECLARED_INTERCEPTORS_METADATA_KEY, INTERCEPTOR_CAPABILITY_TYPE, INTERCEPTORS_METADATA_KEY,
};
use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{Interceptor, Metadata, RegistrationConfigurator, ResolveContext};
use interpose_domain::value_objects::{ServiceRef, TypeRef};
use tracing::trace;

use super::declarations::DeclarationTable;

/// Ordered, duplicate-free list of interceptor services
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterceptorServices(Vec<ServiceRef>);

impl InterceptorServices {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `service` unless an equal one is already present
    pub fn push_distinct(&mut self, service: ServiceRef) -> bool {
        if self.0.contains(&service) {
            return false;
        }
        self.0.push(service);
        true
    }

    /// Services of `self` followed by those of `other` not already present
    pub fn union<'a, I>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = &'a ServiceRef>,
    {
        let mut merged = self.clone();
        merged.extend(other.into_iter().cloned());
        merged
    }

    /// Services in order
    pub fn iter(&self) -> std::slice::Iter<'_, ServiceRef> {
        self.0.iter()
    }

    /// Services as a slice
    pub fn as_slice(&self) -> &[ServiceRef] {
        &self.0
    }

    /// Number of services
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `service` is present
    pub fn contains(&self, service: &ServiceRef) -> bool {
        self.0.contains(service)
    }
}

impl Extend<ServiceRef> for InterceptorServices {
    fn extend<T: IntoIterator<Item = ServiceRef>>(&mut self, iter: T) {
        for service in iter {
            self.push_distinct(service);
        }
    }
}

impl FromIterator<ServiceRef> for InterceptorServices {
    fn from_iter<T: IntoIterator<Item = ServiceRef>>(iter: T) -> Self {
        let mut services = Self::new();
        services.extend(iter);
        services
    }
}

impl<'a> IntoIterator for &'a InterceptorServices {
    type Item = &'a ServiceRef;
    type IntoIter = std::slice::Iter<'a, ServiceRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Association record read back from registration metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationRecord {
    /// Services added by explicit association calls
    pub explicit: InterceptorServices,
    /// Services captured from declarations at configuration time, if any
    pub declared: Option<InterceptorServices>,
}

impl AssociationRecord {
    /// Read the record stored in `metadata`
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            explicit: stored(metadata, INTERCEPTORS_METADATA_KEY).unwrap_or_default(),
            declared: stored(metadata, DECLARED_INTERCEPTORS_METADATA_KEY),
        }
    }

    /// Explicit associations, then declared ones
    ///
    /// When no declarations were captured at configuration time they are
    /// looked up for `implementation_type` in `declarations`.
    pub fn effective(
        &self,
        implementation_type: &TypeRef,
        declarations: &DeclarationTable,
    ) -> InterceptorServices {
        match &self.declared {
            Some(declared) => self.explicit.union(declared),
            None => self
                .explicit
                .union(declarations.interceptors_for(implementation_type).iter()),
        }
    }
}

fn stored(metadata: &Metadata, key: &str) -> Option<InterceptorServices> {
    metadata
        .get(key)
        .and_then(|value| value.downcast_ref::<InterceptorServices>())
        .cloned()
}

fn merge_into<R>(registration: &mut R, key: &str, services: &[ServiceRef])
where
    R: RegistrationConfigurator + ?Sized,
{
    let merged = stored(registration.metadata(), key)
        .unwrap_or_default()
        .union(services);
    registration
        .metadata_mut()
        .insert(key.to_string(), Arc::new(merged));
}

/// Add explicit interceptor associations to a registration
///
/// Existing associations are kept; services already present are not added
/// again. An empty list is rejected.
pub fn associate<R>(registration: &mut R, services: &[ServiceRef]) -> Result<()>
where
    R: RegistrationConfigurator + ?Sized,
{
    if services.is_empty() {
        return Err(Error::invalid_argument(format!(
            "at least one interceptor service is required to intercept {}",
            registration.describe()
        )));
    }
    merge_into(registration, INTERCEPTORS_METADATA_KEY, services);
    trace!(
        registration = %registration.describe(),
        count = services.len(),
        "Associated interceptor services"
    );
    Ok(())
}

/// Record the declarations found on a registration's implementation type
pub fn record_declared<R>(registration: &mut R, services: &InterceptorServices)
where
    R: RegistrationConfigurator + ?Sized,
{
    merge_into(
        registration,
        DECLARED_INTERCEPTORS_METADATA_KEY,
        services.as_slice(),
    );
}

/// Effective interceptor services for a registration and implementation type
pub fn effective_interceptors(
    metadata: &Metadata,
    implementation_type: &TypeRef,
    declarations: &DeclarationTable,
) -> InterceptorServices {
    AssociationRecord::from_metadata(metadata).effective(implementation_type, declarations)
}

/// Resolve every service and check it provides the interceptor capability
pub fn resolve_interceptors(
    context: &dyn ResolveContext,
    services: &InterceptorServices,
) -> Result<Vec<Arc<dyn Interceptor>>> {
    services
        .iter()
        .map(|service| {
            let instance = context.resolve_service(service)?;
            let runtime_type = instance.runtime_type();
            instance.as_interceptor().ok_or_else(|| {
                Error::dependency_resolution(format!(
                    "component {runtime_type} resolved for {service} does not implement {INTERCEPTOR_CAPABILITY_TYPE}"
                ))
            })
        })
        .collect()
}
