//! Tests for the chainable registration extensions

use std::sync::Arc;

use interpose_application::interception::AssociationRecord;
use interpose_application::{Interception, InterceptionExt, ScanningInterceptionExt};
use interpose_domain::Error;
use interpose_domain::ports::ProxyGenerationOptions;
use interpose_domain::value_objects::{ServiceRef, TypeInfo, TypeRef, ValueKind};

use crate::test_utils::fakes::{FakeGenerator, FakeRegistration, FakeRemoting, FakeScan};

fn calculator() -> TypeRef {
    TypeInfo::class("Calculator")
        .virtual_method("add", ValueKind::Int)
        .build()
}

fn interception(generator: &Arc<FakeGenerator>) -> Interception {
    Interception::new(generator.clone())
}

fn explicit(registration: &FakeRegistration) -> Vec<ServiceRef> {
    AssociationRecord::from_metadata(&registration.metadata)
        .explicit
        .as_slice()
        .to_vec()
}

#[test]
fn test_class_interception_chains_into_associations() {
    let generator = Arc::new(FakeGenerator::default());
    let audit_type = TypeInfo::class("AuditInterceptor").build();
    let mut registration = FakeRegistration::for_type(&calculator());

    registration
        .enable_class_interceptors(&interception(&generator))
        .unwrap()
        .intercepted_by_types(&[audit_type.clone()])
        .unwrap()
        .intercepted_by_names(&["timing"])
        .unwrap();

    assert_eq!(
        registration.implementation.as_ref().map(|t| t.name()),
        Some("CalculatorProxy")
    );
    assert_eq!(
        explicit(&registration),
        vec![
            ServiceRef::typed(&audit_type),
            ServiceRef::interceptor_named("timing"),
        ]
    );
}

#[test]
fn test_class_interception_passes_options_to_the_generator() {
    let generator = Arc::new(FakeGenerator::default());
    let auditable = TypeInfo::interface("IAuditable").build();
    let mut registration = FakeRegistration::for_type(&calculator());

    registration
        .enable_class_interceptors_with(
            &interception(&generator),
            ProxyGenerationOptions::new().with_additional_interface(&auditable),
        )
        .unwrap();

    let proxy_type = registration.implementation.clone().unwrap();
    assert!(proxy_type.is_assignable_to(&auditable));
}

#[test]
fn test_blank_interceptor_names_are_rejected() {
    let generator = Arc::new(FakeGenerator::default());
    let mut registration = FakeRegistration::for_type(&calculator());

    let err = registration
        .enable_class_interceptors(&interception(&generator))
        .unwrap()
        .intercepted_by_names(&["audit", "  "])
        .err()
        .unwrap();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(explicit(&registration).is_empty());
}

#[test]
fn test_interface_interception_adds_middleware() {
    let generator = Arc::new(FakeGenerator::default());
    let mut registration = FakeRegistration::for_type(&calculator());

    registration
        .enable_interface_interceptors(&interception(&generator))
        .enable_interface_interceptors_with(&interception(&generator), ProxyGenerationOptions::new());

    assert_eq!(registration.middleware.len(), 2);
    assert_eq!(registration.middleware[0].name(), "interface-interception");
    assert!(generator.calls().is_empty());
}

#[test]
fn test_transparent_interception_requires_remoting() {
    let generator = Arc::new(FakeGenerator::default());
    let mut registration = FakeRegistration::for_factory(&calculator());

    let err = registration
        .intercept_transparent_proxy(&interception(&generator), &[])
        .err()
        .unwrap();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(registration.middleware.is_empty());
}

#[test]
fn test_transparent_interception_with_remoting() {
    let generator = Arc::new(FakeGenerator::default());
    let interception = interception(&generator).with_remoting(Arc::new(FakeRemoting));
    let mut registration = FakeRegistration::for_factory(&calculator());

    registration
        .intercept_transparent_proxy(&interception, &[])
        .unwrap()
        .intercepted_by_names(&["audit"])
        .unwrap();

    assert_eq!(registration.middleware.len(), 1);
    assert_eq!(
        registration.middleware[0].name(),
        "transparent-proxy-interception"
    );
    assert_eq!(explicit(&registration), vec![ServiceRef::interceptor_named("audit")]);
}

#[test]
fn test_scanning_defers_configuration_per_registration() {
    let generator = Arc::new(FakeGenerator::default());
    let calculator = calculator();
    let mut scan = FakeScan::default();

    scan.enable_class_interceptors(&interception(&generator))
        .intercepted_by_names(&["audit"])
        .unwrap();
    assert!(generator.calls().is_empty());

    let mut registration = FakeRegistration::for_type(&calculator);
    scan.apply_to(&calculator, &mut registration).unwrap();

    assert_eq!(generator.calls(), vec!["class:Calculator".to_string()]);
    assert_eq!(explicit(&registration), vec![ServiceRef::interceptor_named("audit")]);
}

#[test]
fn test_scanning_rejects_empty_interceptor_lists() {
    let mut scan = FakeScan::default();

    let err = ScanningInterceptionExt::intercepted_by(&mut scan, &[])
        .err()
        .unwrap();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(scan.actions.is_empty());
}

#[test]
fn test_scanned_class_errors_surface_when_applied() {
    let generator = Arc::new(FakeGenerator::default());
    let interface = TypeInfo::interface("ICalculator").build();
    let mut scan = FakeScan::default();
    scan.enable_interface_interceptors(&interception(&generator));
    scan.enable_class_interceptors(&interception(&generator));

    let mut registration = FakeRegistration::for_type(&interface);
    let err = scan.apply_to(&interface, &mut registration).err().unwrap();

    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(registration.middleware.len(), 1);
}

#[test]
fn test_interception_defaults() {
    let generator = Arc::new(FakeGenerator::default());
    let interception = interception(&generator);

    assert!(interception.remoting().is_none());
    assert_eq!(
        interception.declarations().len(),
        interpose_application::INTERCEPT_DECLARATIONS
            .iter()
            .map(|declaration| declaration.target)
            .collect::<std::collections::HashSet<_>>()
            .len()
    );
}
