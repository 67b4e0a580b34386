//! Unit tests for domain error types

use interpose_domain::Error;

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("no interceptors given");
    match error {
        Error::InvalidArgument { message } => assert_eq!(message, "no interceptors given"),
        _ => panic!("Expected InvalidArgument error"),
    }
}

#[test]
fn test_configuration_error_display() {
    let error = Error::configuration("type Foo is not accessible");
    assert_eq!(
        error.to_string(),
        "Configuration error: type Foo is not accessible"
    );
    assert!(error.inner().is_none());
}

#[test]
fn test_resolution_error_exposes_domain_cause() {
    let cause = Error::not_transparent_proxy("Customer");
    let error = Error::dependency_resolution_with_source("cannot intercept Customer", cause);

    assert!(error.is_dependency_resolution());
    match error.inner() {
        Some(Error::NotTransparentProxy { type_name }) => assert_eq!(type_name, "Customer"),
        other => panic!("Expected NotTransparentProxy cause, got {other:?}"),
    }
}

#[test]
fn test_root_cause_walks_nested_wrappers() {
    let innermost = Error::missing_member("Account", "close");
    let middle = Error::configuration_with_source("bad registration", innermost);
    let outer = Error::dependency_resolution_with_source("activation failed", middle);

    assert!(matches!(outer.root_cause(), Error::MissingMember { .. }));
    assert!(matches!(outer.inner(), Some(Error::Configuration { .. })));
}

#[test]
fn test_foreign_source_is_not_a_domain_cause() {
    let io = std::io::Error::other("disk gone");
    let error = Error::configuration_with_source("read failed", io);

    assert!(error.inner().is_none());
    assert!(std::ptr::eq(error.root_cause(), &error));
}

#[test]
fn test_interface_not_supported_lists_interfaces() {
    let error = Error::interface_not_supported(
        "IRemoteAccount",
        vec!["IAuditable".to_string(), "ILockable".to_string()],
    );

    assert_eq!(
        error.to_string(),
        "Transparent proxy 'IRemoteAccount' does not support interfaces: IAuditable, ILockable"
    );
}

#[test]
fn test_argument_mismatch_error() {
    let error = Error::argument_mismatch(2, "an integer");
    assert_eq!(error.to_string(), "Argument 2 mismatch: expected an integer");
}
