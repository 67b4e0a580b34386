//! Tests for type-level interceptor declarations

use interpose_application::interception::{
    DeclarationTable, INTERCEPT_DECLARATIONS, InterceptDeclaration,
};
use interpose_domain::value_objects::{ServiceRef, TypeInfo};

#[linkme::distributed_slice(INTERCEPT_DECLARATIONS)]
static LEDGER_AUDIT: InterceptDeclaration = InterceptDeclaration {
    target: "Ledger",
    interceptor: || ServiceRef::interceptor_named("audit"),
};

#[test]
fn test_class_then_base_then_interfaces() {
    let auditable = TypeInfo::interface("IAuditable").build();
    let account = TypeInfo::class("Account").implements(&auditable).build();
    let proxy = TypeInfo::class("AccountProxy")
        .base(&account)
        .implements(&auditable)
        .build();
    let mut table = DeclarationTable::new();
    table
        .declare_named(&auditable, "from-interface")
        .declare_named(&account, "from-base")
        .declare_named(&proxy, "from-class")
        .declare_named(&account, "from-interface");

    let services = table.interceptors_for(&proxy);

    assert_eq!(
        services.as_slice(),
        &[
            ServiceRef::interceptor_named("from-class"),
            ServiceRef::interceptor_named("from-base"),
            ServiceRef::interceptor_named("from-interface"),
        ]
    );
}

#[test]
fn test_interfaces_yield_nothing() {
    let auditable = TypeInfo::interface("IAuditable").build();
    let mut table = DeclarationTable::new();
    table.declare_named(&auditable, "audit");

    assert!(table.interceptors_for(&auditable).is_empty());
    assert_eq!(table.declared_on(&auditable).len(), 1);
}

#[test]
fn test_declaring_again_is_idempotent() {
    let account = TypeInfo::class("Account").build();
    let audit_type = TypeInfo::class("AuditInterceptor").build();
    let mut table = DeclarationTable::new();
    table.declare_type(&account, &audit_type);
    table.declare_type(&account, &audit_type);

    assert_eq!(table.len(), 1);
    assert_eq!(
        table.interceptors_for(&account).as_slice(),
        &[ServiceRef::typed(&audit_type)]
    );
}

#[test]
fn test_new_declarations_invalidate_cached_scans() {
    let account = TypeInfo::class("Account").build();
    let mut table = DeclarationTable::new();

    assert!(table.interceptors_for(&account).is_empty());
    table.declare_named(&account, "audit");

    assert_eq!(table.interceptors_for(&account).len(), 1);
}

#[test]
fn test_repeated_scans_share_the_result() {
    let account = TypeInfo::class("Account").build();
    let mut table = DeclarationTable::new();
    table.declare_named(&account, "audit");

    let first = table.interceptors_for(&account);
    let second = table.interceptors_for(&account);

    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn test_link_time_declarations_are_loaded() {
    let ledger = TypeInfo::class("Ledger").build();

    let table = DeclarationTable::with_registered();

    assert!(!table.is_empty());
    assert!(
        table
            .interceptors_for(&ledger)
            .contains(&ServiceRef::interceptor_named("audit"))
    );
    assert!(DeclarationTable::new().interceptors_for(&ledger).is_empty());
}
