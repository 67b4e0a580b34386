//! In-process remoting tests

use std::sync::{Arc, LazyLock, Mutex};

use interpose_domain::Error;
use interpose_domain::ports::RemotingServices;
use interpose_domain::value_objects::{TypeInfo, TypeRef, ValueKind};
use interpose_infrastructure::remoting::{InProcessRemoting, TransparentProxy};
use serde_json::json;

use crate::test_utils::components::Labelled;

static IACCOUNT: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("IAccount")
        .method("balance", ValueKind::Int)
        .build()
});

static IAUDITABLE: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("IAuditable")
        .method("audit_trail", ValueKind::Json)
        .build()
});

static ILOCKABLE: LazyLock<TypeRef> = LazyLock::new(|| TypeInfo::interface("ILockable").build());

#[test]
fn test_stub_forwards_known_members_to_its_endpoint() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let stub = TransparentProxy::new(&IACCOUNT, move |method, arguments| {
        seen.lock().unwrap().push(method.to_string());
        Ok(json!({ "method": method, "arguments": arguments }))
    })
    .supporting(&IAUDITABLE)
    .into_instance();

    let balance = stub.invoke("balance", &[json!(1)]).unwrap();
    let trail = stub.invoke("audit_trail", &[]).unwrap();
    let unknown = stub.invoke("close", &[]).err().unwrap();

    assert_eq!(balance["arguments"], json!([1]));
    assert_eq!(trail["method"], json!("audit_trail"));
    assert!(matches!(unknown, Error::MissingMember { .. }));
    assert_eq!(*calls.lock().unwrap(), vec!["balance", "audit_trail"]);
}

#[test]
fn test_capability_queries() {
    let remoting = InProcessRemoting::new();
    let stub = TransparentProxy::new(&IACCOUNT, |_, _| Ok(json!(null)))
        .supporting(&IAUDITABLE)
        .supporting(&IAUDITABLE)
        .into_instance();

    assert!(remoting.is_transparent_proxy(&stub));
    assert!(remoting.can_cast_to(&stub, &IACCOUNT).supported);
    assert!(remoting.can_cast_to(&stub, &IAUDITABLE).supported);
    let answer = remoting.can_cast_to(&stub, &ILOCKABLE);
    assert!(!answer.supported);
    assert_eq!(answer.queried, *ILOCKABLE);
}

#[test]
fn test_local_objects_are_not_stubs() {
    let remoting = InProcessRemoting::new();
    let local_type = TypeInfo::class("LocalAccount").implements(&IACCOUNT).build();
    let local = Labelled::instance(&local_type, "local");

    assert!(!remoting.is_transparent_proxy(&local));
    assert!(!remoting.can_cast_to(&local, &IACCOUNT).supported);
}

#[test]
fn test_stub_debug_lists_supported_interfaces() {
    let stub = TransparentProxy::new(&IACCOUNT, |_, _| Ok(json!(null))).supporting(&ILOCKABLE);

    let debug = format!("{stub:?}");

    assert!(debug.contains("IAccount"));
    assert!(debug.contains("ILockable"));
    assert!(stub.supports_interface(&ILOCKABLE));
    assert!(!stub.supports_interface(&IAUDITABLE));
}
