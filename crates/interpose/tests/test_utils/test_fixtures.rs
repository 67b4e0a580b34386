//! Type descriptors and container helpers

use std::sync::{Arc, LazyLock};

use interpose::domain::ports::{Instance, InterceptorComponent};
use interpose::domain::value_objects::{
    ConstructorInfo, ParameterInfo, ServiceRef, TypeInfo, TypeRef, ValueKind, Visibility,
    interceptor_type,
};
use interpose::infrastructure::config::AppConfig;
use interpose::infrastructure::di::{ContainerBuilder, InterceptionRuntime, bootstrap};
use serde_json::json;

use super::mock_components::{
    AddOne, CalculatorImpl, CustomerImpl, DictionaryMixin, OffsetSource, Prefix, ValueHolder,
};

pub static ICALCULATOR: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("ICalculator")
        .method("add", ValueKind::Int)
        .method("subtract", ValueKind::Int)
        .build()
});

fn calculator_class(name: &'static str, visibility: Visibility, slot: &'static LazyLock<TypeRef>) -> TypeRef {
    TypeInfo::class(name)
        .visibility(visibility)
        .implements(&ICALCULATOR)
        .virtual_method("add", ValueKind::Int)
        .virtual_method("subtract", ValueKind::Int)
        .method("describe", ValueKind::Str)
        .constructor(ConstructorInfo::parameterless(move || {
            Arc::new(CalculatorImpl::new(slot, 0)) as Instance
        }))
        .build()
}

pub static CALCULATOR: LazyLock<TypeRef> =
    LazyLock::new(|| calculator_class("Calculator", Visibility::Public, &CALCULATOR));

pub static LINKED_CALCULATOR: LazyLock<TypeRef> =
    LazyLock::new(|| calculator_class("LinkedCalculator", Visibility::Public, &LINKED_CALCULATOR));

pub static PRIVATE_CALCULATOR: LazyLock<TypeRef> =
    LazyLock::new(|| calculator_class("PrivateCalculator", Visibility::Private, &PRIVATE_CALCULATOR));

pub static VALUE_HOLDER: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("ValueHolder")
        .virtual_method("get_i", ValueKind::Int)
        .constructor(ConstructorInfo::new(
            vec![ParameterInfo::value("i", ValueKind::Int).with_default(json!(10))],
            |arguments| Ok(Arc::new(ValueHolder::new(&VALUE_HOLDER, arguments.int(0)?)) as Instance),
        ))
        .build()
});

pub static IOFFSET: LazyLock<TypeRef> =
    LazyLock::new(|| TypeInfo::interface("IOffset").method("offset", ValueKind::Int).build());

pub static OFFSET_SOURCE: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("OffsetSource")
        .implements(&IOFFSET)
        .method("offset", ValueKind::Int)
        .constructor(ConstructorInfo::parameterless(|| {
            Arc::new(OffsetSource::new(&OFFSET_SOURCE, 100)) as Instance
        }))
        .build()
});

pub static OFFSET_CALCULATOR: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("OffsetCalculator")
        .implements(&ICALCULATOR)
        .virtual_method("add", ValueKind::Int)
        .virtual_method("subtract", ValueKind::Int)
        .constructor(ConstructorInfo::new(
            vec![ParameterInfo::dependency("offset", ServiceRef::typed(&IOFFSET))],
            |arguments| {
                let offset = arguments.instance(0)?.invoke("offset", &[])?;
                Ok(Arc::new(CalculatorImpl::new(
                    &OFFSET_CALCULATOR,
                    offset.as_i64().unwrap_or_default(),
                )) as Instance)
            },
        ))
        .build()
});

pub static ICUSTOMER: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("ICustomer")
        .method("name", ValueKind::Str)
        .method("age", ValueKind::Int)
        .build()
});

pub static IHIDDEN: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("IHidden")
        .visibility(Visibility::Private)
        .method("secret", ValueKind::Str)
        .build()
});

pub static CUSTOMER: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("Customer")
        .implements(&ICUSTOMER)
        .method("name", ValueKind::Str)
        .method("age", ValueKind::Int)
        .constructor(ConstructorInfo::parameterless(|| {
            Arc::new(CustomerImpl::new(&CUSTOMER, "Alice", 42)) as Instance
        }))
        .build()
});

pub static HIDDEN_CUSTOMER: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("HiddenCustomer")
        .implements(&ICUSTOMER)
        .implements(&IHIDDEN)
        .method("name", ValueKind::Str)
        .method("age", ValueKind::Int)
        .method("secret", ValueKind::Str)
        .constructor(ConstructorInfo::parameterless(|| {
            Arc::new(CustomerImpl::new(&HIDDEN_CUSTOMER, "Bob", 7)) as Instance
        }))
        .build()
});

pub static IDICTIONARY: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("IDictionary")
        .method("get", ValueKind::Json)
        .method("set", ValueKind::Unit)
        .build()
});

pub static DICTIONARY_MIXIN: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("DictionaryMixin")
        .implements(&IDICTIONARY)
        .method("get", ValueKind::Json)
        .method("set", ValueKind::Unit)
        .build()
});

pub static IREMOTE_ACCOUNT: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("IRemoteAccount")
        .method("balance", ValueKind::Int)
        .method("owner", ValueKind::Str)
        .build()
});

pub static IAUDITABLE: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::interface("IAuditable")
        .method("audit_trail", ValueKind::Json)
        .build()
});

pub static ADD_ONE_TYPE: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("AddOneInterceptor")
        .implements(&interceptor_type())
        .build()
});

pub static PREFIX_TYPE: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::class("PrefixInterceptor")
        .implements(&interceptor_type())
        .build()
});

/// Fresh runtime with default configuration
pub fn runtime() -> InterceptionRuntime {
    bootstrap(&AppConfig::default())
}

/// Register `AddOne` and `Prefix`, both by type and under their names
pub fn register_interceptors(builder: &mut ContainerBuilder) {
    builder
        .register_instance(InterceptorComponent::instance(&ADD_ONE_TYPE, AddOne))
        .as_self()
        .keyed("add-one", &interceptor_type());
    builder
        .register_instance(InterceptorComponent::instance(&PREFIX_TYPE, Prefix))
        .as_self()
        .keyed("prefix", &interceptor_type());
}

/// New dictionary mixin instance
pub fn dictionary_mixin() -> Instance {
    Arc::new(DictionaryMixin::new(&DICTIONARY_MIXIN))
}
