//! Constructor Selection
//!
//! Binds each constructor of an implementation type against the supplied
//! parameters and the registered services, then invokes the bindable
//! constructor with the most parameters.
//!
//! A constructor parameter is bound, in order of preference, by:
//! 1. the first supplied [`Parameter`] that can fill it
//! 2. a registered service, for dependency parameters
//! 3. its default value

use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{Instance, ResolveContext};
use interpose_domain::value_objects::{
    Argument, Arguments, ConstructorInfo, Parameter, ParameterInfo, ParameterKind, ServiceRef,
    TypeRef,
};
use interpose_domain::Value;
use tracing::trace;

enum Binding {
    Supplied(Argument),
    Service(ServiceRef),
    Default(Value),
}

impl Binding {
    fn into_argument(self, context: &dyn ResolveContext) -> Result<Argument> {
        match self {
            Self::Supplied(argument) => Ok(argument),
            Self::Service(service) => context.resolve_service(&service).map(Argument::Instance),
            Self::Default(value) => Ok(Argument::Value(value)),
        }
    }
}

fn bind_parameter(
    info: &ParameterInfo,
    parameters: &[Parameter],
    context: &dyn ResolveContext,
) -> Option<Binding> {
    if let Some(supplied) = parameters.iter().find(|p| p.can_supply(info)) {
        return Some(Binding::Supplied(supplied.argument().clone()));
    }
    if let ParameterKind::Dependency(service) = &info.kind
        && context.is_registered(service)
    {
        return Some(Binding::Service(service.clone()));
    }
    info.default.clone().map(Binding::Default)
}

fn bind_constructor(
    constructor: &ConstructorInfo,
    parameters: &[Parameter],
    context: &dyn ResolveContext,
) -> std::result::Result<Vec<Binding>, String> {
    constructor
        .parameters()
        .iter()
        .map(|info| {
            bind_parameter(info, parameters, context).ok_or_else(|| describe_parameter(info))
        })
        .collect()
}

fn describe_parameter(info: &ParameterInfo) -> String {
    match &info.kind {
        ParameterKind::Value(kind) => format!("{:?} {}", kind, info.name),
        ParameterKind::Dependency(service) => format!("{service} {}", info.name),
        ParameterKind::Mixin(mixin_type) => format!("mixin {mixin_type} {}", info.name),
        ParameterKind::Interceptors => format!("interceptors {}", info.name),
        ParameterKind::Selector => format!("selector {}", info.name),
    }
}

/// Select and invoke a constructor of `implementation_type`
///
/// # Errors
///
/// Returns a dependency-resolution error listing the unbindable parameter
/// of every constructor when none can be invoked, or the failure raised
/// while resolving dependencies or running the constructor.
pub fn activate_type(
    implementation_type: &TypeRef,
    parameters: &[Parameter],
    context: &dyn ResolveContext,
) -> Result<Instance> {
    let constructors = implementation_type.constructors();
    if constructors.is_empty() {
        return Err(Error::dependency_resolution(format!(
            "No constructors on type '{implementation_type}' can be found"
        )));
    }

    let mut selected: Option<(&ConstructorInfo, Vec<Binding>)> = None;
    let mut failures = Vec::new();
    for constructor in constructors {
        match bind_constructor(constructor, parameters, context) {
            Ok(bindings) => {
                let better = selected.as_ref().is_none_or(|(current, _)| {
                    constructor.parameters().len() > current.parameters().len()
                });
                if better {
                    selected = Some((constructor, bindings));
                }
            }
            Err(unbound) => failures.push(format!(
                "Cannot resolve parameter '{unbound}' of constructor ({})",
                constructor
                    .parameters()
                    .iter()
                    .map(describe_parameter)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }

    let Some((constructor, bindings)) = selected else {
        return Err(Error::dependency_resolution(format!(
            "None of the constructors found on type '{implementation_type}' can be invoked with the available services and parameters:\n{}",
            failures.join("\n")
        )));
    };

    trace!(
        implementation_type = %implementation_type,
        parameters = constructor.parameters().len(),
        "Selected constructor"
    );
    let arguments = bindings
        .into_iter()
        .map(|binding| binding.into_argument(context))
        .collect::<Result<Vec<_>>>()?;
    constructor.invoke(Arguments::new(arguments))
}
