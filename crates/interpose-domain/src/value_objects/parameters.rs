//! Constructor Parameters
//!
//! [`ParameterInfo`] describes what a constructor needs, [`Parameter`] is
//! what a caller (or a preparing hook) supplies, and [`Arguments`] is the
//! final positional list handed to the constructor.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::ports::component::Instance;
use crate::ports::interception::{Interceptor, InterceptorSelector};
use crate::value_objects::service::ServiceRef;
use crate::value_objects::types::{TypeRef, ValueKind};

/// What a constructor parameter expects
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// Plain dynamic value
    Value(ValueKind),
    /// Component resolved from the container
    Dependency(ServiceRef),
    /// Mixin instance implementing the given type
    Mixin(TypeRef),
    /// Ordered interceptor instances
    Interceptors,
    /// Interceptor selector
    Selector,
}

/// Constructor parameter description
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// Zero-based position in the constructor
    pub position: usize,
    /// Parameter name
    pub name: String,
    /// Expected argument
    pub kind: ParameterKind,
    /// Value used when nothing else supplies the parameter
    pub default: Option<Value>,
}

impl ParameterInfo {
    fn new<S: Into<String>>(name: S, kind: ParameterKind) -> Self {
        Self {
            position: 0,
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Plain value parameter
    pub fn value<S: Into<String>>(name: S, kind: ValueKind) -> Self {
        Self::new(name, ParameterKind::Value(kind))
    }

    /// Dependency resolved from the container
    pub fn dependency<S: Into<String>>(name: S, service: ServiceRef) -> Self {
        Self::new(name, ParameterKind::Dependency(service))
    }

    /// Mixin instance
    pub fn mixin<S: Into<String>>(name: S, mixin_type: &TypeRef) -> Self {
        Self::new(name, ParameterKind::Mixin(Arc::clone(mixin_type)))
    }

    /// Interceptor list
    pub fn interceptors<S: Into<String>>(name: S) -> Self {
        Self::new(name, ParameterKind::Interceptors)
    }

    /// Interceptor selector
    pub fn selector<S: Into<String>>(name: S) -> Self {
        Self::new(name, ParameterKind::Selector)
    }

    /// Set the fallback value
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Move the parameter to `position`
    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

/// Argument value supplied to a constructor
#[derive(Clone)]
pub enum Argument {
    /// Plain dynamic value
    Value(Value),
    /// Component instance
    Instance(Instance),
    /// Ordered interceptor instances
    Interceptors(Vec<Arc<dyn Interceptor>>),
    /// Interceptor selector
    Selector(Arc<dyn InterceptorSelector>),
}

impl Argument {
    /// Whether the argument can fill a parameter of `kind`
    pub fn matches(&self, kind: &ParameterKind) -> bool {
        match (self, kind) {
            (Self::Value(value), ParameterKind::Value(expected)) => expected.accepts(value),
            (Self::Instance(instance), ParameterKind::Dependency(service)) => service
                .service_type()
                .is_some_and(|t| instance.runtime_type().is_assignable_to(t)),
            (Self::Instance(instance), ParameterKind::Mixin(mixin_type)) => {
                instance.runtime_type().is_assignable_to(mixin_type)
            }
            (Self::Interceptors(_), ParameterKind::Interceptors) => true,
            (Self::Selector(_), ParameterKind::Selector) => true,
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Value(value) => format!("value {value}"),
            Self::Instance(instance) => format!("instance of {}", instance.runtime_type()),
            Self::Interceptors(interceptors) => format!("{} interceptor(s)", interceptors.len()),
            Self::Selector(_) => "interceptor selector".to_string(),
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Instance> for Argument {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

/// Parameter supplied by a caller or a preparing hook
#[derive(Debug, Clone)]
pub enum Parameter {
    /// Fills the constructor parameter at `position`
    Positional {
        /// Zero-based position
        position: usize,
        /// Supplied argument
        argument: Argument,
    },
    /// Fills the constructor parameter called `name`
    Named {
        /// Parameter name
        name: String,
        /// Supplied argument
        argument: Argument,
    },
    /// Fills the first compatible constructor parameter
    Typed(Argument),
}

impl Parameter {
    /// Positional parameter
    pub fn positional<A: Into<Argument>>(position: usize, argument: A) -> Self {
        Self::Positional {
            position,
            argument: argument.into(),
        }
    }

    /// Named parameter
    pub fn named<S: Into<String>, A: Into<Argument>>(name: S, argument: A) -> Self {
        Self::Named {
            name: name.into(),
            argument: argument.into(),
        }
    }

    /// Parameter matched by argument shape
    pub fn typed<A: Into<Argument>>(argument: A) -> Self {
        Self::Typed(argument.into())
    }

    /// The supplied argument
    pub fn argument(&self) -> &Argument {
        match self {
            Self::Positional { argument, .. } | Self::Named { argument, .. } | Self::Typed(argument) => {
                argument
            }
        }
    }

    /// Whether this parameter supplies `info`
    pub fn can_supply(&self, info: &ParameterInfo) -> bool {
        match self {
            Self::Positional { position, .. } => *position == info.position,
            Self::Named { name, .. } => *name == info.name,
            Self::Typed(argument) => argument.matches(&info.kind),
        }
    }
}

/// Positional arguments handed to a constructor
#[derive(Debug, Clone, Default)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    /// Wrap an argument list
    pub fn new(arguments: Vec<Argument>) -> Self {
        Self(arguments)
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `position`
    pub fn get(&self, position: usize) -> Result<&Argument> {
        self.0
            .get(position)
            .ok_or_else(|| Error::argument_mismatch(position, "an argument"))
    }

    /// Plain value at `position`
    pub fn value(&self, position: usize) -> Result<&Value> {
        match self.get(position)? {
            Argument::Value(value) => Ok(value),
            _ => Err(Error::argument_mismatch(position, "a value")),
        }
    }

    /// Integer at `position`
    pub fn int(&self, position: usize) -> Result<i64> {
        self.value(position)?
            .as_i64()
            .ok_or_else(|| Error::argument_mismatch(position, "an integer"))
    }

    /// String at `position`
    pub fn string(&self, position: usize) -> Result<String> {
        self.value(position)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::argument_mismatch(position, "a string"))
    }

    /// Component instance at `position`
    pub fn instance(&self, position: usize) -> Result<Instance> {
        match self.get(position)? {
            Argument::Instance(instance) => Ok(Arc::clone(instance)),
            _ => Err(Error::argument_mismatch(position, "a component instance")),
        }
    }

    /// Interceptor list at `position`
    pub fn interceptors(&self, position: usize) -> Result<Vec<Arc<dyn Interceptor>>> {
        match self.get(position)? {
            Argument::Interceptors(interceptors) => Ok(interceptors.clone()),
            _ => Err(Error::argument_mismatch(position, "an interceptor list")),
        }
    }

    /// Interceptor selector at `position`
    pub fn selector(&self, position: usize) -> Result<Arc<dyn InterceptorSelector>> {
        match self.get(position)? {
            Argument::Selector(selector) => Ok(Arc::clone(selector)),
            _ => Err(Error::argument_mismatch(position, "an interceptor selector")),
        }
    }

    /// Split into the first `at` arguments and the rest
    pub fn split_at(mut self, at: usize) -> (Arguments, Arguments) {
        let at = at.min(self.0.len());
        let rest = self.0.split_off(at);
        (self, Arguments(rest))
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(arguments: Vec<Argument>) -> Self {
        Self(arguments)
    }
}
