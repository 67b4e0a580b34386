//! Type Descriptors
//!
//! Explicit, queryable descriptions of the component types a container can
//! activate and a proxy generator can extend. They stand in for runtime
//! reflection: every class lists its interfaces, members and constructors.
//!
//! Two descriptors are the same type when their names are equal.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::ports::component::Instance;
use crate::value_objects::parameters::{Arguments, ParameterInfo};

/// Shared handle to a type descriptor
pub type TypeRef = Arc<TypeInfo>;

/// Class or interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Concrete, activatable type
    Class,
    /// Contract implemented by classes
    Interface,
}

/// Accessibility of a type from outside its defining module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible inside the defining crate, optionally opened up to generated proxies
    Internal {
        /// Whether generated proxies may implement or extend the type
        visible_to_proxies: bool,
    },
    /// Nested private type, never visible to generated proxies
    Private,
}

/// Shape of a dynamic value returned from or passed to a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// No value
    Unit,
    /// Boolean
    Bool,
    /// Integer
    Int,
    /// Floating point number
    Float,
    /// String
    Str,
    /// Any JSON value
    Json,
}

impl ValueKind {
    /// Whether `value` has this shape
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Unit => value.is_null(),
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Str => value.is_string(),
            Self::Json => true,
        }
    }
}

/// Member of a type that can be invoked dynamically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// Member name
    pub name: String,
    /// Shape of the returned value
    pub returns: ValueKind,
    /// Whether a generated subclass can override the member
    pub is_virtual: bool,
    /// Name of the type that declares the member
    pub declaring_type: String,
}

impl MethodInfo {
    /// Create a member description
    pub fn new<N: Into<String>, D: Into<String>>(
        name: N,
        returns: ValueKind,
        is_virtual: bool,
        declaring_type: D,
    ) -> Self {
        Self {
            name: name.into(),
            returns,
            is_virtual,
            declaring_type: declaring_type.into(),
        }
    }
}

/// Builds an instance from resolved constructor arguments
pub type Activator = Arc<dyn Fn(Arguments) -> Result<Instance> + Send + Sync>;

/// Constructor of a class: its parameter list and the function that runs it
#[derive(Clone)]
pub struct ConstructorInfo {
    parameters: Vec<ParameterInfo>,
    activator: Activator,
}

impl ConstructorInfo {
    /// Create a constructor; parameter positions follow the order given
    pub fn new<F>(parameters: Vec<ParameterInfo>, activator: F) -> Self
    where
        F: Fn(Arguments) -> Result<Instance> + Send + Sync + 'static,
    {
        Self::from_activator(parameters, Arc::new(activator))
    }

    /// Create a constructor from an already shared activator
    pub fn from_activator(parameters: Vec<ParameterInfo>, activator: Activator) -> Self {
        let parameters = parameters
            .into_iter()
            .enumerate()
            .map(|(position, parameter)| parameter.at(position))
            .collect();
        Self {
            parameters,
            activator,
        }
    }

    /// Parameterless constructor
    pub fn parameterless<F>(activator: F) -> Self
    where
        F: Fn() -> Instance + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| Ok(activator()))
    }

    /// Parameters in positional order
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Run the constructor
    pub fn invoke(&self, arguments: Arguments) -> Result<Instance> {
        (self.activator)(arguments)
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Description of a class or interface
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
    visibility: Visibility,
    interfaces: Vec<TypeRef>,
    methods: Vec<MethodInfo>,
    constructors: Vec<ConstructorInfo>,
    base_type: Option<TypeRef>,
}

impl TypeInfo {
    /// Start describing a class
    pub fn class<S: Into<String>>(name: S) -> TypeBuilder {
        TypeBuilder::new(name.into(), TypeKind::Class)
    }

    /// Start describing an interface
    pub fn interface<S: Into<String>>(name: S) -> TypeBuilder {
        TypeBuilder::new(name.into(), TypeKind::Interface)
    }

    /// Type name; also its identity
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class or interface
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether this is a class
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Accessibility of the type
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Every interface the type implements (or extends), transitively
    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    /// Members declared or inherited by the type
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Find a member by name
    pub fn find_method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Constructors, in declaration order
    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    /// Base class for generated subclasses
    pub fn base_type(&self) -> Option<&TypeRef> {
        self.base_type.as_ref()
    }

    /// Whether a value of this type can be used where `other` is expected
    pub fn is_assignable_to(&self, other: &TypeInfo) -> bool {
        if self == other || self.interfaces.iter().any(|i| i.as_ref() == other) {
            return true;
        }
        self.base_type
            .as_ref()
            .is_some_and(|base| base.is_assignable_to(other))
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for [`TypeInfo`]
pub struct TypeBuilder {
    info: TypeInfo,
}

impl TypeBuilder {
    fn new(name: String, kind: TypeKind) -> Self {
        Self {
            info: TypeInfo {
                name,
                kind,
                visibility: Visibility::Public,
                interfaces: Vec::new(),
                methods: Vec::new(),
                constructors: Vec::new(),
                base_type: None,
            },
        }
    }

    /// Set the accessibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.info.visibility = visibility;
        self
    }

    /// Implement (class) or extend (interface) an interface, with everything it extends
    pub fn implements(mut self, interface: &TypeRef) -> Self {
        let inherited = std::iter::once(interface).chain(interface.interfaces.iter());
        for candidate in inherited {
            if !self.info.interfaces.contains(candidate) {
                self.info.interfaces.push(Arc::clone(candidate));
            }
        }
        self
    }

    /// Declare a member; interface members are always overridable
    pub fn method<S: Into<String>>(self, name: S, returns: ValueKind) -> Self {
        let is_virtual = self.info.is_interface();
        self.member(name.into(), returns, is_virtual)
    }

    /// Declare an overridable member
    pub fn virtual_method<S: Into<String>>(self, name: S, returns: ValueKind) -> Self {
        self.member(name.into(), returns, true)
    }

    fn member(mut self, name: String, returns: ValueKind, is_virtual: bool) -> Self {
        let declaring_type = self.info.name.clone();
        self.info
            .methods
            .push(MethodInfo::new(name, returns, is_virtual, declaring_type));
        self
    }

    /// Append an already described member
    pub fn with_method(mut self, method: MethodInfo) -> Self {
        if self.info.find_method(&method.name).is_none() {
            self.info.methods.push(method);
        }
        self
    }

    /// Add a constructor
    pub fn constructor(mut self, constructor: ConstructorInfo) -> Self {
        self.info.constructors.push(constructor);
        self
    }

    /// Set the base class
    pub fn base(mut self, base: &TypeRef) -> Self {
        self.info.base_type = Some(Arc::clone(base));
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> TypeRef {
        Arc::new(self.info)
    }
}
