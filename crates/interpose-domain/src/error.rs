//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error carried as the cause of a wrapped failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for interpose
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Registration or container configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// A component or one of its dependencies could not be resolved
    #[error("Dependency resolution error: {message}")]
    DependencyResolution {
        /// Description of the resolution failure
        message: String,
        /// The failure raised while activating the component, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Instance handed to transparent-proxy interception is a local object
    #[error("Type '{type_name}' is not a transparent proxy")]
    NotTransparentProxy {
        /// Runtime type of the offending instance
        type_name: String,
    },

    /// Transparent proxy does not present an interface type
    #[error("Transparent proxy of type '{type_name}' is not an interface")]
    TransparentProxyNotInterface {
        /// Runtime type of the offending stub
        type_name: String,
    },

    /// Transparent proxy cannot be cast to the requested interfaces
    #[error("Transparent proxy '{stub_type}' does not support interfaces: {}", .interfaces.join(", "))]
    InterfaceNotSupported {
        /// Runtime type of the stub
        stub_type: String,
        /// Interfaces the stub rejected
        interfaces: Vec<String>,
    },

    /// Dynamic invocation of a member the target does not expose
    #[error("Type '{type_name}' has no member '{member}'")]
    MissingMember {
        /// Type that was invoked
        type_name: String,
        /// Member that was requested
        member: String,
    },

    /// Argument at a position does not have the expected shape
    #[error("Argument {position} mismatch: expected {expected}")]
    ArgumentMismatch {
        /// Zero-based argument position
        position: usize,
        /// Human-readable description of the expected argument
        expected: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a missing member error
    pub fn missing_member<T: Into<String>, M: Into<String>>(type_name: T, member: M) -> Self {
        Self::MissingMember {
            type_name: type_name.into(),
            member: member.into(),
        }
    }

    /// Create an argument mismatch error
    pub fn argument_mismatch<S: Into<String>>(position: usize, expected: S) -> Self {
        Self::ArgumentMismatch {
            position,
            expected: expected.into(),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Resolution error creation methods
impl Error {
    /// Create a dependency resolution error
    pub fn dependency_resolution<S: Into<String>>(message: S) -> Self {
        Self::DependencyResolution {
            message: message.into(),
            source: None,
        }
    }

    /// Create a dependency resolution error wrapping the original cause
    pub fn dependency_resolution_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::DependencyResolution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error is the container's standard resolution failure
    pub fn is_dependency_resolution(&self) -> bool {
        matches!(self, Self::DependencyResolution { .. })
    }

    /// The domain error that caused this one, if the source is a domain error
    pub fn inner(&self) -> Option<&Error> {
        match self {
            Self::DependencyResolution {
                source: Some(source),
                ..
            }
            | Self::Configuration {
                source: Some(source),
                ..
            } => source.downcast_ref::<Error>(),
            _ => None,
        }
    }

    /// Walk wrapped domain errors down to the innermost one
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current
    }
}

// Remoting error creation methods
impl Error {
    /// Create a not-a-transparent-proxy error
    pub fn not_transparent_proxy<S: Into<String>>(type_name: S) -> Self {
        Self::NotTransparentProxy {
            type_name: type_name.into(),
        }
    }

    /// Create an interface-not-supported error for a transparent proxy
    pub fn interface_not_supported<S: Into<String>>(stub_type: S, interfaces: Vec<String>) -> Self {
        Self::InterfaceNotSupported {
            stub_type: stub_type.into(),
            interfaces,
        }
    }
}
