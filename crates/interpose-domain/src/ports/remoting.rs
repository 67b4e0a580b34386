//! Remoting Capability Port
//!
//! Answers the two questions transparent-proxy interception needs about an
//! instance: is it a remote-call stub, and can the stub be used as a given
//! interface. Answers are definite and name the queried type.

use crate::ports::component::Instance;
use crate::value_objects::TypeRef;

/// Answer to a capability query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityAnswer {
    /// Whether the stub supports the queried interface
    pub supported: bool,
    /// The interface that was asked about
    pub queried: TypeRef,
}

/// Capability queries supplied by the remoting collaborator
pub trait RemotingServices: Send + Sync {
    /// Whether `instance` is a remote-call stub rather than a local object
    fn is_transparent_proxy(&self, instance: &Instance) -> bool;

    /// Whether the stub behind `instance` can be used as `interface`
    fn can_cast_to(&self, instance: &Instance, interface: &TypeRef) -> CapabilityAnswer;
}
