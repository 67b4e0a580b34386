//! In-process Remoting
//!
//! Capability queries over [`TransparentProxy`] stubs, answering for the
//! transparent-proxy interception strategy.

pub mod stub;

pub use stub::{Endpoint, TransparentProxy};

use std::sync::Arc;

use interpose_domain::ports::{CapabilityAnswer, Instance, RemotingServices};
use interpose_domain::value_objects::TypeRef;
use tracing::trace;

/// Remoting collaborator for stubs living in this process
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessRemoting;

impl InProcessRemoting {
    /// Create the collaborator
    pub fn new() -> Self {
        Self
    }
}

impl RemotingServices for InProcessRemoting {
    fn is_transparent_proxy(&self, instance: &Instance) -> bool {
        instance.downcast_ref::<TransparentProxy>().is_some()
    }

    fn can_cast_to(&self, instance: &Instance, interface: &TypeRef) -> CapabilityAnswer {
        let supported = instance
            .downcast_ref::<TransparentProxy>()
            .is_some_and(|stub| stub.supports_interface(interface));
        trace!(
            stub = %instance.runtime_type(),
            interface = %interface,
            supported,
            "Capability query"
        );
        CapabilityAnswer {
            supported,
            queried: Arc::clone(interface),
        }
    }
}
