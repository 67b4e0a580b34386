//! In-memory stand-ins for the container, proxy generator and remoting
//! collaborators.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use interpose_domain::ports::{
    ActivationMiddleware, CapabilityAnswer, Component, ComponentRegistrationView,
    ConfigurationAction, Instance, Interceptor, Invocation, Metadata, PreparingHandler,
    ProxyGenerationOptions, ProxyGenerator, RegistrationConfigurator, RemotingServices,
    ResolveContext, ScanningConfigurator, unknown_member,
};
use interpose_domain::value_objects::{Parameter, ServiceRef, TypeInfo, TypeRef};
use interpose_domain::{Error, Result, Value};

/// Component with a runtime type and no members
pub struct Plain(pub TypeRef);

impl Plain {
    pub fn instance(runtime_type: &TypeRef) -> Instance {
        Arc::new(Self(Arc::clone(runtime_type)))
    }
}

impl Component for Plain {
    fn runtime_type(&self) -> TypeRef {
        Arc::clone(&self.0)
    }

    fn invoke(&self, method: &str, _arguments: &[Value]) -> Result<Value> {
        unknown_member(&self.0, method)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Interceptor that always proceeds
pub struct Noop;

impl Interceptor for Noop {
    fn name(&self) -> &str {
        "noop"
    }

    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        invocation.proceed()
    }
}

/// Registration under construction
pub struct FakeRegistration {
    pub services: Vec<ServiceRef>,
    pub metadata: Metadata,
    pub implementation: Option<TypeRef>,
    pub preparing: Vec<PreparingHandler>,
    pub middleware: Vec<Arc<dyn ActivationMiddleware>>,
}

impl FakeRegistration {
    pub fn for_type(implementation_type: &TypeRef) -> Self {
        Self {
            services: vec![ServiceRef::typed(implementation_type)],
            metadata: Metadata::new(),
            implementation: Some(Arc::clone(implementation_type)),
            preparing: Vec::new(),
            middleware: Vec::new(),
        }
    }

    pub fn for_factory(limit_type: &TypeRef) -> Self {
        Self {
            implementation: None,
            ..Self::for_type(limit_type)
        }
    }

    pub fn exposing(mut self, services: Vec<ServiceRef>) -> Self {
        self.services = services;
        self
    }
}

impl fmt::Display for FakeRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let services: Vec<String> = self.services.iter().map(ToString::to_string).collect();
        write!(f, "FakeRegistration [{}]", services.join(", "))
    }
}

impl RegistrationConfigurator for FakeRegistration {
    fn describe(&self) -> String {
        self.to_string()
    }

    fn services(&self) -> &[ServiceRef] {
        &self.services
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    fn implementation_type(&self) -> Option<&TypeRef> {
        self.implementation.as_ref()
    }

    fn set_implementation_type(&mut self, implementation_type: TypeRef) -> Result<()> {
        match self.implementation {
            Some(_) => {
                self.implementation = Some(implementation_type);
                Ok(())
            }
            None => Err(Error::configuration("factory registrations have no type")),
        }
    }

    fn on_preparing(&mut self, handler: PreparingHandler) {
        self.preparing.push(handler);
    }

    fn use_activation_middleware(&mut self, middleware: Arc<dyn ActivationMiddleware>) {
        self.middleware.push(middleware);
    }
}

impl ComponentRegistrationView for FakeRegistration {
    fn services(&self) -> &[ServiceRef] {
        &self.services
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn implementation_type(&self) -> Option<&TypeRef> {
        self.implementation.as_ref()
    }
}

/// Scan collecting deferred configuration actions
#[derive(Default)]
pub struct FakeScan {
    pub actions: Vec<ConfigurationAction>,
}

impl FakeScan {
    /// Run every collected action against `registration`
    pub fn apply_to(&self, scanned: &TypeRef, registration: &mut FakeRegistration) -> Result<()> {
        for action in &self.actions {
            action(scanned, registration)?;
        }
        Ok(())
    }
}

impl ScanningConfigurator for FakeScan {
    fn describe(&self) -> String {
        "fake scan".to_string()
    }

    fn add_configuration_action(&mut self, action: ConfigurationAction) {
        self.actions.push(action);
    }
}

/// Resolve context backed by a fixed service map
#[derive(Default)]
pub struct FakeContext {
    services: HashMap<ServiceRef, Instance>,
}

impl FakeContext {
    pub fn with(mut self, service: ServiceRef, instance: Instance) -> Self {
        self.services.insert(service, instance);
        self
    }
}

impl ResolveContext for FakeContext {
    fn resolve_service(&self, service: &ServiceRef) -> Result<Instance> {
        self.services
            .get(service)
            .cloned()
            .ok_or_else(|| Error::dependency_resolution(format!("{service} is not registered")))
    }

    fn resolve_service_with(
        &self,
        service: &ServiceRef,
        _parameters: Vec<Parameter>,
    ) -> Result<Instance> {
        self.resolve_service(service)
    }

    fn is_registered(&self, service: &ServiceRef) -> bool {
        self.services.contains_key(service)
    }
}

/// Delegating proxy produced by [`FakeGenerator`]
pub struct FakeProxy {
    pub proxy_type: TypeRef,
    pub target: Instance,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Component for FakeProxy {
    fn runtime_type(&self) -> TypeRef {
        Arc::clone(&self.proxy_type)
    }

    fn invoke(&self, method: &str, arguments: &[Value]) -> Result<Value> {
        self.target.invoke(method, arguments)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Proxy generator recording every request
#[derive(Default)]
pub struct FakeGenerator {
    calls: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn wrap(
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Instance {
        let mut builder = TypeInfo::class(format!("{}Proxy", interface.name())).implements(interface);
        for additional in additional_interfaces {
            builder = builder.implements(additional);
        }
        Arc::new(FakeProxy {
            proxy_type: builder.build(),
            target,
            interceptors,
        })
    }
}

impl ProxyGenerator for FakeGenerator {
    fn create_class_proxy_type(
        &self,
        base: &TypeRef,
        additional_interfaces: &[TypeRef],
        _options: &ProxyGenerationOptions,
    ) -> Result<TypeRef> {
        self.record(format!("class:{base}"));
        let mut builder = TypeInfo::class(format!("{}Proxy", base.name())).base(base);
        for interface in base.interfaces().iter().chain(additional_interfaces) {
            builder = builder.implements(interface);
        }
        Ok(builder.build())
    }

    fn create_interface_proxy_with_target(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        _options: Option<&ProxyGenerationOptions>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Instance> {
        self.record(format!("interface:{interface}"));
        Ok(Self::wrap(interface, additional_interfaces, target, interceptors))
    }

    fn create_interface_proxy_with_target_interface(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        _options: Option<&ProxyGenerationOptions>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Instance> {
        self.record(format!("transparent:{interface}"));
        Ok(Self::wrap(interface, additional_interfaces, target, interceptors))
    }
}

/// Remote-call stub presenting an interface
pub struct FakeStub {
    pub presented: TypeRef,
    pub supported: Vec<TypeRef>,
}

impl FakeStub {
    pub fn instance(presented: &TypeRef, supported: &[TypeRef]) -> Instance {
        Arc::new(Self {
            presented: Arc::clone(presented),
            supported: supported.to_vec(),
        })
    }
}

impl Component for FakeStub {
    fn runtime_type(&self) -> TypeRef {
        Arc::clone(&self.presented)
    }

    fn invoke(&self, method: &str, _arguments: &[Value]) -> Result<Value> {
        unknown_member(&self.presented, method)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Remoting collaborator recognising [`FakeStub`]s
pub struct FakeRemoting;

impl RemotingServices for FakeRemoting {
    fn is_transparent_proxy(&self, instance: &Instance) -> bool {
        instance.downcast_ref::<FakeStub>().is_some()
    }

    fn can_cast_to(&self, instance: &Instance, interface: &TypeRef) -> CapabilityAnswer {
        let supported = instance
            .downcast_ref::<FakeStub>()
            .is_some_and(|stub| stub.supported.contains(interface));
        CapabilityAnswer {
            supported,
            queried: Arc::clone(interface),
        }
    }
}
