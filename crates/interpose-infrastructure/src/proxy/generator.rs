//! Dynamic Proxy Generator
//!
//! Describes proxy types at runtime instead of emitting code. A class proxy
//! type is a subclass descriptor whose constructors take the mixins, the
//! interceptor list and the selector ahead of the base constructor's own
//! parameters. An interface proxy type is a class implementing the proxied
//! interfaces with no constructors; its instances are built here, around a
//! caller-supplied target.
//!
//! Generated types are cached per base type, interface set and option
//! identity, so asking twice for the same proxy yields the same type.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use interpose_domain::error::{Error, Result};
use interpose_domain::ports::{
    Instance, Interceptor, ProxyGenerationHook, ProxyGenerationOptions, ProxyGenerator,
};
use interpose_domain::value_objects::{
    Arguments, ConstructorInfo, MethodInfo, ParameterInfo, TypeBuilder, TypeInfo, TypeRef,
};
use once_cell::sync::OnceCell;
use tracing::{debug, trace, warn};

use super::dispatch::ProxyDispatch;
use super::instances::{ClassProxy, InterfaceProxy};
use crate::config::ProxyConfig;
use crate::constants::PROXY_TYPE_SUFFIX;

/// Identity of a generated proxy type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProxyTypeKey {
    base: String,
    interfaces: Vec<String>,
    mixins: Vec<String>,
    selector: bool,
    hook: Option<HookIdentity>,
}

/// Hook compared by allocation
///
/// The weak reference keeps the allocation alive for as long as the key is
/// cached, so a later hook can never reuse the address.
#[derive(Debug, Clone)]
struct HookIdentity(Weak<dyn ProxyGenerationHook>);

impl HookIdentity {
    fn of(hook: &Arc<dyn ProxyGenerationHook>) -> Self {
        Self(Arc::downgrade(hook))
    }
}

impl PartialEq for HookIdentity {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(self.0.as_ptr(), other.0.as_ptr())
    }
}

impl Eq for HookIdentity {}

impl Hash for HookIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_ptr().cast::<()>().hash(state);
    }
}

impl ProxyTypeKey {
    fn new(base: &TypeRef, interfaces: &[TypeRef], options: Option<&ProxyGenerationOptions>) -> Self {
        let mut interfaces: Vec<String> = interfaces.iter().map(|i| i.name().to_string()).collect();
        interfaces.sort();
        interfaces.dedup();
        Self {
            base: base.name().to_string(),
            interfaces,
            mixins: options
                .map(|o| {
                    o.mixins()
                        .iter()
                        .map(|m| m.runtime_type().name().to_string())
                        .collect()
                })
                .unwrap_or_default(),
            selector: options.is_some_and(|o| o.selector().is_some()),
            hook: options.and_then(|o| o.hook()).map(HookIdentity::of),
        }
    }
}

/// Proxy generator backed by type descriptors
pub struct DynamicProxyGenerator {
    config: ProxyConfig,
    class_types: DashMap<ProxyTypeKey, TypeRef>,
    interface_types: DashMap<ProxyTypeKey, TypeRef>,
    names: DashMap<String, usize>,
}

impl Default for DynamicProxyGenerator {
    fn default() -> Self {
        Self::new(ProxyConfig::default())
    }
}

impl DynamicProxyGenerator {
    /// Create a generator with the given settings
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config,
            class_types: DashMap::new(),
            interface_types: DashMap::new(),
            names: DashMap::new(),
        }
    }

    /// Generator settings
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Number of cached proxy types
    pub fn cached_types(&self) -> usize {
        self.class_types.len() + self.interface_types.len()
    }

    fn type_name(&self, proxied: &TypeRef) -> String {
        let mut count = self.names.entry(proxied.name().to_string()).or_insert(0);
        let seen = *count;
        *count += 1;
        let stem = format!(
            "{}.{}{}",
            self.config.type_name_prefix,
            proxied.name(),
            PROXY_TYPE_SUFFIX
        );
        if seen == 0 {
            stem
        } else {
            format!("{stem}_{seen}")
        }
    }

    fn require_interface(&self, candidate: &TypeRef) -> Result<()> {
        if !candidate.is_interface() {
            return Err(Error::invalid_argument(format!(
                "Type '{candidate}' is not an interface"
            )));
        }
        if !self.is_accessible(candidate) {
            return Err(Error::invalid_argument(format!(
                "Interface '{candidate}' is not accessible to generated proxies"
            )));
        }
        Ok(())
    }

    fn require_interfaces(&self, candidates: &[TypeRef]) -> Result<()> {
        candidates.iter().try_for_each(|c| self.require_interface(c))
    }

    fn cached_or_insert<F>(
        &self,
        cache: &DashMap<ProxyTypeKey, TypeRef>,
        key: ProxyTypeKey,
        generate: F,
    ) -> Result<TypeRef>
    where
        F: FnOnce() -> Result<TypeRef>,
    {
        if !self.config.cache_generated_types {
            return generate();
        }
        if let Some(existing) = cache.get(&key) {
            trace!(proxy_type = %existing.value(), "Reusing generated proxy type");
            return Ok(Arc::clone(existing.value()));
        }
        let generated = generate()?;
        Ok(Arc::clone(cache.entry(key).or_insert(generated).value()))
    }

    fn generate_class_proxy(
        &self,
        base: &TypeRef,
        additional_interfaces: &[TypeRef],
        options: &ProxyGenerationOptions,
    ) -> TypeRef {
        let name = self.type_name(base);
        let mut builder = TypeInfo::class(&name).base(base);
        for interface in base.interfaces().iter().chain(additional_interfaces) {
            builder = builder.implements(interface);
        }
        builder = with_mixin_interfaces(builder, options);
        for method in base.methods() {
            builder = builder.with_method(method.clone());
        }
        builder = with_interface_methods(builder, additional_interfaces);

        for method in base.methods().iter().filter(|m| !m.is_virtual) {
            warn!(
                base_type = %base,
                member = %method.name,
                "Member cannot be overridden by the class proxy and will not be intercepted"
            );
            if let Some(hook) = options.hook() {
                hook.non_proxyable_member_notification(base, method);
            }
        }
        if let Some(hook) = options.hook() {
            hook.methods_inspected();
        }

        let slot: Arc<OnceCell<Weak<TypeInfo>>> = Arc::new(OnceCell::new());
        for constructor in base.constructors() {
            builder = builder.constructor(proxy_constructor(base, constructor, options, &slot));
        }
        let proxy_type = builder.build();
        let _ = slot.set(Arc::downgrade(&proxy_type));

        debug!(
            proxy_type = %proxy_type,
            base_type = %base,
            constructors = proxy_type.constructors().len(),
            "Generated class proxy type"
        );
        proxy_type
    }

    fn generate_interface_proxy(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        options: Option<&ProxyGenerationOptions>,
    ) -> TypeRef {
        let name = self.type_name(interface);
        let mut builder = TypeInfo::class(&name);
        for implemented in std::iter::once(interface).chain(additional_interfaces) {
            builder = builder.implements(implemented);
        }
        if let Some(options) = options {
            builder = with_mixin_interfaces(builder, options);
        }
        builder = with_interface_methods(builder, std::slice::from_ref(interface));
        builder = with_interface_methods(builder, additional_interfaces);
        let proxy_type = builder.build();
        debug!(
            proxy_type = %proxy_type,
            interface = %interface,
            "Generated interface proxy type"
        );
        proxy_type
    }

    fn interface_proxy(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        options: Option<&ProxyGenerationOptions>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Instance> {
        ensure_distinct_mixin_members(
            interface,
            interface_methods(std::slice::from_ref(interface))
                .chain(interface_methods(additional_interfaces)),
            options,
        )?;
        let key = ProxyTypeKey::new(interface, additional_interfaces, options);
        let proxy_type = self.cached_or_insert(&self.interface_types, key, || {
            Ok(self.generate_interface_proxy(interface, additional_interfaces, options))
        })?;
        let dispatch = ProxyDispatch {
            proxy_type,
            target_type: Arc::clone(interface),
            mixins: options.map(|o| o.mixins().to_vec()).unwrap_or_default(),
            interceptors,
            selector: options.and_then(|o| o.selector().cloned()),
            hook: options.and_then(|o| o.hook().cloned()),
        };
        Ok(Arc::new(InterfaceProxy::new(target, dispatch)))
    }
}

fn interface_methods(interfaces: &[TypeRef]) -> impl Iterator<Item = &MethodInfo> {
    interfaces.iter().flat_map(|interface| interface.methods())
}

/// Reject mixins whose interface members share a name with a member of the
/// proxied type or of an earlier mixin
///
/// Calls are routed by member name, so a shared name would make one of the
/// two members unreachable.
fn ensure_distinct_mixin_members<'m>(
    proxied: &TypeRef,
    own_members: impl Iterator<Item = &'m MethodInfo>,
    options: Option<&ProxyGenerationOptions>,
) -> Result<()> {
    let Some(options) = options else {
        return Ok(());
    };
    if options.mixins().is_empty() {
        return Ok(());
    }

    let mut owners: HashMap<String, String> = own_members
        .map(|method| (method.name.clone(), proxied.name().to_string()))
        .collect();
    for mixin in options.mixins() {
        let mixin_type = mixin.runtime_type();
        let members: Vec<&MethodInfo> = interface_methods(mixin_type.interfaces()).collect();
        if let Some((member, owner)) = members
            .iter()
            .find_map(|method| owners.get(&method.name).map(|owner| (&method.name, owner)))
        {
            return Err(Error::invalid_argument(format!(
                "Mixin '{mixin_type}' member '{member}' collides with a member of '{owner}'"
            )));
        }
        for method in members {
            owners.insert(method.name.clone(), mixin_type.name().to_string());
        }
    }
    Ok(())
}

fn with_mixin_interfaces(mut builder: TypeBuilder, options: &ProxyGenerationOptions) -> TypeBuilder {
    for mixin in options.mixins() {
        let mixin_type = mixin.runtime_type();
        for interface in mixin_type.interfaces() {
            builder = builder.implements(interface);
        }
        builder = with_interface_methods(builder, mixin_type.interfaces());
    }
    builder
}

fn with_interface_methods(mut builder: TypeBuilder, interfaces: &[TypeRef]) -> TypeBuilder {
    for interface in interfaces {
        for method in interface.methods() {
            builder = builder.with_method(method.clone());
        }
    }
    builder
}

/// Constructor of the proxy type wrapping `constructor` of `base`
fn proxy_constructor(
    base: &TypeRef,
    constructor: &ConstructorInfo,
    options: &ProxyGenerationOptions,
    proxy_type: &Arc<OnceCell<Weak<TypeInfo>>>,
) -> ConstructorInfo {
    let mut parameters: Vec<ParameterInfo> = options
        .mixins()
        .iter()
        .enumerate()
        .map(|(i, mixin)| ParameterInfo::mixin(format!("__mixin{i}"), &mixin.runtime_type()))
        .collect();
    parameters.push(ParameterInfo::interceptors("__interceptors"));
    if options.selector().is_some() {
        parameters.push(ParameterInfo::selector("__selector"));
    }
    let prefix = parameters.len();
    let mixin_count = options.mixins().len();
    let has_selector = options.selector().is_some();
    parameters.extend(constructor.parameters().iter().cloned());

    let base = Arc::clone(base);
    let base_constructor = constructor.clone();
    let proxy_type = Arc::clone(proxy_type);
    let hook = options.hook().cloned();
    ConstructorInfo::new(parameters, move |arguments: Arguments| {
        let proxy_type = proxy_type
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::internal(format!("Proxy type for '{base}' is no longer alive")))?;
        let (proxy_arguments, base_arguments) = arguments.split_at(prefix);

        let mixins = (0..mixin_count)
            .map(|i| proxy_arguments.instance(i))
            .collect::<Result<Vec<_>>>()?;
        let interceptors = proxy_arguments.interceptors(mixin_count)?;
        let selector = if has_selector {
            Some(proxy_arguments.selector(mixin_count + 1)?)
        } else {
            None
        };

        let target = base_constructor.invoke(base_arguments)?;
        let dispatch = ProxyDispatch {
            proxy_type,
            target_type: Arc::clone(&base),
            mixins,
            interceptors,
            selector,
            hook: hook.clone(),
        };
        Ok(Arc::new(ClassProxy::new(target, dispatch)) as Instance)
    })
}

impl ProxyGenerator for DynamicProxyGenerator {
    fn create_class_proxy_type(
        &self,
        base: &TypeRef,
        additional_interfaces: &[TypeRef],
        options: &ProxyGenerationOptions,
    ) -> Result<TypeRef> {
        if !base.is_class() {
            return Err(Error::invalid_argument(format!(
                "Type '{base}' is not a class and cannot be subclassed"
            )));
        }
        if !self.is_accessible(base) {
            return Err(Error::invalid_argument(format!(
                "Type '{base}' is not accessible to generated proxies"
            )));
        }
        self.require_interfaces(additional_interfaces)?;
        ensure_distinct_mixin_members(
            base,
            base.methods().iter().chain(interface_methods(additional_interfaces)),
            Some(options),
        )?;

        let key = ProxyTypeKey::new(base, additional_interfaces, Some(options));
        self.cached_or_insert(&self.class_types, key, || {
            Ok(self.generate_class_proxy(base, additional_interfaces, options))
        })
    }

    fn create_interface_proxy_with_target(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        options: Option<&ProxyGenerationOptions>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Instance> {
        self.require_interface(interface)?;
        self.require_interfaces(additional_interfaces)?;
        if !target.supports(interface) {
            return Err(Error::invalid_argument(format!(
                "Target of type '{}' does not implement '{interface}'",
                target.runtime_type()
            )));
        }
        self.interface_proxy(interface, additional_interfaces, target, options, interceptors)
    }

    fn create_interface_proxy_with_target_interface(
        &self,
        interface: &TypeRef,
        additional_interfaces: &[TypeRef],
        target: Instance,
        options: Option<&ProxyGenerationOptions>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Instance> {
        self.require_interface(interface)?;
        self.require_interfaces(additional_interfaces)?;
        self.interface_proxy(interface, additional_interfaces, target, options, interceptors)
    }
}
