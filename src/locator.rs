//! Adapters for externally supplied service locators.
//!
//! Two entry points exist. [`ServiceLocator`] is the statically checked one:
//! any container that implements the trait can be adapted. [`DynamicLocator`]
//! is the runtime fallback for foreign containers that can only describe
//! their methods at run time (scripting bridges, plugin hosts); their shape is
//! checked when the adapter is built.
//!
//! Either way the adapter binds the two lookup methods as closures and hands
//! them to a [`DelegateResolver`], which owns dispatch and failure handling.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::delegate::{DelegateResolver, GetServiceFn, GetServicesFn};
use crate::error::{BoxError, ResolverError, ResolverResult};
use crate::key::{AnyArc, ServiceId};
use crate::observer::Observers;
use crate::traits::ServiceResolver;

/// Name of the single-instance lookup method.
pub const GET_INSTANCE: &str = "get_instance";

/// Name of the multi-instance lookup method.
pub const GET_ALL_INSTANCES: &str = "get_all_instances";

const GET_INSTANCE_SHAPE: &str = "get_instance(&ServiceId) -> Option<AnyArc>";
const GET_ALL_INSTANCES_SHAPE: &str = "get_all_instances(&ServiceId) -> Vec<AnyArc>";

/// Common shape of third-party service locators.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{AnyArc, BoxError, LocatorAdapter, ServiceLocator, ServiceResolver, ServiceId};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// struct MapContainer {
///     services: HashMap<ServiceId, AnyArc>,
/// }
///
/// impl ServiceLocator for MapContainer {
///     fn get_instance(&self, id: &ServiceId) -> Result<Option<AnyArc>, BoxError> {
///         Ok(self.services.get(id).cloned())
///     }
///
///     fn get_all_instances(&self, id: &ServiceId) -> Result<Vec<AnyArc>, BoxError> {
///         Ok(self.services.get(id).cloned().into_iter().collect())
///     }
/// }
///
/// let mut services = HashMap::new();
/// services.insert(ServiceId::of::<u16>(), Arc::new(8080u16) as AnyArc);
///
/// let adapter = LocatorAdapter::new(Arc::new(MapContainer { services }));
/// assert!(adapter.get_service(&ServiceId::of::<u16>()).is_some());
/// assert_eq!(adapter.get_services(&ServiceId::of::<u16>()).unwrap().len(), 1);
/// ```
pub trait ServiceLocator: Send + Sync + 'static {
    /// Looks up a single instance. An error means "not found" to the resolver.
    fn get_instance(&self, id: &ServiceId) -> Result<Option<AnyArc>, BoxError>;

    /// Looks up all instances. An error is propagated to the caller.
    fn get_all_instances(&self, id: &ServiceId) -> Result<Vec<AnyArc>, BoxError>;
}

/// A method exposed by a [`DynamicLocator`], classified by its shape.
#[derive(Clone)]
pub enum LocatorMethod {
    /// `(&ServiceId) -> Option<AnyArc>`
    Instance(GetServiceFn),
    /// `(&ServiceId) -> Vec<AnyArc>`
    AllInstances(GetServicesFn),
    /// Any other signature
    Other {
        /// Human-readable signature, used in diagnostics
        signature: String,
    },
}

impl fmt::Debug for LocatorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorMethod::Instance(_) => f.write_str("Instance"),
            LocatorMethod::AllInstances(_) => f.write_str("AllInstances"),
            LocatorMethod::Other { signature } => {
                f.debug_struct("Other").field("signature", signature).finish()
            }
        }
    }
}

/// Locator whose methods are discovered at run time.
pub trait DynamicLocator: Send + Sync {
    /// Type name reported in adaptation errors.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Looks up a method by name.
    fn method(&self, name: &str) -> Option<LocatorMethod>;
}

/// Table-driven [`DynamicLocator`].
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{LocatorAdapter, LocatorMethod, MethodTable, ResolverError, ServiceId};
/// use std::sync::Arc;
///
/// let table = MethodTable::new("acme::Container")
///     .with_method("get_instance", LocatorMethod::Instance(Arc::new(|_: &ServiceId| Ok(None))));
///
/// match LocatorAdapter::from_dynamic(Arc::new(table)) {
///     Err(ResolverError::ShapeMismatch { type_name, .. }) => assert_eq!(type_name, "acme::Container"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct MethodTable {
    type_name: String,
    methods: HashMap<String, LocatorMethod>,
}

impl MethodTable {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: HashMap::new(),
        }
    }

    pub fn with_method(mut self, name: impl Into<String>, method: LocatorMethod) -> Self {
        self.methods.insert(name.into(), method);
        self
    }
}

impl DynamicLocator for MethodTable {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn method(&self, name: &str) -> Option<LocatorMethod> {
        self.methods.get(name).cloned()
    }
}

/// Resolver that forwards to an external locator.
#[derive(Clone)]
pub struct LocatorAdapter {
    type_name: String,
    delegate: DelegateResolver,
}

impl LocatorAdapter {
    /// Adapts a statically typed locator.
    pub fn new<L: ServiceLocator>(locator: Arc<L>) -> Self {
        let one = Arc::clone(&locator);
        let many = locator;
        let get_one: GetServiceFn = Arc::new(move |id: &ServiceId| one.get_instance(id));
        let get_many: GetServicesFn = Arc::new(move |id: &ServiceId| many.get_all_instances(id));

        Self {
            type_name: std::any::type_name::<L>().to_string(),
            delegate: DelegateResolver::from_arcs(get_one, get_many),
        }
    }

    /// Adapts a locator after checking its method shapes.
    ///
    /// Fails with [`ResolverError::ShapeMismatch`] naming the locator's type if
    /// `get_instance` or `get_all_instances` is missing or has the wrong shape.
    pub fn from_dynamic(locator: Arc<dyn DynamicLocator>) -> ResolverResult<Self> {
        let type_name = locator.type_name().to_string();
        let mismatch = |expected| ResolverError::ShapeMismatch {
            type_name: type_name.clone(),
            expected,
        };

        let get_one = match locator.method(GET_INSTANCE) {
            Some(LocatorMethod::Instance(f)) => f,
            _ => return Err(mismatch(GET_INSTANCE_SHAPE)),
        };
        let get_many = match locator.method(GET_ALL_INSTANCES) {
            Some(LocatorMethod::AllInstances(f)) => f,
            _ => return Err(mismatch(GET_ALL_INSTANCES_SHAPE)),
        };

        Ok(Self {
            type_name,
            delegate: DelegateResolver::from_arcs(get_one, get_many),
        })
    }

    /// Reports suppressed single-instance failures to `observers`.
    pub fn with_observers(mut self, observers: Observers) -> Self {
        self.delegate = self.delegate.with_observers(observers);
        self
    }

    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.delegate = self.delegate.with_catch_panics(catch_panics);
        self
    }

    /// Type name of the adapted locator.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Debug for LocatorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatorAdapter")
            .field("type_name", &self.type_name)
            .field("delegate", &self.delegate)
            .finish()
    }
}

impl ServiceResolver for LocatorAdapter {
    #[inline]
    fn get_service(&self, id: &ServiceId) -> Option<AnyArc> {
        self.delegate.get_service(id)
    }

    #[inline]
    fn get_services(&self, id: &ServiceId) -> ResolverResult<Vec<AnyArc>> {
        self.delegate.get_services(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedOnly;

    impl DynamicLocator for NamedOnly {
        fn method(&self, _name: &str) -> Option<LocatorMethod> {
            None
        }
    }

    #[test]
    fn default_type_name_is_concrete() {
        let locator: Arc<dyn DynamicLocator> = Arc::new(NamedOnly);
        assert!(locator.type_name().ends_with("NamedOnly"));
    }

    #[test]
    fn wrong_return_shape_is_rejected() {
        let table = MethodTable::new("acme::Legacy")
            .with_method(GET_INSTANCE, LocatorMethod::Instance(Arc::new(|_: &ServiceId| Ok(None))))
            .with_method(
                GET_ALL_INSTANCES,
                LocatorMethod::Other {
                    signature: "get_all_instances(&ServiceId) -> AnyArc".to_string(),
                },
            );

        match LocatorAdapter::from_dynamic(Arc::new(table)) {
            Err(ResolverError::ShapeMismatch { type_name, expected }) => {
                assert_eq!(type_name, "acme::Legacy");
                assert_eq!(expected, GET_ALL_INSTANCES_SHAPE);
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn swapped_methods_are_rejected() {
        let table = MethodTable::new("acme::Swapped")
            .with_method(GET_INSTANCE, LocatorMethod::AllInstances(Arc::new(|_: &ServiceId| Ok(Vec::new()))))
            .with_method(GET_ALL_INSTANCES, LocatorMethod::Instance(Arc::new(|_: &ServiceId| Ok(None))));

        match LocatorAdapter::from_dynamic(Arc::new(table)) {
            Err(ResolverError::ShapeMismatch { expected, .. }) => {
                assert_eq!(expected, GET_INSTANCE_SHAPE);
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
