//! Strategy backed by two caller-supplied functions.

use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, ResolverError, ResolverResult};
use crate::internal::catch_construction;
use crate::key::{AnyArc, ServiceId};
use crate::observer::Observers;
use crate::traits::ServiceResolver;

/// Single-instance resolution function.
pub type GetServiceFn = Arc<dyn Fn(&ServiceId) -> Result<Option<AnyArc>, BoxError> + Send + Sync>;

/// Multi-instance resolution function.
pub type GetServicesFn = Arc<dyn Fn(&ServiceId) -> Result<Vec<AnyArc>, BoxError> + Send + Sync>;

/// Outcome of a single-instance resolution before it is collapsed to an `Option`.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The function produced an instance
    Found(AnyArc),
    /// The function reported that nothing is registered
    NotFound,
    /// The function returned an error or panicked
    Failed(ResolverError),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// Collapses `NotFound` and `Failed` to `None`.
    pub fn into_option(self) -> Option<AnyArc> {
        match self {
            Resolution::Found(instance) => Some(instance),
            Resolution::NotFound | Resolution::Failed(_) => None,
        }
    }
}

/// Resolver that forwards to two caller-supplied functions.
///
/// The two paths treat foreign failures differently:
///
/// - [`get_service`](ServiceResolver::get_service): errors and panics from
///   `get_one` are reported to observers and turned into `None`. Bridges to
///   third-party containers commonly signal "not registered" that way.
/// - [`get_services`](ServiceResolver::get_services): errors from `get_many`
///   propagate as [`ResolverError::Resolution`]; "no registrations" is expected
///   to be an empty vector, so an error is a real fault.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{AnyArc, DelegateResolver, ServiceResolver, ServiceId};
/// use std::sync::Arc;
///
/// let resolver = DelegateResolver::new(
///     |id| {
///         if *id == ServiceId::of::<u32>() {
///             Ok(Some(Arc::new(7u32) as AnyArc))
///         } else {
///             Err("not registered".into())
///         }
///     },
///     |_id| Err("multi-registration unsupported".into()),
/// );
///
/// assert!(resolver.get_service(&ServiceId::of::<u32>()).is_some());
/// assert!(resolver.get_service(&ServiceId::of::<String>()).is_none());
/// assert!(resolver.get_services(&ServiceId::of::<u32>()).is_err());
/// ```
#[derive(Clone)]
pub struct DelegateResolver {
    get_one: GetServiceFn,
    get_many: GetServicesFn,
    observers: Observers,
    catch_panics: bool,
}

impl DelegateResolver {
    /// Wraps two resolution functions.
    pub fn new<F1, F2>(get_one: F1, get_many: F2) -> Self
    where
        F1: Fn(&ServiceId) -> Result<Option<AnyArc>, BoxError> + Send + Sync + 'static,
        F2: Fn(&ServiceId) -> Result<Vec<AnyArc>, BoxError> + Send + Sync + 'static,
    {
        Self::from_arcs(Arc::new(get_one), Arc::new(get_many))
    }

    /// Wraps two already shared resolution functions.
    pub fn from_arcs(get_one: GetServiceFn, get_many: GetServicesFn) -> Self {
        Self {
            get_one,
            get_many,
            observers: Observers::new(),
            catch_panics: true,
        }
    }

    /// Wraps two optional functions, failing if either is missing.
    pub fn try_new(
        get_one: Option<GetServiceFn>,
        get_many: Option<GetServicesFn>,
    ) -> ResolverResult<Self> {
        let get_one = get_one.ok_or(ResolverError::MissingArgument("get_service"))?;
        let get_many = get_many.ok_or(ResolverError::MissingArgument("get_services"))?;
        Ok(Self::from_arcs(get_one, get_many))
    }

    /// Reports suppressed single-instance failures to `observers`.
    pub fn with_observers(mut self, observers: Observers) -> Self {
        self.observers = observers;
        self
    }

    /// Whether panics from `get_one` are contained (default) or unwind to the caller.
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// Runs the single-instance function and keeps the failure cause.
    pub fn resolve(&self, id: &ServiceId) -> Resolution {
        let outcome = if self.catch_panics {
            match catch_construction(id.name(), || (self.get_one)(id)) {
                Ok(outcome) => outcome,
                Err(panicked) => return Resolution::Failed(panicked),
            }
        } else {
            (self.get_one)(id)
        };

        match outcome {
            Ok(Some(instance)) => Resolution::Found(instance),
            Ok(None) => Resolution::NotFound,
            Err(source) => Resolution::Failed(ResolverError::resolution(id.name(), source)),
        }
    }
}

impl fmt::Debug for DelegateResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateResolver")
            .field("observers", &self.observers)
            .field("catch_panics", &self.catch_panics)
            .finish_non_exhaustive()
    }
}

impl ServiceResolver for DelegateResolver {
    fn get_service(&self, id: &ServiceId) -> Option<AnyArc> {
        match self.resolve(id) {
            Resolution::Failed(error) => {
                self.observers.failure_suppressed(id, &error);
                None
            }
            resolution => resolution.into_option(),
        }
    }

    fn get_services(&self, id: &ServiceId) -> ResolverResult<Vec<AnyArc>> {
        (self.get_many)(id).map_err(|source| ResolverError::resolution(id.name(), source))
    }
}
