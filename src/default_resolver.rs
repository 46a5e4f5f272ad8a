//! Zero-configuration fallback strategy.

use crate::error::ResolverResult;
use crate::internal::catch_construction;
use crate::key::{AnyArc, ServiceId};
use crate::observer::Observers;
use crate::traits::ServiceResolver;

/// Resolver that constructs services through their parameterless constructor.
///
/// This is the strategy active before anything else is configured. It never
/// reports an error:
///
/// - interface and abstract identifiers resolve to `None` without any
///   construction attempt;
/// - a concrete identifier without an activator resolves to `None`;
/// - an activator that panics resolves to `None` (the cause goes to the
///   observers, not to the caller).
///
/// Multi-resolution has no meaning here and always yields an empty vector.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{DefaultResolver, ServiceResolver, ServiceId};
///
/// #[derive(Default)]
/// struct Settings;
/// trait Repository {}
///
/// let resolver = DefaultResolver::new();
/// assert!(resolver.get_service(&ServiceId::constructible::<Settings>()).is_some());
/// assert!(resolver.get_service(&ServiceId::interface::<dyn Repository>()).is_none());
/// assert!(resolver.get_services(&ServiceId::constructible::<Settings>()).unwrap().is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct DefaultResolver {
    observers: Observers,
}

impl DefaultResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports swallowed construction failures to `observers`.
    pub fn with_observers(observers: Observers) -> Self {
        Self { observers }
    }
}

impl ServiceResolver for DefaultResolver {
    fn get_service(&self, id: &ServiceId) -> Option<AnyArc> {
        // Never instantiable; skip the doomed construction attempt
        if id.is_interface() || id.is_abstract() {
            return None;
        }

        let activator = id.activator()?;
        match catch_construction(id.name(), || activator()) {
            Ok(instance) => Some(instance),
            Err(error) => {
                self.observers.failure_suppressed(id, &error);
                None
            }
        }
    }

    fn get_services(&self, _id: &ServiceId) -> ResolverResult<Vec<AnyArc>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{MetricsObserver, ResolutionObserver};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    #[test]
    fn abstract_identifier_skips_activator() {
        // Same TypeId as a constructible identifier, but flagged abstract
        let id = ServiceId::abstract_of::<Counted>();
        let before = CONSTRUCTED.load(Ordering::SeqCst);
        assert!(DefaultResolver::new().get_service(&id).is_none());
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), before);

        let constructible = ServiceId::with_activator(|| {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Counted
        });
        assert!(DefaultResolver::new().get_service(&constructible).is_some());
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn panicking_activator_is_reported() {
        let metrics = Arc::new(MetricsObserver::new());
        let resolver = DefaultResolver::with_observers(Observers::from_vec(vec![
            metrics.clone() as Arc<dyn ResolutionObserver>,
        ]));

        let id = ServiceId::with_activator::<Counted, _>(|| panic!("no database"));
        assert!(resolver.get_service(&id).is_none());
        assert_eq!(metrics.suppressed_count(), 1);
    }
}
