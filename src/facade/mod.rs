//! Resolution facade holding the active strategy and its cache.
//!
//! The facade owns one [`Generation`]: the active strategy paired with a
//! [`CachingResolver`] built over it. Every swap publishes a fresh pair in a
//! single atomic store, so readers see either the old pair or the new one,
//! never a strategy next to a cache of another strategy.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::caching::CachingResolver;
use crate::config::ResolverOptions;
use crate::default_resolver::DefaultResolver;
use crate::delegate::{DelegateResolver, GetServiceFn, GetServicesFn};
use crate::error::{BoxError, ResolverError, ResolverResult};
use crate::key::{AnyArc, ServiceId};
use crate::locator::{DynamicLocator, LocatorAdapter, ServiceLocator};
use crate::observer::{LoggingObserver, Observers, ResolutionObserver};
use crate::traits::{ServiceResolver, SharedResolver};

pub mod global;

/// One published `(strategy, cache)` pair.
///
/// The cache is always built from the strategy it is paired with; there is
/// no way to construct one without the other.
pub struct Generation {
    number: u64,
    resolver: SharedResolver,
    cache: Arc<CachingResolver>,
}

impl Generation {
    fn new(number: u64, resolver: SharedResolver, observers: &Observers) -> Self {
        let cache = Arc::new(CachingResolver::with_observers(
            Arc::clone(&resolver),
            observers.clone(),
        ));
        Self {
            number,
            resolver,
            cache,
        }
    }

    /// Sequence number, starting at 0 and increased by every swap.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// The active strategy of this generation.
    pub fn resolver(&self) -> &SharedResolver {
        &self.resolver
    }

    /// The cache wrapping [`resolver`](Self::resolver).
    pub fn cache(&self) -> &Arc<CachingResolver> {
        &self.cache
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generation")
            .field("number", &self.number)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Swappable service resolution facade.
///
/// Owned instances are the primary API: create one, hand it to whatever
/// needs resolution, swap its strategy at will. A process-wide instance is
/// also available through [`global()`](crate::global()) for hosts that want a
/// single ambient access point.
///
/// # Thread Safety
///
/// All methods take `&self`. Reads are lock-free. Concurrent swaps are
/// linearized: the last one to complete wins, and every swap starts a new
/// empty cache.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{AnyArc, DependencyResolver, ResolverExt, ServiceResolver, ServiceId};
/// use std::sync::Arc;
///
/// let resolver = DependencyResolver::new();
///
/// // Zero configuration: parameterless construction only
/// assert!(resolver.current().get::<String>().is_none());
///
/// resolver.use_fns(
///     |id| {
///         if *id == ServiceId::of::<String>() {
///             Ok(Some(Arc::new("from container".to_string()) as AnyArc))
///         } else {
///             Ok(None)
///         }
///     },
///     |_id| Ok(Vec::new()),
/// );
///
/// let value = resolver.current().get::<String>().unwrap();
/// assert_eq!(&*value, "from container");
///
/// // Framework code goes through the cache
/// let cached = resolver.current_cache().get::<String>().unwrap();
/// assert!(Arc::ptr_eq(&cached, &resolver.current_cache().get::<String>().unwrap()));
/// ```
pub struct DependencyResolver {
    state: ArcSwap<Generation>,
    observers: Observers,
    options: ResolverOptions,
}

impl DependencyResolver {
    /// Creates a facade with the [`DefaultResolver`] active.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder for observers, options and an initial strategy.
    pub fn builder() -> DependencyResolverBuilder {
        DependencyResolverBuilder::default()
    }

    /// The active strategy.
    ///
    /// Never fails; falls back to [`DefaultResolver`] if nothing was configured.
    #[inline]
    pub fn current(&self) -> SharedResolver {
        Arc::clone(&self.state.load().resolver)
    }

    /// The caching decorator over the active strategy.
    ///
    /// Intended for framework code that wants memoized resolution. End-user
    /// code should call [`current`](Self::current); cached instances live
    /// until the next swap, which is rarely what an application expects.
    #[inline]
    pub fn current_cache(&self) -> Arc<CachingResolver> {
        Arc::clone(&self.state.load().cache)
    }

    /// The active `(strategy, cache)` pair as one consistent snapshot.
    pub fn generation(&self) -> Arc<Generation> {
        self.state.load_full()
    }

    pub fn generation_number(&self) -> u64 {
        self.state.load().number
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Replaces the active strategy.
    ///
    /// Fails with [`ResolverError::MissingArgument`] when `resolver` is `None`,
    /// leaving the active generation untouched.
    pub fn set_resolver(&self, resolver: Option<SharedResolver>) -> ResolverResult<()> {
        let resolver = resolver.ok_or(ResolverError::MissingArgument("resolver"))?;
        self.publish(resolver);
        Ok(())
    }

    /// Replaces the active strategy with one known to be present.
    pub fn use_resolver<R: ServiceResolver + 'static>(&self, resolver: R) {
        self.publish(Arc::new(resolver));
    }

    /// Replaces the active strategy with a [`DelegateResolver`] over two functions.
    ///
    /// Fails with [`ResolverError::MissingArgument`] naming the missing function.
    pub fn set_resolver_fns(
        &self,
        get_service: Option<GetServiceFn>,
        get_services: Option<GetServicesFn>,
    ) -> ResolverResult<()> {
        let delegate = DelegateResolver::try_new(get_service, get_services)?;
        self.publish(Arc::new(self.configure_delegate(delegate)));
        Ok(())
    }

    /// Replaces the active strategy with a [`DelegateResolver`] over two closures.
    pub fn use_fns<F1, F2>(&self, get_service: F1, get_services: F2)
    where
        F1: Fn(&ServiceId) -> Result<Option<AnyArc>, BoxError> + Send + Sync + 'static,
        F2: Fn(&ServiceId) -> Result<Vec<AnyArc>, BoxError> + Send + Sync + 'static,
    {
        let delegate = DelegateResolver::new(get_service, get_services);
        self.publish(Arc::new(self.configure_delegate(delegate)));
    }

    /// Replaces the active strategy with an adapter over a typed locator.
    pub fn set_locator<L: ServiceLocator>(&self, locator: Option<Arc<L>>) -> ResolverResult<()> {
        let locator = locator.ok_or(ResolverError::MissingArgument("locator"))?;
        self.publish(Arc::new(self.configure_adapter(LocatorAdapter::new(locator))));
        Ok(())
    }

    /// Replaces the active strategy with an adapter over a runtime-described locator.
    ///
    /// Fails with [`ResolverError::MissingArgument`] when `locator` is `None`,
    /// or with [`ResolverError::ShapeMismatch`] when its methods do not have
    /// the service locator shape. Either way the active generation is untouched.
    pub fn set_dynamic_locator(&self, locator: Option<Arc<dyn DynamicLocator>>) -> ResolverResult<()> {
        let locator = locator.ok_or(ResolverError::MissingArgument("locator"))?;
        let adapter = LocatorAdapter::from_dynamic(locator)?;
        self.publish(Arc::new(self.configure_adapter(adapter)));
        Ok(())
    }

    /// Reinstalls a fresh [`DefaultResolver`].
    pub fn reset(&self) {
        self.publish(self.default_resolver());
    }

    fn default_resolver(&self) -> SharedResolver {
        Arc::new(DefaultResolver::with_observers(self.observers.clone()))
    }

    fn configure_delegate(&self, delegate: DelegateResolver) -> DelegateResolver {
        delegate
            .with_observers(self.observers.clone())
            .with_catch_panics(self.options.catch_panics)
    }

    fn configure_adapter(&self, adapter: LocatorAdapter) -> LocatorAdapter {
        adapter
            .with_observers(self.observers.clone())
            .with_catch_panics(self.options.catch_panics)
    }

    // Single atomic publish of the new pair; numbering stays monotonic under racing swaps
    fn publish(&self, resolver: SharedResolver) {
        let previous = self.state.rcu(|current| {
            Generation::new(current.number + 1, Arc::clone(&resolver), &self.observers)
        });
        self.observers.generation_swapped(previous.number + 1);
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DependencyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyResolver")
            .field("generation", &*self.state.load())
            .field("observers", &self.observers)
            .field("options", &self.options)
            .finish()
    }
}

/// Builder for [`DependencyResolver`].
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{DependencyResolver, MetricsObserver, ResolverOptions};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let resolver = DependencyResolver::builder()
///     .options(ResolverOptions::default().with_logging(true))
///     .observer(metrics.clone())
///     .build();
///
/// resolver.reset();
/// assert_eq!(metrics.swap_count(), 1);
/// assert_eq!(resolver.observers().len(), 2);
/// ```
#[derive(Default)]
pub struct DependencyResolverBuilder {
    resolver: Option<SharedResolver>,
    observers: Vec<Arc<dyn ResolutionObserver>>,
    options: ResolverOptions,
}

impl DependencyResolverBuilder {
    /// Initial strategy instead of the [`DefaultResolver`].
    pub fn resolver(mut self, resolver: SharedResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> DependencyResolver {
        let mut observers = self.observers;
        if self.options.logging {
            observers.push(Arc::new(LoggingObserver::with_prefix(self.options.log_prefix.clone())));
        }
        let observers = Observers::from_vec(observers);

        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(DefaultResolver::with_observers(observers.clone())));

        DependencyResolver {
            state: ArcSwap::from_pointee(Generation::new(0, resolver, &observers)),
            observers,
            options: self.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_pairs_cache_with_resolver() {
        let facade = DependencyResolver::new();
        let generation = facade.generation();
        assert!(Arc::ptr_eq(generation.resolver(), generation.cache().inner()));
    }

    #[test]
    fn rejected_swap_keeps_generation() {
        let facade = DependencyResolver::new();
        assert!(facade.set_resolver(None).is_err());
        assert!(facade.set_dynamic_locator(None).is_err());
        assert_eq!(facade.generation_number(), 0);
    }

    #[test]
    fn reset_bumps_generation() {
        let facade = DependencyResolver::new();
        facade.reset();
        facade.reset();
        assert_eq!(facade.generation_number(), 2);
    }
}
