//! Diagnostic observers for resolution traceability.
//!
//! Resolution failures on the single-instance path are contained and turned
//! into "not found". Observers are where those contained causes stay
//! diagnosable, together with strategy swaps and cache population events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::ResolverError;
use crate::key::ServiceId;

/// Which store of a [`CachingResolver`](crate::CachingResolver) an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStore {
    /// Single-instance results
    Single,
    /// Multi-instance results
    Multi,
}

/// Observer trait for resolution events.
///
/// Observer calls are made synchronously on the resolving thread and never
/// while a cache shard lock is held. Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{DependencyResolver, ResolutionObserver, ResolverError, ServiceId};
/// use std::sync::Arc;
///
/// struct PrintObserver;
///
/// impl ResolutionObserver for PrintObserver {
///     fn failure_suppressed(&self, id: &ServiceId, error: &ResolverError) {
///         println!("suppressed {}: {}", id, error);
///     }
///
///     fn generation_swapped(&self, generation: u64) {
///         println!("now on generation {}", generation);
///     }
/// }
///
/// let resolver = DependencyResolver::builder()
///     .observer(Arc::new(PrintObserver))
///     .build();
/// # let _ = resolver;
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called when a single-instance resolution failed and was reported as "not found".
    ///
    /// # Arguments
    ///
    /// * `id` - The service being resolved
    /// * `error` - The contained cause (foreign error or caught panic)
    fn failure_suppressed(&self, id: &ServiceId, error: &ResolverError);

    /// Called after a new strategy generation has been published.
    fn generation_swapped(&self, _generation: u64) {}

    /// Called after a cache miss stored (or lost the race to store) a value.
    ///
    /// `raced` is true when another thread stored its value first and this
    /// caller's own computation was discarded.
    fn cache_populated(&self, _id: &ServiceId, _store: CacheStore, _raced: bool) {}
}

/// Container for registered observers.
///
/// Cheap to clone; designed to have minimal overhead when no observers are
/// registered.
#[derive(Clone)]
pub struct Observers {
    observers: Arc<[Arc<dyn ResolutionObserver>]>,
}

impl Observers {
    /// Creates an empty observer collection.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates a collection from a list of observers.
    pub fn from_vec(observers: Vec<Arc<dyn ResolutionObserver>>) -> Self {
        Self {
            observers: observers.into(),
        }
    }

    /// Returns true if any observers are registered.
    #[inline]
    pub fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn failure_suppressed(&self, id: &ServiceId, error: &ResolverError) {
        for observer in self.observers.iter() {
            observer.failure_suppressed(id, error);
        }
    }

    #[inline]
    pub(crate) fn generation_swapped(&self, generation: u64) {
        for observer in self.observers.iter() {
            observer.generation_swapped(generation);
        }
    }

    #[inline]
    pub(crate) fn cache_populated(&self, id: &ServiceId, store: CacheStore, raced: bool) {
        for observer in self.observers.iter() {
            observer.cache_populated(id, store, raced);
        }
    }
}

impl Default for Observers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Suppressed failures are logged at `warn`, swaps at `info` and cache
/// population at `trace`. Install a `tracing` subscriber to see them.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{DependencyResolver, LoggingObserver};
/// use std::sync::Arc;
///
/// let resolver = DependencyResolver::builder()
///     .observer(Arc::new(LoggingObserver::with_prefix("[app]")))
///     .build();
/// # let _ = resolver;
/// ```
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-resolver]".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for LoggingObserver {
    fn failure_suppressed(&self, id: &ServiceId, error: &ResolverError) {
        tracing::warn!("{} Resolution of {} reported as not found: {}", self.prefix, id, error);
    }

    fn generation_swapped(&self, generation: u64) {
        tracing::info!("{} Resolver swapped, generation {}", self.prefix, generation);
    }

    fn cache_populated(&self, id: &ServiceId, store: CacheStore, raced: bool) {
        tracing::trace!(
            "{} Cached {:?} entry for {} (raced: {})",
            self.prefix,
            store,
            id,
            raced
        );
    }
}

/// Observer that counts events with atomic counters.
///
/// Useful for tests and health endpoints.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    suppressed: AtomicU64,
    swaps: AtomicU64,
    populated: AtomicU64,
    races: AtomicU64,
}

impl MetricsObserver {
    /// Creates a new metrics observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of single-instance failures reported as "not found".
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Number of published generations.
    pub fn swap_count(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }

    /// Number of cache misses that went through the store.
    pub fn populated_count(&self) -> u64 {
        self.populated.load(Ordering::Relaxed)
    }

    /// Number of cache misses whose computed value was discarded.
    pub fn race_count(&self) -> u64 {
        self.races.load(Ordering::Relaxed)
    }

    /// Resets all counters.
    pub fn reset(&self) {
        self.suppressed.store(0, Ordering::Relaxed);
        self.swaps.store(0, Ordering::Relaxed);
        self.populated.store(0, Ordering::Relaxed);
        self.races.store(0, Ordering::Relaxed);
    }
}

impl ResolutionObserver for MetricsObserver {
    fn failure_suppressed(&self, _id: &ServiceId, _error: &ResolverError) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    fn generation_swapped(&self, _generation: u64) {
        self.swaps.fetch_add(1, Ordering::Relaxed);
    }

    fn cache_populated(&self, _id: &ServiceId, _store: CacheStore, raced: bool) {
        self.populated.fetch_add(1, Ordering::Relaxed);
        if raced {
            self.races.fetch_add(1, Ordering::Relaxed);
        }
    }
}
