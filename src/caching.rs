//! Memoizing decorator over any resolver strategy.
//!
//! The decorator keeps two independent concurrent stores, one for single
//! results and one for multi results, both keyed by [`ServiceId`]. Entries are
//! created on first access and never updated or evicted; they live exactly as
//! long as the decorator, which is one strategy generation of the facade.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::ResolverResult;
use crate::key::{AnyArc, ServiceId};
use crate::observer::{CacheStore, Observers};
use crate::traits::{ServiceResolver, SharedResolver};

#[cfg(feature = "ahash")]
type StoreHasher = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
type StoreHasher = std::collections::hash_map::RandomState;

type Store<V> = DashMap<ServiceId, V, StoreHasher>;

/// Caching decorator that retains exactly one result per identifier.
///
/// # Concurrency
///
/// A miss computes the inner result with no lock held, then stores it with
/// insert-if-absent semantics. Under a first-access race several threads may
/// run the inner resolver, but only one result is retained and every caller,
/// including those whose own result was discarded, returns that retained
/// value. Duplicate computation is accepted; divergent storage is not.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{CachingResolver, DelegateResolver, ServiceResolver, ServiceId, AnyArc};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let counter = Arc::new(AtomicU32::new(0));
/// let c = counter.clone();
/// let inner = DelegateResolver::new(
///     move |_id| Ok(Some(Arc::new(c.fetch_add(1, Ordering::SeqCst)) as AnyArc)),
///     |_id| Ok(Vec::new()),
/// );
///
/// let cache = CachingResolver::new(Arc::new(inner));
/// let id = ServiceId::of::<u32>();
///
/// let first = cache.get_service(&id).unwrap();
/// let second = cache.get_service(&id).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(counter.load(Ordering::SeqCst), 1);
/// ```
pub struct CachingResolver {
    inner: SharedResolver,
    single: Store<Option<AnyArc>>,
    multi: Store<Arc<[AnyArc]>>,
    observers: Observers,
}

impl CachingResolver {
    /// Creates an empty cache in front of `inner`.
    pub fn new(inner: SharedResolver) -> Self {
        Self::with_observers(inner, Observers::new())
    }

    /// Creates an empty cache that reports population events to `observers`.
    pub fn with_observers(inner: SharedResolver, observers: Observers) -> Self {
        Self {
            inner,
            single: Store::with_hasher(StoreHasher::default()),
            multi: Store::with_hasher(StoreHasher::default()),
            observers,
        }
    }

    /// The decorated strategy.
    pub fn inner(&self) -> &SharedResolver {
        &self.inner
    }

    /// Number of retained entries across both stores.
    pub fn len(&self) -> usize {
        self.single.len() + self.multi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.multi.is_empty()
    }

    /// Whether a single-instance result is retained for `id`.
    pub fn contains(&self, id: &ServiceId) -> bool {
        self.single.contains_key(id)
    }

    /// Whether a multi-instance result is retained for `id`.
    pub fn contains_many(&self, id: &ServiceId) -> bool {
        self.multi.contains_key(id)
    }
}

impl ServiceResolver for CachingResolver {
    fn get_service(&self, id: &ServiceId) -> Option<AnyArc> {
        if let Some(hit) = self.single.get(id) {
            return hit.value().clone();
        }

        // Foreign call with no shard guard held
        let computed = self.inner.get_service(id);

        let (retained, raced) = match self.single.entry(id.clone()) {
            Entry::Occupied(existing) => (existing.get().clone(), true),
            Entry::Vacant(slot) => {
                slot.insert(computed.clone());
                (computed, false)
            }
        };

        self.observers.cache_populated(id, CacheStore::Single, raced);
        retained
    }

    fn get_services(&self, id: &ServiceId) -> ResolverResult<Vec<AnyArc>> {
        if let Some(hit) = self.multi.get(id) {
            return Ok(hit.value().to_vec());
        }

        // Failures propagate and leave no entry behind
        let computed: Arc<[AnyArc]> = self.inner.get_services(id)?.into();

        let (retained, raced) = match self.multi.entry(id.clone()) {
            Entry::Occupied(existing) => (Arc::clone(existing.get()), true),
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&computed));
                (computed, false)
            }
        };

        self.observers.cache_populated(id, CacheStore::Multi, raced);
        Ok(retained.to_vec())
    }
}

impl fmt::Debug for CachingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingResolver")
            .field("single_entries", &self.single.len())
            .field("multi_entries", &self.multi.len())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::DelegateResolver;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(calls: Arc<AtomicUsize>) -> SharedResolver {
        let many_calls = calls.clone();
        Arc::new(DelegateResolver::new(
            move |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Arc::new(n) as AnyArc))
            },
            move |_| {
                let n = many_calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![Arc::new(n) as AnyArc, Arc::new(n + 100) as AnyArc])
            },
        ))
    }

    #[test]
    fn stores_are_independent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CachingResolver::new(counting(calls.clone()));
        let id = ServiceId::of::<usize>();

        cache.get_service(&id);
        assert!(cache.contains(&id));
        assert!(!cache.contains_many(&id));

        cache.get_services(&id).unwrap();
        assert!(cache.contains_many(&id));
        assert_eq!(cache.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn none_is_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let inner = DelegateResolver::new(
            move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            },
            |_| Ok(Vec::new()),
        );
        let cache = CachingResolver::new(Arc::new(inner));
        let id = ServiceId::of::<u8>();

        assert!(cache.get_service(&id).is_none());
        assert!(cache.get_service(&id).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multi_failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let inner = DelegateResolver::new(
            |_| Ok(None),
            move |_| {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("transient".into())
                } else {
                    Ok(vec![Arc::new(1u8) as AnyArc])
                }
            },
        );
        let cache = CachingResolver::new(Arc::new(inner));
        let id = ServiceId::of::<u8>();

        assert!(cache.get_services(&id).is_err());
        assert!(!cache.contains_many(&id));
        assert_eq!(cache.get_services(&id).unwrap().len(), 1);
    }
}
