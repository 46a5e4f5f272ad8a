//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{ResolverError, ResolverResult};
use crate::key::{AnyArc, ServiceId};

/// Core resolver trait for object-safe service resolution.
///
/// This is the strategy seam of the crate: the default, delegate, locator and
/// caching resolvers all implement it, and [`DependencyResolver`](crate::DependencyResolver)
/// holds exactly one active implementation at a time.
///
/// Most users should use [`ResolverExt`] instead, which provides typed
/// methods built on top of this trait.
pub trait ServiceResolver: Send + Sync {
    /// Resolves a single service instance.
    ///
    /// "Not found" is an expected outcome and is reported as `None`, never as
    /// an error.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier of the requested service
    fn get_service(&self, id: &ServiceId) -> Option<AnyArc>;

    /// Resolves every instance registered for a service, in registration order.
    ///
    /// "No registrations" is an empty vector. An `Err` signals a genuine
    /// failure in the underlying resolver and is propagated to the caller.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier of the requested service
    fn get_services(&self, id: &ServiceId) -> ResolverResult<Vec<AnyArc>>;
}

/// Shared, type-erased resolver strategy.
pub type SharedResolver = Arc<dyn ServiceResolver>;

impl<R: ServiceResolver + ?Sized> ServiceResolver for Arc<R> {
    #[inline]
    fn get_service(&self, id: &ServiceId) -> Option<AnyArc> {
        (**self).get_service(id)
    }

    #[inline]
    fn get_services(&self, id: &ServiceId) -> ResolverResult<Vec<AnyArc>> {
        (**self).get_services(id)
    }
}

/// Typed resolution helpers built on [`ServiceResolver`].
///
/// Trait objects follow the `Arc<Arc<dyn Trait>>` storage convention: a
/// resolver that hands out `dyn Trait` services stores an `Arc<dyn Trait>`
/// inside the type-erased `AnyArc`.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{DefaultResolver, ResolverExt, ServiceId};
///
/// #[derive(Default)]
/// struct Clock { ticks: u64 }
///
/// let resolver = DefaultResolver::new();
/// let clock = resolver.get_by::<Clock>(&ServiceId::constructible::<Clock>());
/// assert_eq!(clock.map(|c| c.ticks), Some(0));
///
/// // No parameterless constructor is known for a plain identifier
/// assert!(resolver.get::<Clock>().is_none());
/// ```
pub trait ResolverExt: ServiceResolver {
    /// Resolves a concrete service by its plain identifier.
    fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.get_by::<T>(&ServiceId::of::<T>())
    }

    /// Resolves a concrete service using a caller-built identifier.
    ///
    /// Returns `None` if the resolver produced nothing or produced a value of
    /// another type.
    fn get_by<T: Send + Sync + 'static>(&self, id: &ServiceId) -> Option<Arc<T>> {
        self.get_service(id)?.downcast::<T>().ok()
    }

    /// Resolves a trait object stored as `Arc<dyn Trait>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_resolver::{DelegateResolver, ResolverExt, AnyArc};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> &'static str;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> &'static str { "hello" }
    /// }
    ///
    /// let resolver = DelegateResolver::new(
    ///     |_id| {
    ///         let greeter: Arc<dyn Greeter> = Arc::new(English);
    ///         Ok(Some(Arc::new(greeter) as AnyArc))
    ///     },
    ///     |_id| Ok(Vec::new()),
    /// );
    ///
    /// let greeter = resolver.get_trait::<dyn Greeter>().unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    fn get_trait<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let any = self.get_service(&ServiceId::interface::<T>())?;
        any.downcast::<Arc<T>>().ok().map(|boxed| (*boxed).clone())
    }

    /// Resolves every instance of a concrete service.
    ///
    /// Fails with [`ResolverError::TypeMismatch`] if any instance has another type.
    fn get_all<T: Send + Sync + 'static>(&self) -> ResolverResult<Vec<Arc<T>>> {
        let anys = self.get_services(&ServiceId::of::<T>())?;

        let mut results = Vec::with_capacity(anys.len());
        for any in anys {
            let arc = any
                .downcast::<T>()
                .map_err(|_| ResolverError::TypeMismatch(std::any::type_name::<T>()))?;
            results.push(arc);
        }
        Ok(results)
    }

    /// Resolves every implementation of a trait stored as `Arc<dyn Trait>`.
    fn get_all_trait<T: ?Sized + Send + Sync + 'static>(&self) -> ResolverResult<Vec<Arc<T>>> {
        let anys = self.get_services(&ServiceId::interface::<T>())?;

        let mut results = Vec::with_capacity(anys.len());
        for any in anys {
            let arc = any
                .downcast::<Arc<T>>()
                .map(|boxed| (*boxed).clone())
                .map_err(|_| ResolverError::TypeMismatch(std::any::type_name::<T>()))?;
            results.push(arc);
        }
        Ok(results)
    }

    /// Resolves a concrete service, panicking if it cannot be produced.
    ///
    /// # Panics
    ///
    /// Panics if the resolver returns nothing or a value of another type.
    fn get_required<T: Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|| panic!("Failed to resolve {}", std::any::type_name::<T>()))
    }
}

impl<R: ServiceResolver + ?Sized> ResolverExt for R {}
