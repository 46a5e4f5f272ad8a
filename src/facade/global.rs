//! The process-wide resolver instance and its access functions.
//!
//! These functions forward to one lazily created [`DependencyResolver`].
//! Prefer passing an owned facade around; the global exists for hosts that
//! need a single ambient access point.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::caching::CachingResolver;
use crate::config::ResolverOptions;
use crate::delegate::{GetServiceFn, GetServicesFn};
use crate::error::ResolverResult;
use crate::facade::DependencyResolver;
use crate::locator::{DynamicLocator, ServiceLocator};
use crate::traits::SharedResolver;

// Created on first access with the default strategy active
static GLOBAL_RESOLVER: Lazy<DependencyResolver> = Lazy::new(|| {
    let options = ResolverOptions::from_env().unwrap_or_else(|error| {
        tracing::warn!(%error, "ignoring invalid resolver options from environment");
        ResolverOptions::default()
    });
    DependencyResolver::builder().options(options).build()
});

/// Provides a reference to the process-wide resolver.
///
/// Its options are read once from `FERROUS_RESOLVER_*` environment variables.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{global, ServiceResolver, ServiceId};
///
/// #[derive(Default)]
/// struct Clock;
///
/// let clock = global().current().get_service(&ServiceId::constructible::<Clock>());
/// assert!(clock.is_some());
/// ```
pub fn global() -> &'static DependencyResolver {
    &GLOBAL_RESOLVER
}

/// The active strategy of the process-wide resolver.
pub fn current() -> SharedResolver {
    global().current()
}

/// The caching decorator of the process-wide resolver (framework use).
pub fn current_cache() -> Arc<CachingResolver> {
    global().current_cache()
}

/// See [`DependencyResolver::set_resolver`].
pub fn set_resolver(resolver: Option<SharedResolver>) -> ResolverResult<()> {
    global().set_resolver(resolver)
}

/// See [`DependencyResolver::set_resolver_fns`].
pub fn set_resolver_fns(
    get_service: Option<GetServiceFn>,
    get_services: Option<GetServicesFn>,
) -> ResolverResult<()> {
    global().set_resolver_fns(get_service, get_services)
}

/// See [`DependencyResolver::set_locator`].
pub fn set_locator<L: ServiceLocator>(locator: Option<Arc<L>>) -> ResolverResult<()> {
    global().set_locator(locator)
}

/// See [`DependencyResolver::set_dynamic_locator`].
pub fn set_dynamic_locator(locator: Option<Arc<dyn DynamicLocator>>) -> ResolverResult<()> {
    global().set_dynamic_locator(locator)
}
