//! # ferrous-resolver
//!
//! A swappable service resolution facade for Rust.
//!
//! ## Features
//!
//! - **One active strategy**: turn a [`ServiceId`] into one or many instances
//! - **Plug in any container**: closures, a typed [`ServiceLocator`], or a
//!   runtime-described [`DynamicLocator`]
//! - **Zero configuration**: the [`DefaultResolver`] constructs services that
//!   carry a parameterless constructor
//! - **Race-tolerant caching**: at most one retained instance per identifier,
//!   even under concurrent first access
//! - **Atomic swaps**: strategy and cache are published together, never torn
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_resolver::{AnyArc, DependencyResolver, ResolverExt, ServiceId};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let resolver = DependencyResolver::new();
//!
//! let database = Arc::new(Database { url: "postgres://localhost".to_string() });
//! resolver.use_fns(
//!     move |id| {
//!         if *id == ServiceId::of::<Database>() {
//!             Ok(Some(database.clone() as AnyArc))
//!         } else {
//!             Ok(None)
//!         }
//!     },
//!     |_id| Ok(Vec::new()),
//! );
//!
//! let db = resolver.current().get_required::<Database>();
//! assert_eq!(db.url, "postgres://localhost");
//! ```
//!
//! ## Failure Policy
//!
//! - Configuration mistakes (`set_*` with a missing argument, a locator with
//!   the wrong shape) fail immediately with a [`ResolverError`].
//! - Single-instance resolution never fails: foreign errors and panics become
//!   `None` and are reported to [`ResolutionObserver`]s.
//! - Multi-instance resolution propagates foreign errors.
//!
//! ## Caching
//!
//! ```rust
//! use ferrous_resolver::{DependencyResolver, ServiceResolver, ServiceId};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Formatter;
//!
//! let resolver = DependencyResolver::new();
//! let id = ServiceId::constructible::<Formatter>();
//!
//! let a = resolver.current_cache().get_service(&id).unwrap();
//! let b = resolver.current_cache().get_service(&id).unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! // A swap starts a fresh cache
//! resolver.reset();
//! let c = resolver.current_cache().get_service(&id).unwrap();
//! assert!(!Arc::ptr_eq(&a, &c));
//! ```

// Module declarations
pub mod caching;
pub mod config;
pub mod default_resolver;
pub mod delegate;
pub mod error;
pub mod facade;
pub mod key;
pub mod locator;
pub mod observer;
pub mod traits;

// Internal modules
mod internal;

// Re-export core types
pub use caching::CachingResolver;
pub use config::ResolverOptions;
pub use default_resolver::DefaultResolver;
pub use delegate::{DelegateResolver, GetServiceFn, GetServicesFn, Resolution};
pub use error::{BoxError, ResolverError, ResolverResult};
pub use facade::global::global;
pub use facade::{DependencyResolver, DependencyResolverBuilder, Generation};
pub use key::{Activator, AnyArc, ServiceId, ServiceKind};
pub use locator::{DynamicLocator, LocatorAdapter, LocatorMethod, MethodTable, ServiceLocator};
pub use observer::{CacheStore, LoggingObserver, MetricsObserver, Observers, ResolutionObserver};
pub use traits::{ResolverExt, ServiceResolver, SharedResolver};
