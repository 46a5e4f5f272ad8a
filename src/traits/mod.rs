//! Core traits for service resolution.

mod resolver;

pub use resolver::{ResolverExt, ServiceResolver, SharedResolver};
