//! Error types for service resolution.

use std::fmt;
use std::sync::Arc;

/// Boxed error returned by caller-supplied resolution functions and locators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Service resolution errors
///
/// Configuration and adaptation errors are raised synchronously by the
/// `set_*` family on [`DependencyResolver`](crate::DependencyResolver).
/// Resolution errors only reach callers on the multi-instance path; on the
/// single-instance path they are contained and reported as "not found".
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::{DependencyResolver, ResolverError};
///
/// let resolver = DependencyResolver::new();
/// match resolver.set_resolver(None) {
///     Err(ResolverError::MissingArgument(name)) => assert_eq!(name, "resolver"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_resolver::ResolverError;
///
/// let missing = ResolverError::MissingArgument("get_service");
/// let shape = ResolverError::ShapeMismatch {
///     type_name: "acme::Container".to_string(),
///     expected: "get_all_instances(&ServiceId) -> Vec<AnyArc>",
/// };
///
/// println!("Error: {}", missing);
/// println!("Error: {}", shape);
/// ```
#[derive(Debug, Clone)]
pub enum ResolverError {
    /// A required strategy, function or locator argument was not supplied
    MissingArgument(&'static str),
    /// An external locator does not expose the required method shapes
    ShapeMismatch {
        /// Type name of the offending locator
        type_name: String,
        /// Description of the expected method signature
        expected: &'static str,
    },
    /// A foreign resolution function failed
    Resolution {
        /// Name of the service being resolved
        service: &'static str,
        /// Error raised by the foreign code
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// A constructor or foreign function panicked during resolution
    ConstructionPanicked {
        /// Name of the service being resolved
        service: &'static str,
        /// Panic message if it could be recovered
        message: String,
    },
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// A resolver option could not be parsed
    InvalidOption {
        /// Option key
        key: String,
        /// Rejected value or parser message
        value: String,
    },
}

impl ResolverError {
    pub(crate) fn resolution(service: &'static str, source: BoxError) -> Self {
        ResolverError::Resolution {
            service,
            source: Arc::from(source),
        }
    }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::MissingArgument(name) => {
                write!(f, "Value cannot be null: {}", name)
            }
            ResolverError::ShapeMismatch { type_name, expected } => write!(
                f,
                "The type {} does not appear to implement a service locator: expected {}",
                type_name, expected
            ),
            ResolverError::Resolution { service, source } => {
                write!(f, "Resolution of {} failed: {}", service, source)
            }
            ResolverError::ConstructionPanicked { service, message } => {
                write!(f, "Construction of {} panicked: {}", service, message)
            }
            ResolverError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            ResolverError::InvalidOption { key, value } => {
                write!(f, "Invalid resolver option {}: {}", key, value)
            }
        }
    }
}

impl std::error::Error for ResolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolverError::Resolution { source, .. } => {
                let source: &(dyn std::error::Error + 'static) = source.as_ref();
                Some(source)
            }
            _ => None,
        }
    }
}

/// Result type for resolver operations
///
/// A convenience alias for `Result<T, ResolverError>`.
pub type ResolverResult<T> = Result<T, ResolverError>;
