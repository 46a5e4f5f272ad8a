//! Service identifier types for resolution and cache lookup.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased, shareable service instance.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Parameterless constructor carried by a [`ServiceId`].
///
/// Rust has no runtime reflection, so a concrete identifier that the
/// [`DefaultResolver`](crate::DefaultResolver) should be able to instantiate
/// carries its own constructor.
pub type Activator = Arc<dyn Fn() -> AnyArc + Send + Sync>;

/// What kind of type a [`ServiceId`] names.
#[derive(Clone)]
pub enum ServiceKind {
    /// Concrete type, optionally with a parameterless constructor
    Concrete(Option<Activator>),
    /// Trait object or other unsized type
    Interface,
    /// Sized type that must never be instantiated
    Abstract,
}

impl fmt::Debug for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Concrete(activator) => f
                .debug_tuple("Concrete")
                .field(&activator.as_ref().map(|_| "<activator>"))
                .finish(),
            ServiceKind::Interface => f.write_str("Interface"),
            ServiceKind::Abstract => f.write_str("Abstract"),
        }
    }
}

/// Identifier of a requested service.
///
/// Identifiers compare and hash by `TypeId` plus the shape of their kind:
/// interface, abstract, concrete, or concrete with an activator. Two
/// identifiers that a resolver may answer differently are never equal, so
/// they never share a cache entry. The type name and the activator itself are
/// diagnostic payload.
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::ServiceId;
///
/// trait Logger: Send + Sync {}
///
/// #[derive(Default)]
/// struct Clock;
///
/// let plain = ServiceId::of::<Clock>();
/// let constructible = ServiceId::constructible::<Clock>();
/// let interface = ServiceId::interface::<dyn Logger>();
///
/// // Only constructible identifiers can be activated, so they are distinct keys
/// assert_ne!(plain, constructible);
/// assert_eq!(constructible, ServiceId::constructible::<Clock>());
/// assert!(constructible.activator().is_some());
/// assert!(interface.is_interface());
/// assert!(plain.name().ends_with("Clock"));
/// ```
#[derive(Clone)]
pub struct ServiceId {
    type_id: TypeId,
    name: &'static str,
    kind: ServiceKind,
}

impl ServiceId {
    /// Identifier for a concrete type with no known parameterless constructor.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: ServiceKind::Concrete(None),
        }
    }

    /// Identifier for a concrete type constructed through `Default`.
    pub fn constructible<T: Default + Send + Sync + 'static>() -> Self {
        Self::with_activator::<T, _>(T::default)
    }

    /// Identifier for a concrete type with an explicit parameterless constructor.
    ///
    /// The constructor may panic; the default resolver treats that as
    /// "not constructible".
    pub fn with_activator<T, F>(ctor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let activator: Activator = Arc::new(move || Arc::new(ctor()) as AnyArc);
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: ServiceKind::Concrete(Some(activator)),
        }
    }

    /// Identifier for a trait object (or any unsized type).
    #[inline]
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: ServiceKind::Interface,
        }
    }

    /// Identifier for a sized type that can never be instantiated.
    #[inline]
    pub fn abstract_of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: ServiceKind::Abstract,
        }
    }

    /// The `TypeId` this identifier compares by.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full type name for diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &ServiceKind {
        &self.kind
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ServiceKind::Interface)
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, ServiceKind::Abstract)
    }

    // Part of identity next to the TypeId
    #[inline]
    fn kind_rank(&self) -> u8 {
        match &self.kind {
            ServiceKind::Interface => 0,
            ServiceKind::Abstract => 1,
            ServiceKind::Concrete(None) => 2,
            ServiceKind::Concrete(Some(_)) => 3,
        }
    }

    /// The parameterless constructor, for constructible concrete identifiers.
    pub fn activator(&self) -> Option<&Activator> {
        match &self.kind {
            ServiceKind::Concrete(activator) => activator.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceId")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Name and activator are payload
impl PartialEq for ServiceId {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.kind_rank() == other.kind_rank()
    }
}

impl Eq for ServiceId {}

impl PartialOrd for ServiceId {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceId {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.type_id
            .cmp(&other.type_id)
            .then_with(|| self.kind_rank().cmp(&other.kind_rank()))
    }
}

impl std::hash::Hash for ServiceId {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.kind_rank().hash(state);
    }
}
