//! Type keys and registered component instances.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased handle to a component.
///
/// The boxed value is always an `Arc<T>` for some `T: ?Sized`, which lets
/// trait-object views (`Arc<dyn Trait>`) and concrete views share one shape.
pub(crate) type ErasedArc = Arc<dyn Any + Send + Sync>;

/// Identifies a Rust type by id and by its full type name.
///
/// The name is the registry key used for lookups by type.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name, e.g. `reqwest::async_impl::client::Client`.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Position of a component in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A live component as stored in the registry.
///
/// Holds two views of the same object: the type its producer declared and the
/// concrete type the producer built. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Instance {
    id: ComponentId,
    name: Arc<str>,
    source_name: Arc<str>,
    declared_type: TypeKey,
    concrete_type: TypeKey,
    declared: ErasedArc,
    concrete: ErasedArc,
}

impl Instance {
    /// Wraps a freshly produced component.
    ///
    /// `declared` must be the `Arc<I>` view and `concrete` the `Arc<C>` view of
    /// the same allocation.
    pub(crate) fn new<I, C>(
        id: ComponentId,
        name: &str,
        source_name: &str,
        declared: Arc<I>,
        concrete: Arc<C>,
    ) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        Self {
            id,
            name: Arc::from(name),
            source_name: Arc::from(source_name),
            declared_type: TypeKey::of::<I>(),
            concrete_type: TypeKey::of::<C>(),
            declared: Arc::new(declared),
            concrete: Arc::new(concrete),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Base name declared by the producer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the configuration source that produced this component.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn declared_type(&self) -> TypeKey {
        self.declared_type
    }

    pub fn concrete_type(&self) -> TypeKey {
        self.concrete_type
    }

    /// Returns a typed handle if `T` is the declared or the concrete type.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.declared
            .downcast_ref::<Arc<T>>()
            .or_else(|| self.concrete.downcast_ref::<Arc<T>>())
            .cloned()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("source", &self.source_name)
            .field("declared_type", &self.declared_type)
            .field("concrete_type", &self.concrete_type)
            .finish()
    }
}
