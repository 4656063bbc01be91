//! The application component container.
//!
//! A [`Container`] is built once from an explicit list of configuration
//! sources and is read-only afterwards. Lookups take `&self`, use no locks and
//! never mutate state, so a container can be shared across threads behind an
//! `Arc` or a plain reference.
//!
//! # Example
//!
//! ```ignore
//! let container = Container::build([
//!     ConfigurationSource::new("Services")
//!         .with_priority(0)
//!         .producer(ComponentProducer::new("svc", 0, |()| Ok(ServiceA::default()))),
//!     ConfigurationSource::new("Clients")
//!         .with_priority(1)
//!         .producer(ComponentProducer::new("client", 0, |(svc,): (Arc<ServiceA>,)| {
//!             Ok(ClientB::new(svc))
//!         })),
//! ])?;
//!
//! let svc = container.get_by_name::<ServiceA>("svc")?;
//! let client = container.get_by_type::<ClientB>()?;
//! ```

mod builder;
mod registry;

use std::sync::Arc;

pub use builder::{ContainerBuilder, PlannedComponent};

use crate::component::Instance;
use crate::error::ContainerError;
use crate::source::ConfigurationSource;

use registry::Registry;

/// Immutable registry of live components.
pub struct Container {
    registry: Registry,
}

impl Container {
    /// Builds a container from the given sources.
    pub fn build(
        sources: impl IntoIterator<Item = ConfigurationSource>,
    ) -> Result<Self, ContainerError> {
        ContainerBuilder::new().register_all(sources).build()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Looks a component up by key and returns it as `T`.
    ///
    /// The key is usually a base name but any registry key is accepted.
    pub fn get_by_name<T>(&self, name: &str) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.registry.resolve(name)?;
        instance
            .downcast::<T>()
            .ok_or_else(|| ContainerError::TypeMismatch {
                key: name.to_string(),
                expected: std::any::type_name::<T>(),
                actual: instance.concrete_type().name(),
            })
    }

    /// Looks a component up by its declared or concrete type.
    pub fn get_by_type<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_by_name::<T>(std::any::type_name::<T>())
    }

    /// Untyped lookup with the same not-found and ambiguity rules.
    pub fn resolve(&self, key: &str) -> Result<&Instance, ContainerError> {
        self.registry.resolve(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registry.contains(key)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.registry.instances().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.instances().is_empty()
    }

    /// Components in construction order.
    pub fn instances(&self) -> &[Instance] {
        self.registry.instances()
    }

    /// Base names in construction order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.registry.instances().iter().map(Instance::name)
    }

    /// Every registry key, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.registry.keys()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("components", &self.registry.instances())
            .finish()
    }
}
