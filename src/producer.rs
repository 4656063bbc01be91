//! Component producers and typed parameter resolution.
//!
//! A producer is an explicit descriptor: a base name, a priority, the types it
//! needs and a closure that builds the component. Parameters are declared as a
//! tuple of `Arc<T>` handles, so the parameter types are known without any
//! runtime scanning.
//!
//! # Example
//!
//! ```ignore
//! let svc = ComponentProducer::new("svc", 0, |()| Ok(ServiceA::default()));
//! let client = ComponentProducer::new("client", 1, |(svc,): (Arc<ServiceA>,)| {
//!     Ok(ClientB::new(svc))
//! });
//! ```

use std::fmt;
use std::sync::Arc;

use crate::component::{ComponentId, Instance, TypeKey};
use crate::error::ContainerError;

/// A tuple of component handles a producer takes as input.
///
/// Implemented for `()` and for tuples of `Arc<T>` up to eight elements.
pub trait Dependencies: Sized + 'static {
    /// Parameter types in declaration order.
    fn parameter_types() -> Vec<TypeKey>;

    /// Builds the tuple from resolved instances, one per parameter type.
    fn from_instances(instances: &[Instance]) -> Result<Self, ContainerError>;
}

impl Dependencies for () {
    fn parameter_types() -> Vec<TypeKey> {
        Vec::new()
    }

    fn from_instances(_instances: &[Instance]) -> Result<Self, ContainerError> {
        Ok(())
    }
}

fn take<'a, T, I>(instances: &mut I) -> Result<Arc<T>, ContainerError>
where
    T: ?Sized + Send + Sync + 'static,
    I: Iterator<Item = &'a Instance>,
{
    let expected = std::any::type_name::<T>();
    let instance = instances
        .next()
        .ok_or_else(|| ContainerError::ComponentNotFound(expected.to_string()))?;

    instance
        .downcast::<T>()
        .ok_or_else(|| ContainerError::TypeMismatch {
            key: instance.name().to_string(),
            expected,
            actual: instance.concrete_type().name(),
        })
}

macro_rules! impl_dependencies {
    ($($param:ident),+) => {
        impl<$($param),+> Dependencies for ($(Arc<$param>,)+)
        where
            $($param: ?Sized + Send + Sync + 'static),+
        {
            fn parameter_types() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$param>()),+]
            }

            fn from_instances(instances: &[Instance]) -> Result<Self, ContainerError> {
                let mut iter = instances.iter();
                Ok(($(take::<$param, _>(&mut iter)?,)+))
            }
        }
    };
}

impl_dependencies!(A1);
impl_dependencies!(A1, A2);
impl_dependencies!(A1, A2, A3);
impl_dependencies!(A1, A2, A3, A4);
impl_dependencies!(A1, A2, A3, A4, A5);
impl_dependencies!(A1, A2, A3, A4, A5, A6);
impl_dependencies!(A1, A2, A3, A4, A5, A6, A7);
impl_dependencies!(A1, A2, A3, A4, A5, A6, A7, A8);

type Factory =
    Box<dyn Fn(&[Instance], ComponentId, &str) -> Result<Instance, ContainerError> + Send + Sync>;

/// Descriptor of one component: name, priority, types and the closure that
/// builds it.
pub struct ComponentProducer {
    name: String,
    priority: i32,
    declared_type: TypeKey,
    concrete_type: TypeKey,
    parameters: Vec<TypeKey>,
    factory: Factory,
}

impl ComponentProducer {
    /// Creates a producer whose declared type is the type it builds.
    pub fn new<C, P, F>(name: impl Into<String>, priority: i32, produce: F) -> Self
    where
        C: Send + Sync + 'static,
        P: Dependencies,
        F: Fn(P) -> anyhow::Result<C> + Send + Sync + 'static,
    {
        Self::with_declared_type(name, priority, produce, |component: Arc<C>| component)
    }

    /// Creates a producer that builds a `C` but advertises it as `I`.
    ///
    /// `upcast` must return a view of the same allocation, typically an
    /// unsizing coercion such as `|c| c as Arc<dyn Service>`.
    pub fn with_declared_type<I, C, P, F, U>(
        name: impl Into<String>,
        priority: i32,
        produce: F,
        upcast: U,
    ) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Send + Sync + 'static,
        P: Dependencies,
        F: Fn(P) -> anyhow::Result<C> + Send + Sync + 'static,
        U: Fn(Arc<C>) -> Arc<I> + Send + Sync + 'static,
    {
        let name = name.into();
        let producer_name = name.clone();

        let factory = move |args: &[Instance],
                            id: ComponentId,
                            source_name: &str|
              -> Result<Instance, ContainerError> {
            let deps = P::from_instances(args)?;
            let component =
                produce(deps).map_err(|cause| ContainerError::ProducerInvocationFailure {
                    producer: producer_name.clone(),
                    source_name: source_name.to_string(),
                    cause,
                })?;

            let concrete = Arc::new(component);
            let declared = upcast(Arc::clone(&concrete));
            Ok(Instance::new(id, &producer_name, source_name, declared, concrete))
        };

        Self {
            name,
            priority,
            declared_type: TypeKey::of::<I>(),
            concrete_type: TypeKey::of::<C>(),
            parameters: P::parameter_types(),
            factory: Box::new(factory),
        }
    }

    /// Base name of the component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Order within the owning source; lower runs first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn declared_type(&self) -> TypeKey {
        self.declared_type
    }

    pub fn concrete_type(&self) -> TypeKey {
        self.concrete_type
    }

    pub fn parameter_types(&self) -> &[TypeKey] {
        &self.parameters
    }

    /// Runs the producer with already resolved arguments.
    pub(crate) fn invoke(
        &self,
        args: &[Instance],
        id: ComponentId,
        source_name: &str,
    ) -> Result<Instance, ContainerError> {
        (self.factory)(args, id, source_name)
    }
}

impl fmt::Debug for ComponentProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentProducer")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("declared_type", &self.declared_type)
            .field("concrete_type", &self.concrete_type)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
