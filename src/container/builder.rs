//! Container construction: ordering, validation and producer invocation.

use std::collections::HashMap;

use crate::component::{ComponentId, Instance, TypeKey};
use crate::error::ContainerError;
use crate::producer::ComponentProducer;
use crate::source::ConfigurationSource;

use super::registry::{Catalog, Registry};
use super::Container;

/// One step of the construction order, as reported by [`ContainerBuilder::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedComponent {
    pub source: String,
    pub source_priority: i32,
    pub name: String,
    pub priority: i32,
    pub declared_type: &'static str,
    pub concrete_type: &'static str,
    pub parameters: Vec<&'static str>,
}

/// Collects configuration sources and builds a [`Container`] from them.
///
/// # Example
///
/// ```ignore
/// let container = ContainerBuilder::new()
///     .register(services_config())
///     .register(clients_config())
///     .with_priorities(&settings.container.priorities)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    sources: Vec<ConfigurationSource>,
    priorities: HashMap<String, i32>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source. Registration order breaks priority ties.
    pub fn register(mut self, source: ConfigurationSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn register_all(mut self, sources: impl IntoIterator<Item = ConfigurationSource>) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Host-supplied source priorities, keyed by source name.
    ///
    /// An entry takes precedence over the priority set on the source itself.
    pub fn with_priorities(mut self, priorities: &HashMap<String, i32>) -> Self {
        self.priorities
            .extend(priorities.iter().map(|(name, p)| (name.clone(), *p)));
        self
    }

    /// Returns the construction order without invoking any producer.
    ///
    /// Performs every check that does not need a live component: source
    /// metadata, duplicate base names and dependency resolution by type. The
    /// checks are the ones `build` runs, so a plan that succeeds only fails to
    /// build when a producer does.
    pub fn plan(&self) -> Result<Vec<PlannedComponent>, ContainerError> {
        let priorities = self.effective_priorities()?;

        let mut sources: Vec<_> = self.sources.iter().zip(priorities).collect();
        sources.sort_by_key(|(_, priority)| *priority);

        let mut plan: Vec<PlannedComponent> = Vec::new();
        let mut catalog = Catalog::default();

        for (source, source_priority) in sources {
            let mut producers: Vec<&ComponentProducer> = source.producers().iter().collect();
            producers.sort_by_key(|producer| producer.priority());

            for producer in producers {
                admit(&catalog, producer, source.name())?;
                catalog.add(
                    producer.name(),
                    source.name(),
                    producer.declared_type(),
                    producer.concrete_type(),
                );

                plan.push(PlannedComponent {
                    source: source.name().to_string(),
                    source_priority,
                    name: producer.name().to_string(),
                    priority: producer.priority(),
                    declared_type: producer.declared_type().name(),
                    concrete_type: producer.concrete_type().name(),
                    parameters: producer.parameter_types().iter().map(TypeKey::name).collect(),
                });
            }
        }

        Ok(plan)
    }

    /// Builds the container, invoking every producer exactly once.
    ///
    /// Sources run in ascending priority, then producers within a source in
    /// ascending priority; ties keep registration order. Any failure aborts
    /// the whole build.
    pub fn build(self) -> Result<Container, ContainerError> {
        match self.build_registry() {
            Ok(registry) => {
                tracing::info!(
                    "Container built: {} components under {} keys",
                    registry.instances().len(),
                    registry.keys().count()
                );
                Ok(Container { registry })
            }
            Err(e) => {
                tracing::error!("Container build failed: {}", e);
                Err(e)
            }
        }
    }

    fn build_registry(self) -> Result<Registry, ContainerError> {
        let priorities = self.effective_priorities()?;

        let mut sources: Vec<_> = self.sources.into_iter().zip(priorities).collect();
        sources.sort_by_key(|(_, priority)| *priority);

        let mut registry = Registry::default();

        for (source, priority) in sources {
            let source_name = source.name().to_string();
            tracing::debug!("Processing configuration {} (priority {})", source_name, priority);

            let mut producers = source.into_producers();
            producers.sort_by_key(ComponentProducer::priority);

            for producer in &producers {
                register_component(&mut registry, producer, &source_name)?;
            }
        }

        Ok(registry)
    }

    /// Priority of each source, aligned with `self.sources`.
    fn effective_priorities(&self) -> Result<Vec<i32>, ContainerError> {
        self.sources
            .iter()
            .map(|source| {
                if source.name().is_empty() {
                    return Err(ContainerError::InvalidConfiguration {
                        source_name: String::new(),
                        reason: "configuration source has an empty name".to_string(),
                    });
                }

                if let Some(producer) = source.producers().iter().find(|p| p.name().is_empty()) {
                    return Err(ContainerError::InvalidConfiguration {
                        source_name: source.name().to_string(),
                        reason: format!(
                            "producer of {} has an empty component name",
                            producer.declared_type()
                        ),
                    });
                }

                self.priorities
                    .get(source.name())
                    .copied()
                    .or(source.priority())
                    .ok_or_else(|| ContainerError::InvalidConfiguration {
                        source_name: source.name().to_string(),
                        reason: "no priority declared or configured".to_string(),
                    })
            })
            .collect()
    }
}

fn register_component(
    registry: &mut Registry,
    producer: &ComponentProducer,
    source_name: &str,
) -> Result<(), ContainerError> {
    let args: Vec<Instance> = admit(registry.catalog(), producer, source_name)?
        .into_iter()
        .map(|id| registry.get(id).clone())
        .collect();

    tracing::debug!(
        "Producing component '{}' ({}) from {}",
        producer.name(),
        producer.declared_type(),
        source_name
    );

    let instance = producer.invoke(&args, registry.catalog().next_id(), source_name)?;
    registry.register(instance);
    Ok(())
}

/// Checks a producer against the components admitted so far.
///
/// Rejects a base name that collides with any existing key, then resolves
/// each parameter by `TypeId` to exactly one earlier component. Returns the
/// argument ids in parameter order.
fn admit(
    catalog: &Catalog,
    producer: &ComponentProducer,
    source_name: &str,
) -> Result<Vec<ComponentId>, ContainerError> {
    catalog
        .check_keys(producer.name(), producer.declared_type(), producer.concrete_type())
        .map_err(|(key, existing)| duplicate(key, source_name, &existing))?;

    producer
        .parameter_types()
        .iter()
        .map(|param| match catalog.providers(*param) {
            [] => Err(unresolved(*param, producer, source_name)),
            [single] => Ok(*single),
            ids => {
                let candidates = ids.iter().map(|id| catalog.name(*id).to_string()).collect();
                Err(ambiguous(*param, producer, source_name, candidates))
            }
        })
        .collect()
}

fn duplicate(key: String, source_name: &str, existing: &str) -> ContainerError {
    ContainerError::DuplicateComponentName {
        name: key,
        source_name: source_name.to_string(),
        existing_source: existing.to_string(),
    }
}

fn unresolved(param: TypeKey, producer: &ComponentProducer, source_name: &str) -> ContainerError {
    ContainerError::UnresolvedDependency {
        parameter: param.name(),
        producer: producer.name().to_string(),
        source_name: source_name.to_string(),
    }
}

fn ambiguous(
    param: TypeKey,
    producer: &ComponentProducer,
    source_name: &str,
    candidates: Vec<String>,
) -> ContainerError {
    ContainerError::AmbiguousDependency {
        parameter: param.name(),
        producer: producer.name().to_string(),
        source_name: source_name.to_string(),
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Db;
    struct Repo(#[allow(dead_code)] Arc<Db>);

    fn db_source(priority: i32) -> ConfigurationSource {
        ConfigurationSource::new("DbConfig")
            .with_priority(priority)
            .producer(ComponentProducer::new("db", 0, |()| Ok(Db)))
    }

    fn repo_source(priority: i32) -> ConfigurationSource {
        ConfigurationSource::new("RepoConfig")
            .with_priority(priority)
            .producer(ComponentProducer::new("repo", 0, |(db,): (Arc<Db>,)| {
                Ok(Repo(db))
            }))
    }

    #[test]
    fn test_plan_orders_by_source_then_producer() {
        let builder = ContainerBuilder::new()
            .register(repo_source(1))
            .register(
                ConfigurationSource::new("DbConfig")
                    .with_priority(0)
                    .producer(ComponentProducer::new("late", 5, |()| Ok(1u8)))
                    .producer(ComponentProducer::new("db", 0, |()| Ok(Db))),
            );

        let plan = builder.plan().unwrap();
        let names: Vec<_> = plan.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["db", "late", "repo"]);
        assert_eq!(plan[2].parameters, vec![std::any::type_name::<Db>()]);
        assert_eq!(plan[2].source_priority, 1);
    }

    #[test]
    fn test_plan_detects_unresolved_dependency() {
        let builder = ContainerBuilder::new()
            .register(repo_source(0))
            .register(db_source(1));

        let err = builder.plan().unwrap_err();
        assert!(matches!(
            err,
            ContainerError::UnresolvedDependency { ref producer, .. } if producer == "repo"
        ));
    }

    #[test]
    fn test_configured_priority_overrides_declared() {
        let mut priorities = HashMap::new();
        priorities.insert("RepoConfig".to_string(), 10);

        let builder = ContainerBuilder::new()
            .register(repo_source(0))
            .register(db_source(1))
            .with_priorities(&priorities);

        let plan = builder.plan().unwrap();
        assert_eq!(plan[0].name, "db");
        assert_eq!(plan[1].name, "repo");
        assert_eq!(plan[1].source_priority, 10);
    }

    #[test]
    fn test_missing_priority_is_invalid() {
        let err = ContainerBuilder::new()
            .register(ConfigurationSource::new("Unmarked"))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            ContainerError::InvalidConfiguration { ref source_name, .. } if source_name == "Unmarked"
        ));
    }

    #[test]
    fn test_configured_priority_fills_missing() {
        let mut priorities = HashMap::new();
        priorities.insert("Unmarked".to_string(), 3);

        let container = ContainerBuilder::new()
            .register(
                ConfigurationSource::new("Unmarked")
                    .producer(ComponentProducer::new("n", 0, |()| Ok(7u32))),
            )
            .with_priorities(&priorities)
            .build()
            .unwrap();

        assert_eq!(*container.get_by_name::<u32>("n").unwrap(), 7);
    }

    #[test]
    fn test_empty_component_name_is_invalid() {
        let err = ContainerBuilder::new()
            .register(
                ConfigurationSource::new("Config")
                    .with_priority(0)
                    .producer(ComponentProducer::new("", 0, |()| Ok(Db))),
            )
            .plan()
            .unwrap_err();

        assert!(matches!(err, ContainerError::InvalidConfiguration { .. }));
    }

    /// A component named like a type that it does not produce.
    fn misnamed_source() -> ConfigurationSource {
        ConfigurationSource::new("Names")
            .with_priority(0)
            .producer(ComponentProducer::new("usize", 0, |()| Ok("seven".to_string())))
    }

    fn consumer_source() -> ConfigurationSource {
        ConfigurationSource::new("Consumers")
            .with_priority(1)
            .producer(ComponentProducer::new("double", 0, |(n,): (Arc<usize>,)| {
                Ok(*n * 2)
            }))
    }

    #[test]
    fn test_dependency_is_not_satisfied_by_a_base_name() {
        let builder = ContainerBuilder::new()
            .register(misnamed_source())
            .register(consumer_source());

        let planned = builder.plan().unwrap_err();
        assert!(matches!(
            planned,
            ContainerError::UnresolvedDependency { parameter, ref producer, .. }
                if parameter == "usize" && producer == "double"
        ));

        let built = builder.build().unwrap_err();
        assert!(matches!(
            built,
            ContainerError::UnresolvedDependency { parameter, ref producer, .. }
                if parameter == "usize" && producer == "double"
        ));
    }

    #[test]
    fn test_plan_and_build_agree_on_key_collisions() {
        let builder = ContainerBuilder::new()
            .register(
                ConfigurationSource::new("Numbers")
                    .with_priority(0)
                    .producer(ComponentProducer::new("count", 0, |()| Ok(1usize))),
            )
            .register(misnamed_source());

        let planned = builder.plan().unwrap_err();
        let built = builder.build().unwrap_err();
        for err in [planned, built] {
            assert!(matches!(
                err,
                ContainerError::DuplicateComponentName { ref name, ref existing_source, .. }
                    if name == "usize" && existing_source == "Numbers"
            ));
        }
    }
}
