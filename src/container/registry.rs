//! Keyed index of built components.

use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{ComponentId, Instance, TypeKey};
use crate::error::ContainerError;

/// Component metadata indexed by every lookup key.
///
/// Each component is appended under three string keys: its base name, its
/// declared type name and its concrete type name. Collections are never
/// deduplicated, so a component whose declared and concrete types coincide is
/// stored twice under that key. Ambiguity is decided on distinct components.
///
/// Dependencies are matched by `TypeId` through a separate index, so a base
/// name spelled like a type never satisfies a parameter.
#[derive(Default)]
pub(crate) struct Catalog {
    /// Base name and owning source, by component id.
    components: Vec<(String, String)>,
    keys: HashMap<String, Vec<ComponentId>>,
    base_names: HashMap<String, ComponentId>,
    by_type: HashMap<TypeId, Vec<ComponentId>>,
}

impl Catalog {
    /// Id the next added component will receive.
    pub(crate) fn next_id(&self) -> ComponentId {
        ComponentId(self.components.len())
    }

    pub(crate) fn name(&self, id: ComponentId) -> &str {
        &self.components[id.0].0
    }

    fn source(&self, id: ComponentId) -> &str {
        &self.components[id.0].1
    }

    /// Rejects a component whose keys would collide with a base name.
    ///
    /// The base name may not be any existing key, and neither type name may be
    /// the base name of an existing component. Returns the offending key and
    /// the source that already owns it.
    pub(crate) fn check_keys(
        &self,
        name: &str,
        declared: TypeKey,
        concrete: TypeKey,
    ) -> Result<(), (String, String)> {
        if let Some(&id) = self.keys.get(name).and_then(|ids| ids.first()) {
            return Err((name.to_string(), self.source(id).to_string()));
        }

        for key in [declared.name(), concrete.name()] {
            if key == name {
                continue;
            }
            if let Some(&id) = self.base_names.get(key) {
                return Err((key.to_string(), self.source(id).to_string()));
            }
        }

        Ok(())
    }

    /// Distinct components whose declared or concrete type is `param`.
    pub(crate) fn providers(&self, param: TypeKey) -> &[ComponentId] {
        self.by_type
            .get(&param.id())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn add(
        &mut self,
        name: &str,
        source_name: &str,
        declared: TypeKey,
        concrete: TypeKey,
    ) -> ComponentId {
        let id = self.next_id();

        for key in [name, declared.name(), concrete.name()] {
            self.keys.entry(key.to_string()).or_default().push(id);
        }

        for type_id in [declared.id(), concrete.id()] {
            let ids = self.by_type.entry(type_id).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        self.base_names.insert(name.to_string(), id);
        self.components
            .push((name.to_string(), source_name.to_string()));
        id
    }

    /// The single component registered under `key`.
    pub(crate) fn lookup(&self, key: &str) -> Result<ComponentId, ContainerError> {
        let ids = self
            .keys
            .get(key)
            .ok_or_else(|| ContainerError::ComponentNotFound(key.to_string()))?;

        match distinct(ids).as_slice() {
            [single] => Ok(*single),
            candidates => Err(ContainerError::AmbiguousComponent {
                key: key.to_string(),
                candidates: candidates.iter().map(|id| self.name(*id).to_string()).collect(),
            }),
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

/// Ids with duplicates removed, first seen wins.
fn distinct(ids: &[ComponentId]) -> Vec<ComponentId> {
    let mut seen: Vec<ComponentId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

/// Live components plus their catalog.
#[derive(Default)]
pub(crate) struct Registry {
    catalog: Catalog,
    /// Construction order; index is the component id.
    instances: Vec<Instance>,
}

impl Registry {
    pub(crate) fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn register(&mut self, instance: Instance) {
        let id = self.catalog.add(
            instance.name(),
            instance.source_name(),
            instance.declared_type(),
            instance.concrete_type(),
        );
        debug_assert_eq!(id, instance.id());
        self.instances.push(instance);
    }

    pub(crate) fn get(&self, id: ComponentId) -> &Instance {
        &self.instances[id.0]
    }

    /// Returns the single instance registered under `key`.
    pub(crate) fn resolve(&self, key: &str) -> Result<&Instance, ContainerError> {
        self.catalog.lookup(key).map(|id| self.get(id))
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.catalog.contains(key)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.catalog.keys()
    }

    pub(crate) fn instances(&self) -> &[Instance] {
        &self.instances
    }
}
