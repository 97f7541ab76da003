//! Catalog of behavior kinds.
//!
//! One registry is built at startup and shared, by `Arc`, between the
//! authoring surface (which lists the entries and their schemas) and the
//! [`BehaviorManager`](crate::behaviors::manager::BehaviorManager) (which
//! instantiates from the same entries). A kind is visible exactly when it
//! is instantiable.

use bevy_ecs::prelude::World;
use log::warn;
use serde::Serialize;

use crate::behaviors::behavior::Owner;
use crate::behaviors::config::{ConfigField, ConfigMap, default_config, merge_config};
use crate::behaviors::kind::{BehaviorInstance, BehaviorKind, Category};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    #[serde(skip)]
    pub kind: BehaviorKind,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub config_schema: Vec<ConfigField>,
}

impl RegistryEntry {
    pub fn for_kind(kind: BehaviorKind) -> Self {
        Self {
            kind,
            id: kind.id(),
            name: kind.name(),
            description: kind.description(),
            category: kind.category(),
            config_schema: kind.config_schema(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BehaviorRegistry {
    entries: Vec<RegistryEntry>,
}

impl BehaviorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in kind.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for kind in BehaviorKind::ALL {
            registry.register(RegistryEntry::for_kind(kind));
        }
        registry
    }

    /// Add an entry, replacing any entry with the same id.
    pub fn register(&mut self, entry: RegistryEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All entries in registration order.
    pub fn all(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn kinds(&self) -> impl Iterator<Item = BehaviorKind> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    pub fn by_category(&self, category: Category) -> Vec<&RegistryEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ORDER
    }

    /// Instantiate kind `id` for `owner`, merging `config` over the schema
    /// defaults. Unknown ids log a warning and yield `None`.
    pub fn create(
        &self,
        id: &str,
        owner: Owner,
        world: &World,
        config: &ConfigMap,
    ) -> Option<BehaviorInstance> {
        let Some(entry) = self.get(id) else {
            warn!("BehaviorRegistry: unknown behavior type '{}'", id);
            return None;
        };
        let merged = merge_config(entry.id, &entry.config_schema, config);
        Some(entry.kind.instantiate(owner, world, merged))
    }

    /// Schema defaults for `id`; empty for unknown ids.
    pub fn default_config(&self, id: &str) -> ConfigMap {
        self.get(id)
            .map(|entry| default_config(&entry.config_schema))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::behavior::Behavior;
    use crate::components::mapposition::MapPosition;
    use serde_json::json;

    #[test]
    fn test_builtin_catalog() {
        let registry = BehaviorRegistry::with_builtin();
        assert_eq!(registry.all().len(), BehaviorKind::ALL.len());
        let movement: Vec<&str> = registry
            .by_category(Category::Movement)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(movement, vec!["platform", "topdown"]);
        assert_eq!(registry.by_category(Category::AI).len(), 2);
        assert_eq!(registry.get("health").map(|e| e.name), Some("Health"));
    }

    #[test]
    fn test_default_config() {
        let registry = BehaviorRegistry::with_builtin();
        let defaults = registry.default_config("follow");
        assert_eq!(defaults["speed"], json!(80.0));
        assert_eq!(defaults["minDistance"], json!(32.0));
        assert_eq!(defaults["xOnly"], false);
        assert!(registry.default_config("nope").is_empty());
    }

    #[test]
    fn test_create_unknown_returns_none() {
        let mut world = World::new();
        let entity = world.spawn(MapPosition::new(0.0, 0.0)).id();
        let registry = BehaviorRegistry::with_builtin();
        let created = registry.create("teleport", Owner::new(entity, "a"), &world, &ConfigMap::new());
        assert!(created.is_none());
    }

    #[test]
    fn test_create_merges_config() {
        let mut world = World::new();
        let entity = world.spawn(MapPosition::new(0.0, 0.0)).id();
        let registry = BehaviorRegistry::with_builtin();
        let mut config = ConfigMap::new();
        config.insert("speed".to_string(), json!(320));
        let created = registry
            .create("topdown", Owner::new(entity, "hero"), &world, &config)
            .unwrap();
        assert_eq!(created.kind(), BehaviorKind::TopDown);
        assert_eq!(created.config()["speed"], 320);
        assert_eq!(created.config()["upKey"], "ArrowUp");
        assert!(created.enabled());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = BehaviorRegistry::with_builtin();
        let mut entry = RegistryEntry::for_kind(BehaviorKind::Patrol);
        entry.name = "Guard";
        registry.register(entry);
        assert_eq!(registry.all().len(), BehaviorKind::ALL.len());
        assert_eq!(registry.get("patrol").map(|e| e.name), Some("Guard"));
    }
}
