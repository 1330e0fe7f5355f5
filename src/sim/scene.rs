//! Live spawned entities
//!
//! The scene is the only place that calls the registry, which keeps the
//! counters and the set of live handles in lockstep.

use std::collections::BTreeMap;

use glam::Vec3;

use super::entity::{EntityFactory, EntityHandle, EntityKind};
use super::registry::SpawnableRegistry;

/// A spawned entity as far as the simulation cares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnedEntity {
    pub kind: EntityKind,
    pub position: Vec3,
}

pub struct Scene {
    factory: Box<dyn EntityFactory>,
    registry: SpawnableRegistry,
    /// Live entities (sorted by handle for determinism)
    live: BTreeMap<EntityHandle, SpawnedEntity>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("registry", &self.registry)
            .field("live", &self.live.len())
            .finish()
    }
}

impl Scene {
    pub fn new(factory: Box<dyn EntityFactory>) -> Self {
        Self {
            factory,
            registry: SpawnableRegistry::new(),
            live: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &SpawnableRegistry {
        &self.registry
    }

    pub fn spawn(&mut self, kind: EntityKind, position: Vec3) -> EntityHandle {
        let handle = self.factory.spawn(kind, position);
        if let Some(previous) = self.live.insert(handle, SpawnedEntity { kind, position }) {
            // Factory reused a live handle; forget the old one so counts stay balanced
            log::warn!("Factory reused live handle {:?} ({:?})", handle, previous.kind);
            self.registry.decrement(previous.kind);
        }
        self.registry.increment(kind);
        handle
    }

    /// Remove an entity; a second call for the same handle is a no-op
    pub fn destroy(&mut self, handle: EntityHandle) -> Option<SpawnedEntity> {
        let entity = self.live.remove(&handle)?;
        self.factory.destroy(handle);
        self.registry.decrement(entity.kind);
        Some(entity)
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&SpawnedEntity> {
        self.live.get(&handle)
    }

    /// Live handles of one kind, in handle order
    pub fn handles_of(&self, kind: EntityKind) -> Vec<EntityHandle> {
        self.live
            .iter()
            .filter(|(_, e)| e.kind == kind)
            .map(|(h, _)| *h)
            .collect()
    }

    pub fn handles(&self) -> Vec<EntityHandle> {
        self.live.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Destroy every live entity, returning how many were removed
    pub fn destroy_all(&mut self) -> usize {
        let handles = self.handles();
        handles
            .into_iter()
            .filter_map(|h| self.destroy(h))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::HeadlessFactory;

    #[test]
    fn test_spawn_and_destroy_balance_counts() {
        let mut scene = Scene::new(Box::new(HeadlessFactory::new()));
        let a = scene.spawn(EntityKind::Drone, Vec3::X);
        let _b = scene.spawn(EntityKind::Drone, Vec3::Y);
        assert_eq!(scene.registry().active_count_of(EntityKind::Drone), 2);

        assert!(scene.destroy(a).is_some());
        assert_eq!(scene.registry().active_count_of(EntityKind::Drone), 1);
    }

    #[test]
    fn test_double_destroy_does_not_double_decrement() {
        let mut scene = Scene::new(Box::new(HeadlessFactory::new()));
        let a = scene.spawn(EntityKind::Crasher, Vec3::ZERO);
        assert!(scene.destroy(a).is_some());
        assert!(scene.destroy(a).is_none());
        assert_eq!(scene.registry().active_count_of(EntityKind::Crasher), 0);
    }

    #[test]
    fn test_destroy_all() {
        let mut scene = Scene::new(Box::new(HeadlessFactory::new()));
        for kind in EntityKind::ALL {
            scene.spawn(kind, Vec3::ZERO);
        }
        assert_eq!(scene.destroy_all(), 4);
        assert!(scene.is_empty());
        assert_eq!(scene.registry().total(), 0);
    }
}
