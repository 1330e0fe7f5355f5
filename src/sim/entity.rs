//! Spawnable entity kinds and the factory seam
//!
//! The simulation only tracks lifecycles. Whatever draws or moves the
//! entities sits behind [`EntityFactory`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Everything that can be spawned into the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Fast melee enemy that rams the player
    Crasher,
    /// Flying enemy that shoots from range
    Drone,
    /// Bonus pickup
    Capsule,
    /// Player shot
    Bullet,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Crasher,
        EntityKind::Drone,
        EntityKind::Capsule,
        EntityKind::Bullet,
    ];

    /// Counts toward "enemies still alive"
    pub fn is_enemy(self) -> bool {
        matches!(self, EntityKind::Crasher | EntityKind::Drone)
    }

    /// Left-over instances are paid out when a round is won
    pub fn is_bonus(self) -> bool {
        self == EntityKind::Capsule
    }

    /// Points awarded when the player destroys one
    pub fn points_value(self) -> u64 {
        match self {
            EntityKind::Crasher => CRASHER_POINTS,
            EntityKind::Drone => DRONE_POINTS,
            EntityKind::Capsule => CAPSULE_BONUS_POINTS,
            EntityKind::Bullet => 0,
        }
    }

    /// Spawner role driving the per-level scaling, if this kind can have a spawner
    pub fn role(self) -> Option<SpawnerRole> {
        match self {
            EntityKind::Crasher => Some(SpawnerRole::FastMelee),
            EntityKind::Drone => Some(SpawnerRole::Ranged),
            EntityKind::Capsule => Some(SpawnerRole::Bonus),
            EntityKind::Bullet => None,
        }
    }
}

/// Scaling roles for spawners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnerRole {
    FastMelee,
    Ranged,
    Bonus,
}

/// Opaque handle returned by the entity factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Why an entity left the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyCause {
    /// Shot down by the player
    Killed,
    /// Picked up by the player
    Collected,
    /// Timed out or flew off without effect
    Expired,
}

/// External creation/destruction of the visual game objects
pub trait EntityFactory {
    /// Create an entity of `kind` at `position` (player at the origin)
    fn spawn(&mut self, kind: EntityKind, position: Vec3) -> EntityHandle;
    /// Tear down the entity behind `handle`
    fn destroy(&mut self, handle: EntityHandle);
}

/// Factory without any presentation: hands out sequential ids
#[derive(Debug, Default)]
pub struct HeadlessFactory {
    next_id: u64,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }
}

impl EntityFactory for HeadlessFactory {
    fn spawn(&mut self, _kind: EntityKind, _position: Vec3) -> EntityHandle {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        EntityHandle(id)
    }

    fn destroy(&mut self, _handle: EntityHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let enemies: Vec<_> = EntityKind::ALL.iter().filter(|k| k.is_enemy()).collect();
        assert_eq!(enemies, vec![&EntityKind::Crasher, &EntityKind::Drone]);
        assert!(EntityKind::Capsule.is_bonus());
        assert!(!EntityKind::Bullet.is_bonus());
    }

    #[test]
    fn test_bullet_has_no_role() {
        assert_eq!(EntityKind::Bullet.role(), None);
        assert_eq!(EntityKind::Drone.role(), Some(SpawnerRole::Ranged));
    }

    #[test]
    fn test_headless_ids_unique() {
        let mut factory = HeadlessFactory::default();
        let a = factory.spawn(EntityKind::Crasher, Vec3::ZERO);
        let b = factory.spawn(EntityKind::Crasher, Vec3::ZERO);
        assert_ne!(a, b);
        assert_eq!(a, EntityHandle(1));
    }
}
