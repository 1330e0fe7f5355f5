//! Per-level spawn patterns
//!
//! `level` is the round number after the level-advance increment (1-based).

use serde::Serialize;

use super::entity::SpawnerRole;
use crate::consts::MIN_SPAWN_RATE;

/// Parameters handed to `Spawner::start_spawning` for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnPattern {
    pub limit: u32,
    /// Seconds between spawns, never below [`MIN_SPAWN_RATE`]
    pub rate: f32,
    pub delay: f32,
}

/// Spawn pattern for a role at a given level
///
/// `None` when the spawn limit for `level` does not fit in a `u32`.
pub fn spawn_pattern(role: SpawnerRole, level: u32) -> Option<SpawnPattern> {
    let l = level as f32;
    let (limit, rate, delay) = match role {
        SpawnerRole::FastMelee => (level.checked_mul(4)?.checked_add(8)?, 3.0 - 0.1 * l, 3.0),
        SpawnerRole::Ranged => (level.checked_mul(3)?.checked_add(6)?, 3.0 - 0.1 * l, 4.0),
        SpawnerRole::Bonus => (level.checked_add(2)?, 3.0 + 0.5 * l, 10.0),
    };
    Some(SpawnPattern {
        limit,
        rate: rate.max(MIN_SPAWN_RATE),
        delay,
    })
}
