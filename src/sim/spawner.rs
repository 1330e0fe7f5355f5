//! Per-kind spawner
//!
//! A spawner emits entities of one kind on a delay/rate/limit schedule. The
//! schedule lives in the shared [`Scheduler`]; the spawner only remembers the
//! id of its one pending entry.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{EntityHandle, EntityKind};
use super::scene::Scene;
use super::timer::{Scheduler, TimerId, secs};
use crate::spherical_to_cartesian;

/// Spherical shell around the player where a spawner places entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Elevation band in radians (0 = eye level)
    pub min_elevation: f32,
    pub max_elevation: f32,
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            min_distance: 8.0,
            max_distance: 14.0,
            min_elevation: -0.2,
            max_elevation: 0.6,
        }
    }
}

impl SpawnArea {
    /// Random point inside the shell
    pub fn sample(&self, rng: &mut impl Rng) -> glam::Vec3 {
        let distance = sample_range(rng, self.min_distance, self.max_distance);
        let elevation = sample_range(rng, self.min_elevation, self.max_elevation);
        let azimuth = rng.random_range(0.0..std::f32::consts::TAU);
        spherical_to_cartesian(distance, azimuth, elevation)
    }
}

fn sample_range(rng: &mut impl Rng, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if hi - lo <= f32::EPSILON {
        lo
    } else {
        rng.random_range(lo..hi)
    }
}

/// Spawn parameters for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnerConfig {
    pub kind: EntityKind,
    pub spawn_limit: u32,
    /// Seconds between spawns
    pub spawn_rate: f32,
    /// Seconds before the first spawn
    pub initial_delay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnerState {
    pub config: SpawnerConfig,
    pub spawned_count: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    state: SpawnerState,
    area: SpawnArea,
    pending: Option<TimerId>,
}

impl Spawner {
    pub fn new(kind: EntityKind, area: SpawnArea) -> Self {
        Self {
            state: SpawnerState {
                config: SpawnerConfig {
                    kind,
                    spawn_limit: 0,
                    spawn_rate: 1.0,
                    initial_delay: 0.0,
                },
                spawned_count: 0,
                is_active: false,
            },
            area,
            pending: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.state.config.kind
    }

    pub fn state(&self) -> &SpawnerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn spawned_count(&self) -> u32 {
        self.state.spawned_count
    }

    pub fn spawn_limit(&self) -> u32 {
        self.state.config.spawn_limit
    }

    /// Start a fresh spawning run
    ///
    /// Rejected (logged, nothing changes) when `limit < 0`, `rate <= 0` or
    /// `delay < 0`. Returns whether the run was accepted.
    pub fn start_spawning(
        &mut self,
        limit: i64,
        rate: f32,
        delay: f32,
        timers: &mut Scheduler<EntityKind>,
    ) -> bool {
        let kind = self.kind();
        if limit < 0 || !(rate.is_finite() && rate > 0.0) || !(delay.is_finite() && delay >= 0.0) {
            log::warn!(
                "Rejected spawner start for {:?}: limit={}, rate={}, delay={}",
                kind,
                limit,
                rate,
                delay
            );
            return false;
        }
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);

        self.cancel_pending(timers);
        self.state.config = SpawnerConfig {
            kind,
            spawn_limit: limit,
            spawn_rate: rate,
            initial_delay: delay,
        };
        self.state.spawned_count = 0;
        self.state.is_active = limit > 0;

        if self.state.is_active {
            self.pending = Some(timers.schedule_after(secs(delay), kind));
        }
        log::debug!(
            "Spawner {:?} started: limit={}, rate={:.2}s, delay={:.2}s",
            kind,
            limit,
            rate,
            delay
        );
        true
    }

    /// Stop spawning and drop the pending callback; safe to call repeatedly
    pub fn stop_spawning(&mut self, timers: &mut Scheduler<EntityKind>) {
        self.cancel_pending(timers);
        if self.state.is_active {
            log::debug!("Spawner {:?} stopped", self.kind());
        }
        self.state.is_active = false;
    }

    fn cancel_pending(&mut self, timers: &mut Scheduler<EntityKind>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }

    /// Run the callback for timer `id`
    ///
    /// Spawns one entity, then either schedules the next spawn one rate
    /// interval after this one was due or goes inactive at the limit.
    pub fn fire(
        &mut self,
        id: TimerId,
        scene: &mut Scene,
        rng: &mut impl Rng,
        timers: &mut Scheduler<EntityKind>,
    ) -> Option<EntityHandle> {
        if self.pending != Some(id) || !self.state.is_active {
            log::debug!("Ignoring stale spawn callback for {:?}", self.kind());
            return None;
        }
        self.pending = None;

        let position = self.area.sample(rng);
        let handle = scene.spawn(self.kind(), position);
        self.state.spawned_count += 1;

        if self.state.spawned_count >= self.state.config.spawn_limit {
            self.state.is_active = false;
            log::debug!(
                "Spawner {:?} reached its limit of {}",
                self.kind(),
                self.state.config.spawn_limit
            );
        } else {
            let interval = secs(self.state.config.spawn_rate).max(Duration::from_micros(1));
            let next = id.due().saturating_add(interval);
            self.pending = Some(timers.schedule_at(next, self.kind()));
        }
        Some(handle)
    }
}
