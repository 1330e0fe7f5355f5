//! Round orchestrator
//!
//! Owns the spawner table, the timer queue, the scene, the score and the
//! player. Each tick runs every spawn callback that is due, then evaluates
//! the win/loss conditions exactly once. Terminal transitions clear the scene
//! on the spot, so teardown has always finished before the next
//! `advance_level` can start spawners again.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entity::{DestroyCause, EntityFactory, EntityHandle, EntityKind};
use super::player::Player;
use super::policy::{SpawnPattern, spawn_pattern};
use super::round::{RoundEvent, RoundPhase, RoundState};
use super::scene::Scene;
use super::spawner::{SpawnArea, Spawner, SpawnerState};
use super::timer::{Scheduler, secs};
use crate::consts::*;
use crate::error::GameError;
use crate::score::ScoreLedger;

/// Static description of the spawners for a session
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub spawners: Vec<(EntityKind, SpawnArea)>,
    pub starting_ammo: u32,
    pub seed: u64,
}

/// Serializable view for debug overlays and logs
#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub round: RoundState,
    pub score: u64,
    pub player: Player,
    pub elapsed_secs: f32,
    pub active_counts: BTreeMap<EntityKind, u32>,
    pub spawners: Vec<SpawnerState>,
}

pub struct RoundOrchestrator {
    round: RoundState,
    spawners: BTreeMap<EntityKind, Spawner>,
    timers: Scheduler<EntityKind>,
    scene: Scene,
    score: ScoreLedger,
    player: Player,
    rng: Pcg32,
    events: Vec<RoundEvent>,
}

impl std::fmt::Debug for RoundOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundOrchestrator")
            .field("round", &self.round)
            .field("spawners", &self.spawners)
            .field("scene", &self.scene)
            .field("score", &self.score)
            .field("player", &self.player)
            .finish()
    }
}

impl RoundOrchestrator {
    /// Build the spawner table; fails on an empty or duplicated setup
    pub fn new(setup: RoundSetup, factory: Box<dyn EntityFactory>) -> Result<Self, GameError> {
        if setup.spawners.is_empty() {
            return Err(GameError::NoSpawners);
        }

        let mut spawners = BTreeMap::new();
        for (kind, area) in setup.spawners {
            if spawners.insert(kind, Spawner::new(kind, area)).is_some() {
                return Err(GameError::DuplicateSpawner(kind));
            }
            log::debug!("Found spawner of type {:?}", kind);
        }

        Ok(Self {
            round: RoundState::new(),
            spawners,
            timers: Scheduler::new(),
            scene: Scene::new(factory),
            score: ScoreLedger::new(),
            player: Player::new(setup.starting_ammo),
            rng: Pcg32::seed_from_u64(setup.seed),
            events: Vec::new(),
        })
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    pub fn level(&self) -> u32 {
        self.round.level()
    }

    pub fn score(&self) -> &ScoreLedger {
        &self.score
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn spawner(&self, kind: EntityKind) -> Option<&Spawner> {
        self.spawners.get(&kind)
    }

    pub fn spawners(&self) -> impl Iterator<Item = &Spawner> {
        self.spawners.values()
    }

    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: Option<RoundEvent>) {
        if let Some(event) = event {
            self.events.push(event);
        }
    }

    /// Skip ahead to `starting_level` (applied once, before the first advance)
    ///
    /// Every skipped level grants extra ammo.
    pub fn apply_starting_level(&mut self, starting_level: u32) {
        if starting_level == 0 {
            return;
        }
        let skipped = starting_level - 1;
        let event = self.round.set_level(skipped);
        self.emit(event);
        self.grant_ammo(skipped.saturating_mul(AMMO_PER_SKIPPED_LEVEL));
        log::info!("Starting at level {}", starting_level);
    }

    pub fn grant_ammo(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.player.add_ammo(amount);
        self.events.push(RoundEvent::AmmoChanged {
            ammo: self.player.ammo(),
        });
    }

    /// Start the next round
    ///
    /// Patterns for every spawner are resolved before anything changes, so a
    /// spawner without a scaling policy, or a level whose spawn limits do not
    /// fit, fails the call with the state intact.
    pub fn advance_level(&mut self) -> Result<(), GameError> {
        if self.round.game_over() {
            return Err(GameError::SessionOver);
        }
        let level = self
            .round
            .level()
            .checked_add(1)
            .ok_or(GameError::LevelOutOfRange(self.round.level()))?;

        let patterns = self
            .spawners
            .keys()
            .map(|&kind| -> Result<(EntityKind, SpawnPattern), GameError> {
                let role = kind.role().ok_or(GameError::UnrecognizedSpawner(kind))?;
                let pattern = spawn_pattern(role, level).ok_or(GameError::LevelOutOfRange(level))?;
                Ok((kind, pattern))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let event = self.round.set_level(level);
        self.emit(event);
        log::info!("Advancing to level {}", level);

        for (kind, pattern) in patterns {
            if let Some(spawner) = self.spawners.get_mut(&kind) {
                spawner.start_spawning(
                    i64::from(pattern.limit),
                    pattern.rate,
                    pattern.delay,
                    &mut self.timers,
                );
            }
        }

        let event = self.round.set_round_won(false);
        self.emit(event);
        Ok(())
    }

    /// Advance simulated time by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite tick of {}s", dt);
            return;
        }
        self.timers.advance(secs(dt));
        self.run_due_spawns();
        self.evaluate();
    }

    fn run_due_spawns(&mut self) {
        while let Some((id, kind)) = self.timers.pop_due() {
            let Some(spawner) = self.spawners.get_mut(&kind) else {
                continue;
            };
            if let Some(handle) = spawner.fire(id, &mut self.scene, &mut self.rng, &mut self.timers) {
                log::debug!(
                    "Spawned {:?} {:?} ({}/{})",
                    kind,
                    handle,
                    spawner.spawned_count(),
                    spawner.spawn_limit()
                );
            }
        }
    }

    /// Check win/loss once; returns the phase entered on a transition
    pub fn evaluate(&mut self) -> Option<RoundPhase> {
        if self.round.phase() != RoundPhase::Active {
            return None;
        }

        let registry = self.scene.registry();
        let enemies = registry.aggregate(EntityKind::is_enemy);
        let bullets = registry.active_count_of(EntityKind::Bullet);
        let spawners_stopped = self
            .spawners
            .values()
            .filter(|s| s.kind().is_enemy())
            .all(|s| !s.is_active());

        if spawners_stopped && enemies == 0 {
            let event = self.round.set_round_won(true);
            self.emit(event);
            log::info!("Round {} won", self.round.level());
            self.clear_scene();
            Some(RoundPhase::RoundWon)
        } else if enemies > 0 && bullets == 0 && self.player.ammo() == 0 {
            log::info!("Player defeated: {} enemies left and no ammo", enemies);
            self.end_game();
            Some(RoundPhase::GameOver)
        } else {
            None
        }
    }

    fn end_game(&mut self) {
        let event = self.round.set_game_over();
        if event.is_some() {
            self.emit(event);
            self.clear_scene();
        }
    }

    /// Stop all spawners and destroy every spawned entity
    ///
    /// After a won round the capsules still in the scene are paid out before
    /// they are destroyed.
    pub fn clear_scene(&mut self) {
        log::debug!("Clearing scene...");
        for spawner in self.spawners.values_mut() {
            spawner.stop_spawning(&mut self.timers);
        }

        let mut bonus_awarded = 0;
        if self.round.round_won() {
            let capsules = self.scene.handles_of(EntityKind::Capsule);
            bonus_awarded = capsules.len() as u64 * CAPSULE_BONUS_POINTS;
            if bonus_awarded > 0 {
                self.add_score(bonus_awarded);
            }
            for handle in capsules {
                self.scene.destroy(handle);
            }
        }

        let destroyed = self.scene.destroy_all();
        self.events.push(RoundEvent::SceneCleared {
            bonus_awarded,
            destroyed,
        });
        log::debug!("Scene cleared ({} destroyed, bonus {})", destroyed, bonus_awarded);
    }

    fn add_score(&mut self, points: u64) {
        let total = self
            .score
            .add_score(i64::try_from(points).unwrap_or(i64::MAX));
        self.events.push(RoundEvent::ScoreChanged { total });
    }

    /// Fire one bullet; None when out of ammo or the game is over
    pub fn shoot(&mut self) -> Option<EntityHandle> {
        if self.round.game_over() || !self.player.take_shot() {
            return None;
        }
        self.events.push(RoundEvent::AmmoChanged {
            ammo: self.player.ammo(),
        });
        Some(self.scene.spawn(EntityKind::Bullet, glam::Vec3::ZERO))
    }

    /// Remove an entity from play
    ///
    /// Kills and pickups score unless the game is already over. Unknown or
    /// already destroyed handles are ignored.
    pub fn destroy(&mut self, handle: EntityHandle, cause: DestroyCause) -> Option<EntityKind> {
        let entity = self.scene.destroy(handle)?;
        let scores = match cause {
            DestroyCause::Killed => entity.kind.is_enemy() || entity.kind.is_bonus(),
            DestroyCause::Collected => entity.kind.is_bonus(),
            DestroyCause::Expired => false,
        };
        if scores && !self.round.game_over() {
            self.add_score(entity.kind.points_value());
        }
        Some(entity.kind)
    }

    /// Hurt the player (negative heals); dying ends the game
    pub fn damage_player(&mut self, amount: i32) {
        self.player.damage(amount);
        if self.player.is_dead() && !self.round.game_over() {
            log::info!("Player killed");
            self.end_game();
        }
    }

    /// Application shutdown: end the game and tear the scene down
    pub fn quit(&mut self) {
        if self.round.game_over() {
            return;
        }
        self.end_game();
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.round.phase(),
            round: self.round.clone(),
            score: self.score.total(),
            player: self.player.clone(),
            elapsed_secs: self.timers.now().as_secs_f32(),
            active_counts: EntityKind::ALL
                .iter()
                .map(|&k| (k, self.scene.registry().active_count_of(k)))
                .collect(),
            spawners: self.spawners.values().map(|s| *s.state()).collect(),
        }
    }
}
