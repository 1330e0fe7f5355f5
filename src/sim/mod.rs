//! Deterministic round simulation
//!
//! All gameplay bookkeeping lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawners by kind, entities by handle)
//! - No rendering, audio or platform dependencies

pub mod entity;
pub mod orchestrator;
pub mod player;
pub mod policy;
pub mod registry;
pub mod round;
pub mod scene;
pub mod spawner;
pub mod timer;

pub use entity::{DestroyCause, EntityFactory, EntityHandle, EntityKind, HeadlessFactory, SpawnerRole};
pub use orchestrator::{RoundOrchestrator, RoundSetup, RoundSnapshot};
pub use player::Player;
pub use policy::{SpawnPattern, spawn_pattern};
pub use registry::SpawnableRegistry;
pub use round::{RoundEvent, RoundPhase, RoundState};
pub use scene::{Scene, SpawnedEntity};
pub use spawner::{SpawnArea, Spawner, SpawnerConfig, SpawnerState};
pub use timer::{Scheduler, TimerId};
