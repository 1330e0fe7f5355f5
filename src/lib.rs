//! ShootAR - round lifecycle engine for an augmented-reality shooter
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (spawners, counters, round state machine)
//! - `session`: Wires settings, platform probe, HUD and audio to the simulation
//! - `platform`: Device capability probing
//! - `settings`: Data-driven session configuration
//! - `score`: Score ledger
//! - `ui` / `audio`: Push-only presentation sinks

pub mod audio;
pub mod error;
pub mod platform;
pub mod score;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::GameError;
pub use score::ScoreLedger;
pub use session::{FireOutcome, GameSession};
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz fixed update)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Spawn rates never go below this many seconds between spawns
    pub const MIN_SPAWN_RATE: f32 = 0.25;

    /// Points per capsule still floating around when a round is won
    pub const CAPSULE_BONUS_POINTS: u64 = 50;
    /// Points for shooting down a crasher
    pub const CRASHER_POINTS: u64 = 20;
    /// Points for shooting down a drone
    pub const DRONE_POINTS: u64 = 30;

    /// Ammo granted when the player continues to the next round
    pub const AMMO_PER_ROUND: u32 = 6;
    /// Extra starting ammo per level skipped via the starting-level override
    pub const AMMO_PER_SKIPPED_LEVEL: u32 = 15;

    /// Player health bounds
    pub const PLAYER_MAX_HEALTH: i32 = 6;
    pub const PLAYER_STARTING_HEALTH: i32 = 3;
}

/// Convert spherical (distance, azimuth, elevation) to cartesian, y up
#[inline]
pub fn spherical_to_cartesian(distance: f32, azimuth: f32, elevation: f32) -> Vec3 {
    let horizontal = distance * elevation.cos();
    Vec3::new(
        horizontal * azimuth.cos(),
        distance * elevation.sin(),
        horizontal * azimuth.sin(),
    )
}
