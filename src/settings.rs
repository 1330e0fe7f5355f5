//! Session settings
//!
//! Loaded from a JSON file next to the binary; anything missing falls back to
//! the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sim::{EntityKind, RoundSetup, SpawnArea};

/// One spawner entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerSettings {
    pub kind: EntityKind,
    #[serde(default)]
    pub area: SpawnArea,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level to start at (0 or 1 = from the beginning)
    pub starting_level: u32,
    /// Seed for spawn positions
    pub seed: u64,
    /// Ammo before any starting-level bonus
    pub starting_ammo: u32,
    /// Spawners present in the scene
    pub spawners: Vec<SpawnerSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_level: 0,
            seed: 42,
            starting_ammo: 30,
            spawners: vec![
                SpawnerSettings {
                    kind: EntityKind::Crasher,
                    area: SpawnArea::default(),
                },
                SpawnerSettings {
                    kind: EntityKind::Drone,
                    area: SpawnArea {
                        min_distance: 10.0,
                        max_distance: 18.0,
                        min_elevation: 0.1,
                        max_elevation: 0.9,
                    },
                },
                SpawnerSettings {
                    kind: EntityKind::Capsule,
                    area: SpawnArea {
                        min_distance: 4.0,
                        max_distance: 8.0,
                        min_elevation: -0.1,
                        max_elevation: 0.4,
                    },
                },
            ],
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        log::info!(
            "Loaded settings: starting level {}, {} spawners",
            settings.starting_level,
            settings.spawners.len()
        );
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Spawner table and seed for the orchestrator
    pub fn round_setup(&self) -> RoundSetup {
        RoundSetup {
            spawners: self.spawners.iter().map(|s| (s.kind, s.area)).collect(),
            starting_ammo: self.starting_ammo,
            seed: self.seed,
        }
    }
}
