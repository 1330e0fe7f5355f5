//! Session and configuration errors
//!
//! Registry underflow is deliberately absent: it is clamped and logged by the
//! registry instead of interrupting the round loop.

use thiserror::Error;

use crate::sim::EntityKind;

/// Errors surfaced while setting up or advancing a session
#[derive(Debug, Error)]
pub enum GameError {
    /// A spawner was registered for a kind with no scaling policy
    #[error("unrecognised type of spawner: {0:?}")]
    UnrecognizedSpawner(EntityKind),
    /// Two spawners were registered for the same kind
    #[error("spawner for {0:?} registered twice")]
    DuplicateSpawner(EntityKind),
    /// The level is past the point where spawn limits can be represented
    #[error("level {0} is out of range")]
    LevelOutOfRange(u32),
    /// Session setup found nothing to spawn
    #[error("could not find spawners")]
    NoSpawners,
    /// Settings file could not be read
    #[error("could not read settings: {0}")]
    SettingsIo(#[from] std::io::Error),
    /// Settings file could not be parsed
    #[error("could not parse settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
    /// Required hardware is missing; the user has to fix their environment
    #[error("{0}")]
    DeviceUnavailable(&'static str),
    /// The game is over; a new session is required
    #[error("game is over, start a new session")]
    SessionOver,
}

impl GameError {
    /// Configuration errors indicate a setup bug rather than a runtime condition
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GameError::UnrecognizedSpawner(_)
                | GameError::DuplicateSpawner(_)
                | GameError::NoSpawners
                | GameError::LevelOutOfRange(_)
                | GameError::SettingsIo(_)
                | GameError::InvalidSettings(_)
        )
    }
}
