//! Round state and its transition events
//!
//! Flags only change through the setters below, and each setter reports an
//! event only when the flag actually flips. Callers get edge-triggered
//! notifications without tracking subscriptions.

use serde::{Deserialize, Serialize};

/// Phase derived from the round flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Round in progress
    Active,
    /// All enemies spawned and destroyed, waiting for the player to continue
    RoundWon,
    /// Run ended
    GameOver,
}

/// Notifications pushed to HUD/audio collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundEvent {
    LevelChanged { level: u32 },
    RoundWon { level: u32 },
    GameOver { rounds_survived: u32 },
    SceneCleared { bonus_awarded: u64, destroyed: usize },
    ScoreChanged { total: u64 },
    AmmoChanged { ammo: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundState {
    level: u32,
    round_won: bool,
    game_over: bool,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn round_won(&self) -> bool {
        self.round_won
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> RoundPhase {
        if self.game_over {
            RoundPhase::GameOver
        } else if self.round_won {
            RoundPhase::RoundWon
        } else {
            RoundPhase::Active
        }
    }

    /// Rounds the player got through before losing
    pub fn rounds_survived(&self) -> u32 {
        self.level.saturating_sub(1)
    }

    pub(crate) fn set_level(&mut self, level: u32) -> Option<RoundEvent> {
        if self.level == level {
            return None;
        }
        self.level = level;
        Some(RoundEvent::LevelChanged { level })
    }

    /// Raise or lower the round-won flag; ignored once the game is over
    pub(crate) fn set_round_won(&mut self, won: bool) -> Option<RoundEvent> {
        if self.game_over || self.round_won == won {
            return None;
        }
        self.round_won = won;
        won.then_some(RoundEvent::RoundWon { level: self.level })
    }

    /// Raise the game-over flag; it supersedes round-won and never lowers
    pub(crate) fn set_game_over(&mut self) -> Option<RoundEvent> {
        if self.game_over {
            return None;
        }
        self.game_over = true;
        self.round_won = false;
        Some(RoundEvent::GameOver {
            rounds_survived: self.rounds_survived(),
        })
    }
}
