//! Player ammo and health

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    ammo: u32,
    health: i32,
}

impl Player {
    pub fn new(ammo: u32) -> Self {
        Self {
            ammo,
            health: PLAYER_STARTING_HEALTH,
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Spend one round of ammo; false when the magazine is empty
    pub fn take_shot(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount);
    }

    /// Apply damage (negative heals), clamped to [0, max]
    pub fn damage(&mut self, amount: i32) {
        self.health = self
            .health
            .saturating_sub(amount)
            .clamp(0, PLAYER_MAX_HEALTH);
    }
}
