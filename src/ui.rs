//! HUD sink
//!
//! Push-only: the session tells the HUD what changed and never reads back.

use crate::sim::RoundEvent;

pub const ROUND_CLEAR_TEXT: &str = "Round Clear!";
pub const CONTINUE_TEXT: &str = "Tap to continue";

/// Message shown when the run ends
pub fn game_over_text(rounds_survived: u32) -> String {
    format!("Game Over\n\nRounds Survived : {rounds_survived}")
}

pub trait Hud {
    /// Raw round event, for HUDs that animate transitions
    fn on_event(&mut self, _event: &RoundEvent) {}
    fn set_message(&mut self, text: &str);
    fn set_button_text(&mut self, text: &str);
    fn set_ammo(&mut self, ammo: u32);
    fn set_score(&mut self, score: u64);
    fn set_level(&mut self, level: u32);
}

/// HUD that writes everything to the log
#[derive(Debug, Default)]
pub struct LogHud;

impl Hud for LogHud {
    fn set_message(&mut self, text: &str) {
        if !text.is_empty() {
            log::info!("[hud] {}", text.replace('\n', " "));
        }
    }

    fn set_button_text(&mut self, text: &str) {
        if !text.is_empty() {
            log::info!("[hud button] {}", text);
        }
    }

    fn set_ammo(&mut self, ammo: u32) {
        log::debug!("[hud] ammo {}", ammo);
    }

    fn set_score(&mut self, score: u64) {
        log::info!("[hud] Score: {}", score);
    }

    fn set_level(&mut self, level: u32) {
        log::info!("[hud] Round {}", level);
    }
}
