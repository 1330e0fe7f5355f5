//! Audio sink
//!
//! The simulation only says which cue to play; mixing and playback belong to
//! whoever implements [`AudioSink`].

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round cleared (victory jingle)
    RoundClear,
    /// Player defeated
    GameOver,
    /// Bullet fired
    Shot,
    /// Trigger pulled with an empty magazine
    DryFire,
}

impl SoundEffect {
    /// Playback volume scale (0.0 - 1.0)
    pub fn volume(self) -> f32 {
        match self {
            SoundEffect::RoundClear => 0.7,
            SoundEffect::GameOver => 0.8,
            SoundEffect::Shot => 0.5,
            SoundEffect::DryFire => 0.3,
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Audio disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("(silent) {:?} at volume {:.1}", effect, effect.volume());
    }
}
