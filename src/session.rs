//! Game session
//!
//! Owns the orchestrator plus the presentation sinks, runs the fixed-step
//! accumulator and implements the single fire/continue button.

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::error::GameError;
use crate::platform::{Platform, probe};
use crate::settings::Settings;
use crate::sim::{
    DestroyCause, EntityFactory, EntityHandle, EntityKind, RoundEvent, RoundOrchestrator, RoundPhase,
    RoundSnapshot,
};
use crate::ui::{self, Hud};

/// What a press of the fire button did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A bullet left the barrel
    Fired(EntityHandle),
    /// Magazine empty, nothing happened
    OutOfAmmo,
    /// Round was won; the next one has started
    NextRound,
    /// Game is over; the caller should tear down and start a new session
    Restart,
}

pub struct GameSession {
    orchestrator: RoundOrchestrator,
    hud: Box<dyn Hud>,
    audio: Box<dyn AudioSink>,
    accumulator: f32,
}

impl GameSession {
    /// Probe the device, build the spawners and start the first round
    ///
    /// Any failure is shown on the HUD before it is returned.
    pub fn start(
        settings: &Settings,
        platform: &dyn Platform,
        factory: Box<dyn EntityFactory>,
        mut hud: Box<dyn Hud>,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, GameError> {
        let setup = probe(platform).and_then(|()| {
            let mut orchestrator = RoundOrchestrator::new(settings.round_setup(), factory)?;
            orchestrator.apply_starting_level(settings.starting_level);
            orchestrator.advance_level()?;
            Ok(orchestrator)
        });

        let orchestrator = match setup {
            Ok(orchestrator) => orchestrator,
            Err(err) => {
                log::error!("Session setup failed: {}", err);
                hud.set_message(&err.to_string());
                return Err(err);
            }
        };

        hud.set_message("");
        hud.set_button_text("");
        hud.set_ammo(orchestrator.player().ammo());
        hud.set_score(orchestrator.score().total());

        let mut session = Self {
            orchestrator,
            hud,
            audio,
            accumulator: 0.0,
        };
        session.dispatch_events();
        Ok(session)
    }

    pub fn orchestrator(&self) -> &RoundOrchestrator {
        &self.orchestrator
    }

    pub fn phase(&self) -> RoundPhase {
        self.orchestrator.phase()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        self.orchestrator.snapshot()
    }

    /// Run as many fixed ticks as `frame_dt` covers; returns ticks run
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", frame_dt);
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.orchestrator.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.dispatch_events();
        substeps
    }

    /// The one on-screen button: shoot, continue, or restart
    pub fn press_fire(&mut self) -> Result<FireOutcome, GameError> {
        let outcome = match self.orchestrator.phase() {
            RoundPhase::GameOver => FireOutcome::Restart,
            RoundPhase::RoundWon => {
                self.hud.set_message("");
                self.hud.set_button_text("");
                self.orchestrator.grant_ammo(AMMO_PER_ROUND);
                self.orchestrator.advance_level()?;
                FireOutcome::NextRound
            }
            RoundPhase::Active => match self.orchestrator.shoot() {
                Some(bullet) => {
                    self.audio.play(SoundEffect::Shot);
                    FireOutcome::Fired(bullet)
                }
                None => {
                    self.audio.play(SoundEffect::DryFire);
                    FireOutcome::OutOfAmmo
                }
            },
        };
        self.dispatch_events();
        Ok(outcome)
    }

    /// Report an entity leaving play (hit, pickup, expiry)
    pub fn destroy(&mut self, handle: EntityHandle, cause: DestroyCause) -> Option<EntityKind> {
        let kind = self.orchestrator.destroy(handle, cause);
        self.dispatch_events();
        kind
    }

    pub fn damage_player(&mut self, amount: i32) {
        self.orchestrator.damage_player(amount);
        self.dispatch_events();
    }

    /// Application is closing
    pub fn quit(&mut self) {
        self.orchestrator.quit();
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.orchestrator.drain_events() {
            self.hud.on_event(&event);
            match event {
                RoundEvent::LevelChanged { level } => self.hud.set_level(level),
                RoundEvent::RoundWon { .. } => {
                    self.hud.set_message(ui::ROUND_CLEAR_TEXT);
                    self.audio.play(SoundEffect::RoundClear);
                }
                RoundEvent::GameOver { rounds_survived } => {
                    self.hud.set_message(&ui::game_over_text(rounds_survived));
                    self.audio.play(SoundEffect::GameOver);
                }
                RoundEvent::SceneCleared { .. } => self.hud.set_button_text(ui::CONTINUE_TEXT),
                RoundEvent::ScoreChanged { total } => self.hud.set_score(total),
                RoundEvent::AmmoChanged { ammo } => self.hud.set_ammo(ammo),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::platform::HeadlessPlatform;
    use crate::settings::SpawnerSettings;
    use crate::sim::{HeadlessFactory, SpawnArea};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Screen {
        message: String,
        button: String,
        ammo: u32,
        score: u64,
        level: u32,
        events: Vec<RoundEvent>,
        sounds: Vec<SoundEffect>,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Screen>>);

    impl Hud for Recorder {
        fn on_event(&mut self, event: &RoundEvent) {
            self.0.borrow_mut().events.push(*event);
        }
        fn set_message(&mut self, text: &str) {
            self.0.borrow_mut().message = text.to_string();
        }
        fn set_button_text(&mut self, text: &str) {
            self.0.borrow_mut().button = text.to_string();
        }
        fn set_ammo(&mut self, ammo: u32) {
            self.0.borrow_mut().ammo = ammo;
        }
        fn set_score(&mut self, score: u64) {
            self.0.borrow_mut().score = score;
        }
        fn set_level(&mut self, level: u32) {
            self.0.borrow_mut().level = level;
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.borrow_mut().sounds.push(effect);
        }
    }

    struct Broken;

    impl Platform for Broken {
        fn has_rear_camera(&self) -> bool {
            true
        }
        fn has_gyroscope(&self) -> bool {
            false
        }
    }

    fn crasher_only(ammo: u32) -> Settings {
        Settings {
            starting_ammo: ammo,
            spawners: vec![SpawnerSettings {
                kind: EntityKind::Crasher,
                area: SpawnArea::default(),
            }],
            ..Settings::default()
        }
    }

    fn start(settings: &Settings) -> (GameSession, Recorder) {
        let recorder = Recorder::default();
        let session = GameSession::start(
            settings,
            &HeadlessPlatform,
            Box::new(HeadlessFactory::new()),
            Box::new(recorder.clone()),
            Box::new(recorder.clone()),
        )
        .expect("session starts");
        (session, recorder)
    }

    /// Run frames until `done` or the time budget runs out
    fn run_until(session: &mut GameSession, seconds: f32, done: impl Fn(&GameSession) -> bool) {
        let frames = (seconds / (1.0 / 60.0)) as u32;
        for _ in 0..frames {
            if done(session) {
                return;
            }
            session.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_start_shows_first_round() {
        let (session, screen) = start(&Settings::default());
        let screen = screen.0.borrow();
        assert_eq!(session.orchestrator().level(), 1);
        assert_eq!(screen.level, 1);
        assert_eq!(screen.ammo, 30);
        assert_eq!(screen.message, "");
    }

    #[test]
    fn test_missing_device_shown_on_hud() {
        let recorder = Recorder::default();
        let result = GameSession::start(
            &Settings::default(),
            &Broken,
            Box::new(HeadlessFactory::new()),
            Box::new(recorder.clone()),
            Box::new(SilentAudio),
        );
        assert!(matches!(result, Err(GameError::DeviceUnavailable(_))));
        assert_eq!(recorder.0.borrow().message, "This device does not have Gyroscope");
    }

    #[test]
    fn test_no_spawners_is_configuration_error() {
        let settings = Settings {
            spawners: Vec::new(),
            ..Settings::default()
        };
        let recorder = Recorder::default();
        let err = GameSession::start(
            &settings,
            &HeadlessPlatform,
            Box::new(HeadlessFactory::new()),
            Box::new(recorder.clone()),
            Box::new(recorder.clone()),
        )
        .err()
        .expect("setup fails");
        assert!(err.is_configuration());
        assert_eq!(recorder.0.borrow().message, "could not find spawners");
    }

    #[test]
    fn test_fixed_step_substeps_capped() {
        let (mut session, _screen) = start(&Settings::default());
        assert_eq!(session.update(SIM_DT * 2.5), 2);
        assert_eq!(session.update(5.0), 5);
    }

    #[test]
    fn test_non_finite_frame_keeps_clock_running() {
        let (mut session, _screen) = start(&Settings::default());
        assert_eq!(session.update(f32::NAN), 0);
        assert_eq!(session.update(f32::INFINITY), 0);
        assert_eq!(session.update(SIM_DT * 1.5), 1);
        assert_eq!(session.orchestrator().elapsed(), crate::sim::timer::secs(SIM_DT));
    }

    #[test]
    fn test_win_continue_cycle() {
        let (mut session, screen) = start(&crasher_only(100));

        // Shoot down every crasher as it appears
        let mut guard = 0;
        while session.phase() == RoundPhase::Active && guard < 10_000 {
            session.update(1.0 / 60.0);
            for handle in session.orchestrator().scene().handles_of(EntityKind::Crasher) {
                session.destroy(handle, DestroyCause::Killed);
            }
            guard += 1;
        }
        assert_eq!(session.phase(), RoundPhase::RoundWon);
        {
            let screen = screen.0.borrow();
            assert_eq!(screen.message, ui::ROUND_CLEAR_TEXT);
            assert_eq!(screen.button, ui::CONTINUE_TEXT);
            assert_eq!(screen.score, 12 * CRASHER_POINTS);
            assert_eq!(screen.sounds.iter().filter(|s| **s == SoundEffect::RoundClear).count(), 1);
        }

        // Further frames never repeat the win
        session.update(0.1);
        session.update(0.1);
        assert_eq!(
            screen.0.borrow().events.iter().filter(|e| matches!(e, RoundEvent::RoundWon { .. })).count(),
            1
        );

        assert_eq!(session.press_fire().expect("continue"), FireOutcome::NextRound);
        let screen = screen.0.borrow();
        assert_eq!(session.orchestrator().level(), 2);
        assert_eq!(screen.level, 2);
        assert_eq!(screen.ammo, 100 + AMMO_PER_ROUND);
        assert_eq!(screen.message, "");
        assert_eq!(screen.button, "");
    }

    #[test]
    fn test_out_of_ammo_leads_to_restart() {
        let (mut session, screen) = start(&crasher_only(1));

        let bullet = match session.press_fire().expect("fire") {
            FireOutcome::Fired(bullet) => bullet,
            other => panic!("expected a shot, got {other:?}"),
        };
        assert_eq!(session.press_fire().expect("dry"), FireOutcome::OutOfAmmo);

        run_until(&mut session, 4.0, |s| {
            s.orchestrator().scene().registry().active_count_of(EntityKind::Crasher) > 0
        });
        assert_eq!(session.phase(), RoundPhase::Active);

        session.destroy(bullet, DestroyCause::Expired);
        session.update(SIM_DT);
        assert_eq!(session.phase(), RoundPhase::GameOver);
        assert_eq!(screen.0.borrow().message, ui::game_over_text(0));
        assert_eq!(session.press_fire().expect("restart"), FireOutcome::Restart);
    }

    #[test]
    fn test_damage_ends_game() {
        let (mut session, screen) = start(&Settings::default());
        session.damage_player(1);
        assert_eq!(session.phase(), RoundPhase::Active);
        session.damage_player(PLAYER_MAX_HEALTH);
        assert_eq!(session.phase(), RoundPhase::GameOver);
        assert!(screen.0.borrow().sounds.contains(&SoundEffect::GameOver));
    }

    #[test]
    fn test_quit_tears_down() {
        let (mut session, _screen) = start(&Settings::default());
        session.update(0.1);
        session.quit();
        assert_eq!(session.phase(), RoundPhase::GameOver);
        assert!(session.orchestrator().scene().is_empty());
    }
}
