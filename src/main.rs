//! ShootAR headless runner
//!
//! Drives a session without camera or renderer: an autopilot shoots the
//! nearest enemy every so often, bullets connect after a short flight, and the
//! run continues until the player is overwhelmed or the round cap is reached.
//!
//! Usage: `shoot-ar [settings.json] [max-rounds]`

use shoot_ar::audio::SilentAudio;
use shoot_ar::platform::HeadlessPlatform;
use shoot_ar::sim::{DestroyCause, EntityHandle, EntityKind, HeadlessFactory, RoundPhase};
use shoot_ar::ui::LogHud;
use shoot_ar::{FireOutcome, GameError, GameSession, Settings};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
/// Frames between trigger pulls
const FIRE_INTERVAL_FRAMES: u32 = 40;
/// Frames a bullet flies before it resolves
const BULLET_FLIGHT_FRAMES: u32 = 12;
/// Every n-th bullet misses
const MISS_EVERY: u32 = 4;
/// Hard stop for a single run
const MAX_FRAMES: u32 = 60 * 60 * 30;

fn main() {
    env_logger::init();
    log::info!("ShootAR (headless) starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), GameError> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let max_rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);

    let mut session = GameSession::start(
        &settings,
        &HeadlessPlatform,
        Box::new(HeadlessFactory::new()),
        Box::new(LogHud),
        Box::new(SilentAudio),
    )?;

    let mut in_flight: Vec<(EntityHandle, u32)> = Vec::new();
    let mut shots = 0u32;

    for frame in 0..MAX_FRAMES {
        session.update(FRAME_DT);

        match session.phase() {
            RoundPhase::GameOver => break,
            RoundPhase::RoundWon => {
                in_flight.clear();
                if session.orchestrator().level() >= max_rounds {
                    break;
                }
                session.press_fire()?;
                continue;
            }
            RoundPhase::Active => {}
        }

        // Resolve bullets that reached their target
        let (landed, flying): (Vec<_>, Vec<_>) = in_flight
            .into_iter()
            .partition(|(_, fired_at)| frame.saturating_sub(*fired_at) >= BULLET_FLIGHT_FRAMES);
        in_flight = flying;
        for (bullet, _) in landed {
            shots += 1;
            session.destroy(bullet, DestroyCause::Expired);
            if shots % MISS_EVERY == 0 {
                continue;
            }
            if let Some(target) = nearest_target(&session) {
                session.destroy(target, DestroyCause::Killed);
            }
        }

        let has_target = nearest_target(&session).is_some();
        if has_target && frame % FIRE_INTERVAL_FRAMES == 0 {
            if let FireOutcome::Fired(bullet) = session.press_fire()? {
                in_flight.push((bullet, frame));
            }
        }
    }

    session.quit();
    let snapshot = session.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("Could not serialize snapshot: {}", err),
    }
    log::info!(
        "Run finished: {} rounds survived, score {}",
        snapshot.round.rounds_survived(),
        snapshot.score
    );
    Ok(())
}

/// Closest live enemy or capsule to the player
fn nearest_target(session: &GameSession) -> Option<EntityHandle> {
    let scene = session.orchestrator().scene();
    [EntityKind::Crasher, EntityKind::Drone, EntityKind::Capsule]
        .into_iter()
        .flat_map(|kind| scene.handles_of(kind))
        .filter_map(|handle| scene.get(handle).map(|e| (handle, e.position.length())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(handle, _)| handle)
}

