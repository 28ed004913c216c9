//! Space Invaders - headless native entry point
//!
//! Usage: `space-invaders [settings.json]`
//!
//! Runs the simulation in real time with the autopilot at the controls and a
//! presenter that reports through the log (`RUST_LOG=info` for the HUD,
//! `RUST_LOG=trace` for full snapshot dumps).

use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use space_invaders::autopilot::Autopilot;
use space_invaders::sim::{GamePhase, GameState};
use space_invaders::{Driver, Presenter, Settings, SettingsError, Snapshot};

/// Reports phase, round and level changes through the log
#[derive(Default)]
struct LogPresenter {
    last: Option<(GamePhase, u32, u32)>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &Snapshot) {
        let hud = &snapshot.hud;
        let current = (snapshot.phase, hud.round, hud.level);
        if self.last != Some(current) {
            log::info!(
                "[tick {}] {:?} | Round {} | Level {} | Speed {} ({}s) | Bullets {} ({}s)",
                snapshot.tick,
                snapshot.phase,
                hud.round,
                hud.level,
                hud.player_speed,
                hud.speed_buff_secs,
                hud.max_bullets,
                hud.bullet_buff_secs,
            );
            for line in snapshot.prompt {
                log::info!("    {}", line);
            }
            self.last = Some(current);
        }

        if log::log_enabled!(log::Level::Trace) {
            match serde_json::to_string(snapshot) {
                Ok(json) => log::trace!("{}", json),
                Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
            }
        }
    }
}

fn load_settings() -> Result<Settings, SettingsError> {
    match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => {
            log::info!("No settings file given, using defaults");
            Ok(Settings::default())
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Space Invaders (native) starting...");

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let seed = settings.seed.unwrap_or_else(clock_seed);
    let state = GameState::with_field(seed, settings.field());
    let driver = Driver::new(
        state,
        Autopilot::new(settings.max_restarts),
        LogPresenter::default(),
        &settings,
    );

    let summary = driver.run();
    log::info!(
        "Run ended ({:?}) after {} ticks / {} frames: round {}, level {}, {:?}",
        summary.stop,
        summary.ticks,
        summary.frames,
        summary.round,
        summary.level,
        summary.phase,
    );
    ExitCode::SUCCESS
}
