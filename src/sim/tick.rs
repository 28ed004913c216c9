//! Fixed timestep simulation tick
//!
//! Core game loop step: drain discrete input through the session state
//! machine, then (while Playing) advance every entity, resolve combat and
//! check round progression.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::attack;
use super::collision::{CombatReport, resolve_combat};
use super::state::{GamePhase, GameState};
use super::wave;

/// Discrete input events (key-down style, queued and drained each tick)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Shoot (Playing only)
    Fire,
    /// Pause / resume
    Pause,
    /// Start from the menu
    Confirm,
    /// Leave from the menu or game-over screen
    Quit,
    /// New run from the game-over screen
    Restart,
    /// Leave from the pause screen
    Exit,
    /// Window closed; leaves from any phase
    Close,
}

/// Directional keys currently held (polled fresh every tick)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Unit step per axis. Opposing keys resolve to left / up.
    pub fn direction(&self) -> Vec2 {
        let x = if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        };
        let y = if self.up {
            -1.0
        } else if self.down {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Discrete events, processed in order
    pub events: Vec<InputEvent>,
    /// Held directions
    pub held: HeldKeys,
}

impl TickInput {
    pub fn event(event: InputEvent) -> Self {
        Self {
            events: vec![event],
            ..Default::default()
        }
    }

    pub fn held(held: HeldKeys) -> Self {
        Self {
            held,
            ..Default::default()
        }
    }
}

/// Whether the session keeps running after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The player asked to leave
    Exit,
}

/// Feed one discrete event through the session state machine.
///
/// Events with no entry for the current phase are ignored.
pub fn apply_event(state: &mut GameState, event: InputEvent) -> TickOutcome {
    use GamePhase::*;
    use InputEvent::*;

    match (state.phase, event) {
        (_, Close) => return TickOutcome::Exit,
        (Menu, Confirm) => {
            log::info!("Starting run");
            state.phase = Playing;
        }
        (Menu, Quit) | (Paused, Exit) | (GameOver, Quit) => return TickOutcome::Exit,
        (Playing, Fire) => fire(state),
        (Playing, Pause) => state.phase = Paused,
        (Paused, Pause) => state.phase = Playing,
        (GameOver, Restart) => {
            state.reset();
            state.phase = Playing;
            log::info!("Run restarted");
        }
        _ => {}
    }
    TickOutcome::Continue
}

/// Player fire request; silently dropped at capacity
fn fire(state: &mut GameState) {
    let live = state.player_bullet_count();
    for shot in attack::player_volley(&state.player, live) {
        state.spawn_bullet(shot);
    }
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    for &event in &input.events {
        if apply_event(state, event) == TickOutcome::Exit {
            return TickOutcome::Exit;
        }
    }

    if state.phase == GamePhase::Playing {
        if let Some(report) = step_playing(state, input.held) {
            if report != CombatReport::default() {
                log::trace!("Tick {}: {:?}", state.time_ticks, report);
            }
        }
    }

    state.time_ticks += 1;
    TickOutcome::Continue
}

/// One Playing-phase update. Returns the combat report, or None if the run
/// ended before combat was resolved.
fn step_playing(state: &mut GameState, held: HeldKeys) -> Option<CombatReport> {
    state.player.advance(held.direction(), &state.field);
    let expiry = state.player.tick_buffs();
    if expiry.speed {
        log::debug!("Speed buff expired");
    }
    if expiry.bullets {
        log::debug!("Bullet buff expired");
    }

    wave::check_round_progress(state);

    if wave::advance_formation(state).reached_bottom {
        state.game_over("enemy reached the bottom");
        return None;
    }
    wave::advance_boss(state);

    for bullet in &mut state.bullets {
        bullet.advance();
    }
    for power_up in &mut state.power_ups {
        power_up.advance();
    }

    let report = resolve_combat(state);
    state.normalize_order();
    Some(report)
}
