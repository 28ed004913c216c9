//! Scripted player for headless runs
//!
//! Reads each snapshot and answers with the input a simple player would give:
//! start from the menu, line up under the lowest target and shoot, sidestep
//! fire that is about to land, and restart a limited number of times.

use crate::driver::InputSource;
use crate::sim::{GamePhase, HeldKeys, InputEvent, TickInput};
use crate::snapshot::{Snapshot, Sprite};

/// Horizontal slack when lining up a shot
const AIM_TOLERANCE: f32 = 8.0;
/// Hostile bullets closer than this (vertically) are dodged
const DANGER_RANGE: f32 = 120.0;
/// Minimum ticks between fire requests
const FIRE_INTERVAL: u64 = 10;

#[derive(Debug, Clone)]
pub struct Autopilot {
    max_restarts: u32,
    restarts: u32,
    last_fire: Option<u64>,
}

impl Autopilot {
    pub fn new(max_restarts: u32) -> Self {
        Self {
            max_restarts,
            restarts: 0,
            last_fire: None,
        }
    }

    /// Restarts taken so far
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    fn play(&mut self, snapshot: &Snapshot) -> TickInput {
        let Some(player) = snapshot.player() else {
            return TickInput::default();
        };
        let center = center_x(player);
        let mut input = TickInput::default();

        if let Some(threat) = incoming(snapshot, player) {
            // Step away from the bullet, toward the roomier side
            let room_left = center;
            let room_right = snapshot.field.x - center;
            if center_x(threat) >= center && room_left > player.size.x {
                input.held.left = true;
            } else if room_right > player.size.x {
                input.held.right = true;
            } else {
                input.held.left = true;
            }
            return input;
        }

        let target = snapshot
            .targets()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        if let Some(target) = target {
            let dx = center_x(target) - center;
            input.held = steer(dx);
            if dx.abs() <= AIM_TOLERANCE.max(target.size.x / 2.0) && self.can_fire(snapshot.tick) {
                self.last_fire = Some(snapshot.tick);
                input.events.push(InputEvent::Fire);
            }
        }
        input
    }

    fn can_fire(&self, tick: u64) -> bool {
        self.last_fire
            .is_none_or(|last| tick.saturating_sub(last) >= FIRE_INTERVAL)
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, snapshot: &Snapshot) -> TickInput {
        match snapshot.phase {
            GamePhase::Menu => TickInput::event(InputEvent::Confirm),
            GamePhase::Paused => TickInput::event(InputEvent::Pause),
            GamePhase::GameOver if self.restarts < self.max_restarts => {
                self.restarts += 1;
                self.last_fire = None;
                log::info!("Autopilot restarting ({}/{})", self.restarts, self.max_restarts);
                TickInput::event(InputEvent::Restart)
            }
            GamePhase::GameOver => TickInput::event(InputEvent::Quit),
            GamePhase::Playing => self.play(snapshot),
        }
    }
}

fn center_x(sprite: &Sprite) -> f32 {
    sprite.pos.x + sprite.size.x / 2.0
}

fn steer(dx: f32) -> HeldKeys {
    HeldKeys {
        left: dx < -AIM_TOLERANCE,
        right: dx > AIM_TOLERANCE,
        ..Default::default()
    }
}

/// Closest hostile bullet above the player that overlaps its column
fn incoming<'a>(snapshot: &'a Snapshot, player: &Sprite) -> Option<&'a Sprite> {
    let left = player.pos.x;
    let right = player.pos.x + player.size.x;
    snapshot
        .hostile_bullets()
        .filter(|b| {
            let above = player.pos.y - (b.pos.y + b.size.y);
            (0.0..DANGER_RANGE).contains(&above) && b.pos.x + b.size.x > left && b.pos.x < right
        })
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
}
