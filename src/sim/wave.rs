//! Wave and round progression
//!
//! Rounds advance once the field is empty. Every fifth round is a boss
//! round; the boss periodically calls in reinforcements.

use glam::Vec2;
use rand::Rng;

use super::attack::{self, AttackPattern};
use super::geometry::Field;
use super::state::{Boss, Enemy, EnemyKind, GameState};
use crate::consts::*;

/// Boss health for a given round, fixed at spawn.
///
/// 100 below round 5, then grows 25% per boss encounter (truncated).
pub fn boss_health_for_round(round: u32) -> i32 {
    if round < BOSS_ROUND_INTERVAL {
        return BOSS_BASE_HEALTH as i32;
    }
    let encounters = (round / BOSS_ROUND_INTERVAL) as i32 - 1;
    (BOSS_BASE_HEALTH * BOSS_HEALTH_GROWTH.powi(encounters)) as i32
}

/// Is this a boss round?
#[inline]
pub fn is_boss_round(round: u32) -> bool {
    round % BOSS_ROUND_INTERVAL == 0
}

/// X positions of a fresh formation: every spacing step from the left
/// margin, stopping short of the right margin
pub fn formation_columns(field: &Field) -> Vec<f32> {
    let end = field.width - FORMATION_MARGIN;
    (0..)
        .map(|i| FORMATION_START_X + FORMATION_SPACING * i as f32)
        .take_while(|&x| x < end)
        .collect()
}

/// Add a full row of randomly typed enemies
pub fn spawn_formation(state: &mut GameState) {
    for x in formation_columns(&state.field) {
        let kind = EnemyKind::random(&mut state.rng);
        state.spawn_enemy(Vec2::new(x, FORMATION_Y), kind);
    }
    log::debug!("Formation spawned: {} enemies", state.enemies.len());
}

/// Per-tick round check. Returns true if the round advanced.
///
/// Only fires when no enemies, boss or power-ups remain and the current
/// round is not a boss round (a boss round ends through the boss fight).
pub fn check_round_progress(state: &mut GameState) -> bool {
    let cleared = state.enemies.is_empty() && state.boss.is_none() && state.power_ups.is_empty();
    if !cleared || is_boss_round(state.round) {
        return false;
    }

    state.round += 1;
    if is_boss_round(state.round) {
        state.level += 1;
        let boss = Boss::new(state.round, &state.field, &mut state.rng);
        log::info!(
            "Round {}: boss arrives with {} health (level {})",
            state.round,
            boss.health,
            state.level
        );
        state.boss = Some(boss);
    } else {
        log::info!("Round {}", state.round);
        spawn_formation(state);
    }
    true
}

/// Result of a formation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormationStatus {
    /// An enemy reached the bottom of the field
    pub reached_bottom: bool,
    /// The formation bounced off a side this tick
    pub bounced: bool,
}

/// Move every enemy, fire expired shoot timers, and apply formation drift.
///
/// Drift is shared: the first tick any enemy touches a side flips the
/// direction and drops the whole formation once. No further drop happens
/// until no enemy is touching a side.
pub fn advance_formation(state: &mut GameState) -> FormationStatus {
    let mut status = FormationStatus::default();
    let field = state.field;
    let time_ticks = state.time_ticks;
    let mut shots = Vec::new();

    for enemy in &mut state.enemies {
        enemy.advance(time_ticks);
        if enemy.shoot.tick() {
            shots.extend(attack::enemy_volley(enemy));
            enemy.shoot.reset(Enemy::roll_shot_delay(&mut state.rng));
        }
        if enemy.bottom() >= field.height {
            status.reached_bottom = true;
            break;
        }
    }

    for shot in shots {
        state.spawn_bullet(shot);
    }
    if status.reached_bottom {
        return status;
    }

    let touching = state
        .enemies
        .iter()
        .any(|e| field.touches_side(e.pos.x, e.size.x));
    if touching && !state.formation_at_side {
        state.formation_dir = -state.formation_dir;
        for enemy in &mut state.enemies {
            enemy.pos.y += ENEMY_DROP;
        }
        status.bounced = true;
    }
    state.formation_at_side = touching;

    let speed = state.formation_dir * ENEMY_SPEED;
    for enemy in &mut state.enemies {
        enemy.speed = speed;
    }
    status
}

/// Move the boss, run its three timers, and spawn whatever they produce
pub fn advance_boss(state: &mut GameState) {
    let field = state.field;
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    boss.advance(&field);

    let mut shots = Vec::new();
    if boss.shoot.tick() {
        boss.pattern = AttackPattern::roll(&mut state.rng);
        shots.extend(attack::boss_volley(boss, boss.pattern, &mut state.rng));
        boss.shoot
            .reset(state.rng.random_range(BOSS_SHOT_MIN_TICKS..=BOSS_SHOT_MAX_TICKS));
    }
    if boss.special.tick() {
        boss.pattern = AttackPattern::Barrage;
        shots.extend(attack::boss_volley(boss, AttackPattern::Barrage, &mut state.rng));
        boss.special.reset(BOSS_SPECIAL_TICKS);
    }
    let reinforce = boss.reinforce.tick();
    if reinforce {
        boss.reinforce.reset(BOSS_REINFORCE_TICKS);
    }
    log::trace!("Boss fired {} bullets", shots.len());

    for shot in shots {
        state.spawn_bullet(shot);
    }
    if reinforce {
        spawn_reinforcements(state);
    }
}

/// Drop a small batch of enemies at random columns
fn spawn_reinforcements(state: &mut GameState) {
    let max_x = (state.field.width - FORMATION_MARGIN).max(FORMATION_START_X);
    for _ in 0..BOSS_REINFORCE_COUNT {
        let x = state.rng.random_range(FORMATION_START_X..=max_x);
        let kind = EnemyKind::random(&mut state.rng);
        state.spawn_enemy(Vec2::new(x, FORMATION_Y), kind);
    }
    log::debug!("Boss called {} reinforcements", BOSS_REINFORCE_COUNT);
}
