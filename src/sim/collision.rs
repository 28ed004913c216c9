//! Combat resolution
//!
//! Runs in two phases so removal never happens mid-scan: first every bullet
//! is tested against a stable, id-ordered view of the field and the outcomes
//! are recorded; then the outcomes are applied.
//!
//! Tie-breaks: a player bullet eliminates at most one enemy per tick (the
//! lowest id it overlaps) and an enemy is eliminated by at most one bullet
//! per tick. A bullet that hits an enemy never also damages the boss.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, PowerUpKind};
use super::wave;
use crate::consts::*;

/// What happened during one combat pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    /// IDs of enemies destroyed this tick, in the order they were hit
    pub enemies_destroyed: Vec<u32>,
    /// Bullets removed (hits plus bullets that left the field)
    pub bullets_removed: usize,
    /// Total damage dealt to the boss
    pub boss_damage: i32,
    /// The boss went down this tick
    pub boss_defeated: bool,
    /// A hostile bullet hit the player
    pub player_hit: bool,
    /// Power-ups dropped by destroyed enemies
    pub power_ups_spawned: Vec<PowerUpKind>,
    /// Power-ups picked up by the player
    pub power_ups_collected: Vec<PowerUpKind>,
}

/// Resolve every bullet and power-up interaction for this tick
pub fn resolve_combat(state: &mut GameState) -> CombatReport {
    let mut report = CombatReport::default();
    resolve_bullets(state, &mut report);
    resolve_power_ups(state, &mut report);
    report
}

fn resolve_bullets(state: &mut GameState, report: &mut CombatReport) {
    let field = state.field;
    let player_box = state.player.bounds();
    let boss_box = state.boss.as_ref().map(|b| b.bounds());
    let mut boss_health = state.boss.as_ref().map(|b| b.health);

    let mut spent: HashSet<u32> = HashSet::new();
    let mut claimed: HashSet<u32> = HashSet::new();
    let mut destroyed: Vec<(u32, Vec2)> = Vec::new();

    // Phase 1: decide
    for bullet in &state.bullets {
        if !field.contains(bullet.pos) {
            spent.insert(bullet.id);
            continue;
        }
        let bounds = bullet.bounds();

        if bullet.is_player_owned() {
            let target = state
                .enemies
                .iter()
                .find(|e| !claimed.contains(&e.id) && e.bounds().overlaps(&bounds));
            if let Some(enemy) = target {
                claimed.insert(enemy.id);
                destroyed.push((enemy.id, enemy.pos));
                spent.insert(bullet.id);
                continue;
            }

            if let (Some(boss_box), Some(health)) = (boss_box, boss_health.as_mut()) {
                if *health > 0 && boss_box.overlaps(&bounds) {
                    *health -= BOSS_HIT_DAMAGE;
                    report.boss_damage += BOSS_HIT_DAMAGE;
                    spent.insert(bullet.id);
                }
            }
        } else if bullet.is_hostile() && bounds.overlaps(&player_box) {
            report.player_hit = true;
        }
    }

    // Phase 2: apply
    state.bullets.retain(|b| !spent.contains(&b.id));
    state.enemies.retain(|e| !claimed.contains(&e.id));
    report.bullets_removed = spent.len();

    for (id, pos) in destroyed {
        report.enemies_destroyed.push(id);
        if state.rng.random_bool(POWER_UP_DROP_CHANCE) {
            let kind = PowerUpKind::random(&mut state.rng);
            state.spawn_power_up(pos, kind);
            report.power_ups_spawned.push(kind);
        }
    }

    if let Some(health) = boss_health {
        let defeated = match state.boss.as_mut() {
            Some(boss) => {
                boss.health = health;
                boss.is_defeated()
            }
            None => false,
        };
        if defeated {
            state.boss = None;
            state.round += 1;
            report.boss_defeated = true;
            log::info!("Boss defeated! Round {}", state.round);
            wave::spawn_formation(state);
        }
    }

    if report.player_hit {
        state.game_over("hit by enemy fire");
    }
}

fn resolve_power_ups(state: &mut GameState, report: &mut CombatReport) {
    let player_box = state.player.bounds();
    let bottom = state.field.height;
    let mut collected = Vec::new();

    state.power_ups.retain(|p| {
        if p.bounds().overlaps(&player_box) {
            collected.push(p.kind);
            false
        } else {
            p.pos.y <= bottom
        }
    });

    for kind in collected {
        state.player.apply_power_up(kind);
        log::debug!("Picked up {:?} power-up", kind);
        report.power_ups_collected.push(kind);
    }
}
