//! Render handoff
//!
//! A [`Snapshot`] is everything a presenter needs to draw one frame. It is
//! built from the session after the tick and never points back into it.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{EnemyKind, GamePhase, GameState, PowerUpKind};
use crate::ticks_to_seconds;

/// Draw class of a sprite (decides its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteClass {
    Player,
    NormalEnemy,
    SineEnemy,
    PlayerBullet,
    HostileBullet,
    Boss,
    SpeedPowerUp,
    BulletsPowerUp,
}

impl SpriteClass {
    /// RGB fill color
    pub fn color(&self) -> [u8; 3] {
        match self {
            SpriteClass::Player => [0, 255, 0],
            SpriteClass::NormalEnemy | SpriteClass::Boss | SpriteClass::HostileBullet => [255, 0, 0],
            SpriteClass::SineEnemy | SpriteClass::PlayerBullet => [255, 255, 0],
            SpriteClass::SpeedPowerUp => [0, 0, 255],
            SpriteClass::BulletsPowerUp => [128, 0, 128],
        }
    }
}

/// One drawable rectangle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub class: SpriteClass,
    pub pos: Vec2,
    pub size: Vec2,
    /// Remaining health for entities that have it (boss bar width)
    pub health: Option<i32>,
}

/// Session-level HUD values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Hud {
    pub round: u32,
    pub level: u32,
    pub speed_buff_ticks: u32,
    pub bullet_buff_ticks: u32,
    /// Whole seconds left on each buff
    pub speed_buff_secs: u32,
    pub bullet_buff_secs: u32,
    pub player_speed: f32,
    pub max_bullets: u32,
}

/// Read-only view of the session for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub field: Vec2,
    pub hud: Hud,
    /// Draw order: player, enemies, bullets, power-ups, boss
    pub sprites: Vec<Sprite>,
    /// Overlay text for non-playing phases
    pub prompt: &'static [&'static str],
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let hud = Hud {
            round: state.round,
            level: state.level,
            speed_buff_ticks: player.speed_buff.remaining(),
            bullet_buff_ticks: player.bullet_buff.remaining(),
            speed_buff_secs: ticks_to_seconds(player.speed_buff.remaining()),
            bullet_buff_secs: ticks_to_seconds(player.bullet_buff.remaining()),
            player_speed: player.speed,
            max_bullets: player.max_bullets,
        };

        let mut sprites = Vec::with_capacity(
            1 + state.enemies.len() + state.bullets.len() + state.power_ups.len() + 1,
        );
        sprites.push(Sprite {
            class: SpriteClass::Player,
            pos: player.pos,
            size: player.size,
            health: None,
        });
        sprites.extend(state.enemies.iter().map(|e| Sprite {
            class: match e.kind {
                EnemyKind::Normal => SpriteClass::NormalEnemy,
                EnemyKind::Sine => SpriteClass::SineEnemy,
            },
            pos: e.pos,
            size: e.size,
            health: Some(e.health),
        }));
        sprites.extend(state.bullets.iter().map(|b| Sprite {
            class: if b.is_player_owned() {
                SpriteClass::PlayerBullet
            } else {
                SpriteClass::HostileBullet
            },
            pos: b.pos,
            size: b.size,
            health: None,
        }));
        sprites.extend(state.power_ups.iter().map(|p| Sprite {
            class: match p.kind {
                PowerUpKind::Speed => SpriteClass::SpeedPowerUp,
                PowerUpKind::Bullets => SpriteClass::BulletsPowerUp,
            },
            pos: p.pos,
            size: p.size,
            health: None,
        }));
        if let Some(boss) = &state.boss {
            sprites.push(Sprite {
                class: SpriteClass::Boss,
                pos: boss.pos,
                size: boss.size,
                health: Some(boss.health),
            });
        }

        Self {
            tick: state.time_ticks,
            phase: state.phase,
            field: Vec2::new(state.field.width, state.field.height),
            hud,
            sprites,
            prompt: state.phase.prompt_lines(),
        }
    }

    pub fn player(&self) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.class == SpriteClass::Player)
    }

    /// Enemies and the boss
    pub fn targets(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| {
            matches!(
                s.class,
                SpriteClass::NormalEnemy | SpriteClass::SineEnemy | SpriteClass::Boss
            )
        })
    }

    pub fn hostile_bullets(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites
            .iter()
            .filter(|s| s.class == SpriteClass::HostileBullet)
    }

    pub fn count(&self, class: SpriteClass) -> usize {
        self.sprites.iter().filter(|s| s.class == class).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Boss, PowerUpKind, Shot};

    #[test]
    fn test_capture_new_session() {
        let state = GameState::new(3);
        let snapshot = Snapshot::capture(&state);
        assert_eq!(snapshot.phase, GamePhase::Menu);
        assert_eq!(snapshot.hud.round, 1);
        assert_eq!(snapshot.hud.level, 1);
        assert_eq!(snapshot.sprites[0].class, SpriteClass::Player);
        assert_eq!(snapshot.targets().count(), 12);
        assert_eq!(snapshot.prompt[0], "Space Invaders");
    }

    #[test]
    fn test_capture_classes_and_hud() {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Playing;
        state.spawn_bullet(Shot::straight(Vec2::new(10.0, 10.0), -10.0));
        state.spawn_bullet(Shot::straight(Vec2::new(10.0, 10.0), 5.0));
        state.spawn_power_up(Vec2::new(20.0, 20.0), PowerUpKind::Bullets);
        state.boss = Some(Boss::new(10, &state.field, &mut state.rng));
        state.player.apply_power_up(PowerUpKind::Speed);

        let snapshot = Snapshot::capture(&state);
        assert_eq!(snapshot.count(SpriteClass::PlayerBullet), 1);
        assert_eq!(snapshot.count(SpriteClass::HostileBullet), 1);
        assert_eq!(snapshot.count(SpriteClass::BulletsPowerUp), 1);
        let boss = snapshot.sprites.last().map(|s| (s.class, s.health));
        assert_eq!(boss, Some((SpriteClass::Boss, Some(125))));
        assert_eq!(snapshot.hud.speed_buff_ticks, 1200);
        assert_eq!(snapshot.hud.speed_buff_secs, 20);
        assert!(snapshot.prompt.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(3);
        let json = serde_json::to_string(&Snapshot::capture(&state));
        assert!(json.is_ok_and(|j| j.contains("\"phase\":\"Menu\"")));
    }

    #[test]
    fn test_colors() {
        assert_eq!(SpriteClass::Player.color(), [0, 255, 0]);
        assert_eq!(SpriteClass::SineEnemy.color(), [255, 255, 0]);
        assert_eq!(SpriteClass::SpeedPowerUp.color(), [0, 0, 255]);
    }
}
