//! Attack patterns
//!
//! Volleys are returned as [`Shot`]s; the session turns them into bullets so
//! entity IDs stay in one place.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Boss, Enemy, EnemyKind, Player};
use crate::consts::*;

/// A bullet about to be spawned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    /// Degrees off the vertical axis
    pub angle: f32,
    pub speed: f32,
}

impl Shot {
    pub fn straight(pos: Vec2, speed: f32) -> Self {
        Self { pos, angle: 0.0, speed }
    }

    pub fn angled(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }
}

/// Boss attack patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// One straight shot
    Single,
    /// Five-way fan
    Spread,
    /// Three parallel straight columns
    Columns,
    /// Ten shots from random points along the hull (special timer only)
    Barrage,
}

impl AttackPattern {
    /// Uniform pick among the regular patterns (never Barrage)
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..3u8) {
            0 => AttackPattern::Single,
            1 => AttackPattern::Spread,
            _ => AttackPattern::Columns,
        }
    }

    /// Numeric selector (0-3) for display
    pub fn index(&self) -> u8 {
        match self {
            AttackPattern::Single => 0,
            AttackPattern::Spread => 1,
            AttackPattern::Columns => 2,
            AttackPattern::Barrage => 3,
        }
    }
}

/// Player fire. Empty when the live bullet count is at capacity.
///
/// With the base two-bullet cap a single straight shot comes out; any higher
/// cap fans one shot per slot evenly across ±30°.
pub fn player_volley(player: &Player, live_player_bullets: usize) -> Vec<Shot> {
    let max = player.max_bullets as usize;
    if live_player_bullets >= max {
        return Vec::new();
    }
    let muzzle = player.muzzle();
    if max <= PLAYER_BASE_MAX_BULLETS as usize {
        return vec![Shot::straight(muzzle, PLAYER_BULLET_SPEED)];
    }
    let step = 2.0 * PLAYER_FAN_HALF_ARC / (max - 1) as f32;
    (0..max)
        .map(|i| Shot::angled(muzzle, -PLAYER_FAN_HALF_ARC + step * i as f32, PLAYER_BULLET_SPEED))
        .collect()
}

/// Enemy fire: sine enemies spread three ways, normal enemies shoot straight
pub fn enemy_volley(enemy: &Enemy) -> Vec<Shot> {
    let muzzle = enemy.muzzle();
    match enemy.kind {
        EnemyKind::Sine => SINE_SPREAD_ANGLES
            .iter()
            .map(|&angle| Shot::angled(muzzle, angle, ENEMY_BULLET_SPEED))
            .collect(),
        EnemyKind::Normal => vec![Shot::straight(muzzle, ENEMY_BULLET_SPEED)],
    }
}

/// Boss fire for the given pattern
pub fn boss_volley<R: Rng + ?Sized>(boss: &Boss, pattern: AttackPattern, rng: &mut R) -> Vec<Shot> {
    let muzzle = boss.muzzle();
    match pattern {
        AttackPattern::Single => vec![Shot::straight(muzzle, ENEMY_BULLET_SPEED)],
        AttackPattern::Spread => BOSS_SPREAD_ANGLES
            .iter()
            .map(|&angle| Shot::angled(muzzle, angle, BOSS_SPREAD_SPEED))
            .collect(),
        AttackPattern::Columns => BOSS_COLUMN_OFFSETS
            .iter()
            .map(|&dx| Shot::straight(muzzle + Vec2::new(dx, 0.0), BOSS_COLUMN_SPEED))
            .collect(),
        AttackPattern::Barrage => {
            let y = boss.pos.y + boss.size.y;
            (0..BARRAGE_COUNT)
                .map(|_| {
                    let x = rng.random_range(boss.pos.x..=boss.pos.x + boss.size.x);
                    let speed = rng.random_range(BARRAGE_MIN_SPEED..BARRAGE_MAX_SPEED);
                    Shot::straight(Vec2::new(x, y), speed)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Field;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player_with_cap(max_bullets: u32) -> Player {
        let mut player = Player::new(&Field::default());
        player.max_bullets = max_bullets;
        player
    }

    #[test]
    fn test_player_single_shot_at_base_cap() {
        let player = player_with_cap(2);
        let shots = player_volley(&player, 0);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].angle, 0.0);
        assert_eq!(shots[0].speed, PLAYER_BULLET_SPEED);
        assert_eq!(shots[0].pos, Vec2::new(375.0 + 25.0 - 2.5, 540.0));
    }

    #[test]
    fn test_player_fire_dropped_at_capacity() {
        let player = player_with_cap(2);
        assert!(player_volley(&player, 2).is_empty());
        assert!(player_volley(&player, 3).is_empty());
        assert_eq!(player_volley(&player, 1).len(), 1);
    }

    #[test]
    fn test_player_fan() {
        let player = player_with_cap(3);
        let angles: Vec<f32> = player_volley(&player, 0).iter().map(|s| s.angle).collect();
        assert_eq!(angles, vec![-30.0, 0.0, 30.0]);

        let player = player_with_cap(5);
        let angles: Vec<f32> = player_volley(&player, 1).iter().map(|s| s.angle).collect();
        assert_eq!(angles, vec![-30.0, -15.0, 0.0, 15.0, 30.0]);
    }

    #[test]
    fn test_enemy_volleys() {
        let mut rng = Pcg32::seed_from_u64(2);
        let sine = Enemy::new(1, Vec2::new(100.0, 50.0), EnemyKind::Sine, 1.0, &mut rng);
        let shots = enemy_volley(&sine);
        assert_eq!(shots.iter().map(|s| s.angle).collect::<Vec<_>>(), vec![-15.0, 0.0, 15.0]);
        assert!(shots.iter().all(|s| s.speed == ENEMY_BULLET_SPEED));
        assert_eq!(shots[0].pos, Vec2::new(117.5, 80.0));

        let normal = Enemy::new(2, Vec2::new(100.0, 50.0), EnemyKind::Normal, 1.0, &mut rng);
        let shots = enemy_volley(&normal);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].angle, 0.0);
    }

    #[test]
    fn test_boss_patterns() {
        let mut rng = Pcg32::seed_from_u64(4);
        let boss = Boss::new(5, &Field::default(), &mut rng);

        assert_eq!(boss_volley(&boss, AttackPattern::Single, &mut rng).len(), 1);

        let spread = boss_volley(&boss, AttackPattern::Spread, &mut rng);
        assert_eq!(spread.len(), 5);
        assert!(spread.iter().all(|s| s.speed == BOSS_SPREAD_SPEED));

        let columns = boss_volley(&boss, AttackPattern::Columns, &mut rng);
        let xs: Vec<f32> = columns.iter().map(|s| s.pos.x).collect();
        assert_eq!(xs, vec![377.5, 397.5, 417.5]);
        assert!(columns.iter().all(|s| s.angle == 0.0 && s.speed == BOSS_COLUMN_SPEED));

        let barrage = boss_volley(&boss, AttackPattern::Barrage, &mut rng);
        assert_eq!(barrage.len(), BARRAGE_COUNT);
        for shot in &barrage {
            assert!(shot.pos.x >= boss.pos.x && shot.pos.x <= boss.pos.x + boss.size.x);
            assert!(shot.speed >= BARRAGE_MIN_SPEED && shot.speed < BARRAGE_MAX_SPEED);
            assert_eq!(shot.pos.y, boss.pos.y + boss.size.y);
        }
    }

    #[test]
    fn test_roll_never_barrage() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let pattern = AttackPattern::roll(&mut rng);
            assert_ne!(pattern, AttackPattern::Barrage);
            seen[pattern.index() as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }
}
