//! Game state and entity models
//!
//! All mutable simulation state lives in [`GameState`]. Entities are plain
//! data with their own per-tick update rules.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::attack::{AttackPattern, Shot};
use super::geometry::{Aabb, Field};
use super::timer::Countdown;
use super::wave;
use crate::consts::*;
use crate::velocity_from_angle;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation halted, state machine still live
    Paused,
    /// Run ended
    GameOver,
}

impl GamePhase {
    /// Fixed prompt lines a presenter shows for this phase
    pub fn prompt_lines(&self) -> &'static [&'static str] {
        match self {
            GamePhase::Menu => &["Space Invaders", "Press ENTER to Start", "Press Q to Exit"],
            GamePhase::Playing => &[],
            GamePhase::Paused => &["Paused", "Press ESC to Resume", "Press X to Exit Round"],
            GamePhase::GameOver => &["You've Lost", "Press R to Try Again", "Press Q to Exit"],
        }
    }
}

/// Which buff ran out on a given tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuffExpiry {
    pub speed: bool,
    pub bullets: bool,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub base_speed: f32,
    pub speed: f32,
    pub base_max_bullets: u32,
    pub max_bullets: u32,
    pub speed_buff: Countdown,
    pub bullet_buff: Countdown,
}

impl Player {
    /// Spawn centered horizontally near the bottom of the field
    pub fn new(field: &Field) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        let pos = Vec2::new(
            (field.width / 2.0).floor() - (size.x / 2.0).floor(),
            field.height - PLAYER_SPAWN_OFFSET,
        );
        Self {
            pos: field.clamp(pos, size),
            size,
            base_speed: PLAYER_BASE_SPEED,
            speed: PLAYER_BASE_SPEED,
            base_max_bullets: PLAYER_BASE_MAX_BULLETS,
            max_bullets: PLAYER_BASE_MAX_BULLETS,
            speed_buff: Countdown::idle(),
            bullet_buff: Countdown::idle(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move along `direction` (each axis in {-1, 0, 1}) at current speed,
    /// then clamp to the field
    pub fn advance(&mut self, direction: Vec2, field: &Field) {
        self.pos = field.clamp(self.pos + direction * self.speed, self.size);
    }

    /// Tick both buff countdowns, reverting stats that expire this tick
    pub fn tick_buffs(&mut self) -> BuffExpiry {
        let mut expiry = BuffExpiry::default();
        if self.speed_buff.tick() {
            self.speed = self.base_speed;
            expiry.speed = true;
        }
        if self.bullet_buff.tick() {
            self.max_bullets = self.base_max_bullets;
            expiry.bullets = true;
        }
        expiry
    }

    /// Apply a collected power-up. Re-collecting refreshes the countdown.
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => {
                if self.speed < PLAYER_MAX_SPEED {
                    self.speed = (self.speed + SPEED_BUFF_STEP).min(PLAYER_MAX_SPEED);
                }
                self.speed_buff.reset(BUFF_DURATION_TICKS);
            }
            PowerUpKind::Bullets => {
                self.max_bullets += 1;
                self.bullet_buff.reset(BUFF_DURATION_TICKS);
            }
        }
    }

    /// Where player bullets leave the ship
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + (self.size.x / 2.0).floor() - BULLET_WIDTH / 2.0, self.pos.y)
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Tough, moves horizontally, single shot
    Normal,
    /// Fragile, bobs on a sine wave, three-way shot
    Sine,
}

impl EnemyKind {
    /// Uniform pick between the two kinds
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            EnemyKind::Normal
        } else {
            EnemyKind::Sine
        }
    }

    pub fn health(&self) -> i32 {
        match self {
            EnemyKind::Normal => NORMAL_ENEMY_HEALTH,
            EnemyKind::Sine => SINE_ENEMY_HEALTH,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: EnemyKind,
    pub health: i32,
    /// Signed horizontal speed (shared formation direction)
    pub speed: f32,
    pub shoot: Countdown,
    /// Phase offset for the sine bob (radians)
    pub sine_phase: f32,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(id: u32, pos: Vec2, kind: EnemyKind, direction: f32, rng: &mut R) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            kind,
            health: kind.health(),
            speed: direction * ENEMY_SPEED,
            shoot: Countdown::new(Self::roll_shot_delay(rng)),
            sine_phase: rng.random_range(0.0..std::f32::consts::TAU),
        }
    }

    /// Randomized delay until the next shot
    pub fn roll_shot_delay<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        rng.random_range(ENEMY_SHOOT_MIN_TICKS..=ENEMY_SHOOT_MAX_TICKS)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Horizontal drift; sine enemies also take their height from the wave
    pub fn advance(&mut self, time_ticks: u64) {
        self.pos.x += self.speed;
        if self.kind == EnemyKind::Sine {
            let t = time_ticks as f32 * SINE_FREQUENCY + self.sine_phase;
            self.pos.y = SINE_BASELINE + t.sin() * SINE_AMPLITUDE;
        }
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + (self.size.x / 2.0).floor() - BULLET_WIDTH / 2.0,
            self.pos.y + self.size.y,
        )
    }
}

/// A bullet. Ownership is encoded in the sign of `speed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees off the vertical axis
    pub angle: f32,
    /// Negative = player-owned (up), positive = hostile (down)
    pub speed: f32,
}

impl Bullet {
    pub fn new(id: u32, shot: Shot) -> Self {
        Self {
            id,
            pos: shot.pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            angle: shot.angle,
            speed: shot.speed,
        }
    }

    #[inline]
    pub fn is_player_owned(&self) -> bool {
        self.speed < 0.0
    }

    #[inline]
    pub fn is_hostile(&self) -> bool {
        self.speed > 0.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos += velocity_from_angle(self.speed, self.angle);
    }
}

/// The boss that shows up every fifth round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    /// Health at spawn (for health bar scaling)
    pub max_health: i32,
    /// Signed horizontal speed, flips on side contact
    pub speed: f32,
    /// Pattern used by the most recent volley
    pub pattern: AttackPattern,
    pub shoot: Countdown,
    pub special: Countdown,
    pub reinforce: Countdown,
}

impl Boss {
    /// Spawn a boss for `round`. Health is fixed for the whole fight.
    pub fn new<R: Rng + ?Sized>(round: u32, field: &Field, rng: &mut R) -> Self {
        let size = Vec2::new(BOSS_WIDTH, BOSS_HEIGHT);
        let health = wave::boss_health_for_round(round);
        Self {
            pos: Vec2::new((field.width / 2.0).floor() - (size.x / 2.0).floor(), BOSS_Y),
            size,
            health,
            max_health: health,
            speed: BOSS_SPEED,
            pattern: AttackPattern::Single,
            shoot: Countdown::new(rng.random_range(BOSS_FIRST_SHOT_MIN_TICKS..=BOSS_FIRST_SHOT_MAX_TICKS)),
            special: Countdown::new(BOSS_SPECIAL_TICKS),
            reinforce: Countdown::new(BOSS_REINFORCE_TICKS),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Slide sideways, reversing once an edge reaches a side of the field
    pub fn advance(&mut self, field: &Field) {
        self.pos.x += self.speed;
        if field.touches_side(self.pos.x, self.size.x) {
            self.speed = -self.speed;
        }
    }

    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + (self.size.x / 2.0).floor() - BULLET_WIDTH / 2.0,
            self.pos.y + self.size.y,
        )
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Faster ship
    Speed,
    /// One more concurrent bullet
    Bullets,
}

impl PowerUpKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            PowerUpKind::Speed
        } else {
            PowerUpKind::Bullets
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
}

impl PowerUp {
    pub fn new(id: u32, pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(POWER_UP_SIZE, POWER_UP_SIZE),
            kind,
            speed: POWER_UP_SPEED,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG; every random decision draws from here
    pub(crate) rng: Pcg32,
    /// Play-field bounds
    pub field: Field,
    /// Current phase
    pub phase: GamePhase,
    /// Round counter (every fifth round is a boss round)
    pub round: u32,
    /// Level counter (bumped on every boss round)
    pub level: u32,
    /// Simulation tick counter (advances in every phase)
    pub time_ticks: u64,
    /// Player ship
    pub player: Player,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Live bullets (sorted by id)
    pub bullets: Vec<Bullet>,
    /// Active boss, if any
    pub boss: Option<Boss>,
    /// Falling power-ups (sorted by id)
    pub power_ups: Vec<PowerUp>,
    /// Shared horizontal direction of the formation (+1 right, -1 left)
    pub formation_dir: f32,
    /// Whether some enemy touched a side last tick (drop is edge-triggered)
    pub formation_at_side: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session on the default field
    pub fn new(seed: u64) -> Self {
        Self::with_field(seed, Field::default())
    }

    /// Create a new session on a custom field
    pub fn with_field(seed: u64, field: Field) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            phase: GamePhase::Menu,
            round: 1,
            level: 1,
            time_ticks: 0,
            player: Player::new(&field),
            enemies: Vec::new(),
            bullets: Vec::new(),
            boss: None,
            power_ups: Vec::new(),
            formation_dir: 1.0,
            formation_at_side: false,
            next_id: 1,
        };
        wave::spawn_formation(&mut state);
        state
    }

    /// Rebuild the session in place: fresh entities, round and level back to 1.
    /// The RNG stream and tick counter carry on.
    pub fn reset(&mut self) {
        self.round = 1;
        self.level = 1;
        self.player = Player::new(&self.field);
        self.enemies.clear();
        self.bullets.clear();
        self.boss = None;
        self.power_ups.clear();
        self.formation_dir = 1.0;
        self.formation_at_side = false;
        wave::spawn_formation(self);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an enemy moving with the formation
    pub fn spawn_enemy(&mut self, pos: Vec2, kind: EnemyKind) {
        let id = self.next_entity_id();
        let enemy = Enemy::new(id, pos, kind, self.formation_dir, &mut self.rng);
        self.enemies.push(enemy);
    }

    pub fn spawn_bullet(&mut self, shot: Shot) {
        let id = self.next_entity_id();
        self.bullets.push(Bullet::new(id, shot));
    }

    pub fn spawn_power_up(&mut self, pos: Vec2, kind: PowerUpKind) {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp::new(id, pos, kind));
    }

    /// Number of live player-owned bullets
    pub fn player_bullet_count(&self) -> usize {
        self.bullets.iter().filter(|b| b.is_player_owned()).count()
    }

    /// End the run
    pub fn game_over(&mut self, reason: &str) {
        if self.phase != GamePhase::GameOver {
            log::info!("Game over at round {} (level {}): {}", self.round, self.level, reason);
            self.phase = GamePhase::GameOver;
        }
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_session() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.round, 1);
        assert_eq!(state.level, 1);
        assert!(state.boss.is_none());
        assert!(!state.enemies.is_empty());
        assert_eq!(state.player.pos, Vec2::new(375.0, 540.0));
    }

    #[test]
    fn test_speed_buff_caps_and_refreshes() {
        let mut player = Player::new(&Field::default());
        player.apply_power_up(PowerUpKind::Speed);
        assert_eq!(player.speed, 7.0);
        player.apply_power_up(PowerUpKind::Speed);
        assert_eq!(player.speed, 9.0);
        player.speed_buff.tick();
        player.apply_power_up(PowerUpKind::Speed);
        assert_eq!(player.speed, 9.0);
        assert_eq!(player.speed_buff.remaining(), BUFF_DURATION_TICKS);
    }

    #[test]
    fn test_bullet_buff_reverts_to_base() {
        let mut player = Player::new(&Field::default());
        player.apply_power_up(PowerUpKind::Bullets);
        player.apply_power_up(PowerUpKind::Bullets);
        assert_eq!(player.max_bullets, 4);
        for _ in 0..BUFF_DURATION_TICKS - 1 {
            assert!(!player.tick_buffs().bullets);
        }
        assert!(player.tick_buffs().bullets);
        assert_eq!(player.max_bullets, PLAYER_BASE_MAX_BULLETS);
    }

    #[test]
    fn test_enemy_kinds() {
        let mut rng = Pcg32::seed_from_u64(1);
        let normal = Enemy::new(1, Vec2::new(100.0, 50.0), EnemyKind::Normal, 1.0, &mut rng);
        let sine = Enemy::new(2, Vec2::new(100.0, 50.0), EnemyKind::Sine, -1.0, &mut rng);
        assert_eq!(normal.health, 2);
        assert_eq!(sine.health, 1);
        assert_eq!(sine.speed, -ENEMY_SPEED);
        assert!((ENEMY_SHOOT_MIN_TICKS..=ENEMY_SHOOT_MAX_TICKS).contains(&normal.shoot.remaining()));
    }

    #[test]
    fn test_sine_enemy_overrides_height() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::new(1, Vec2::new(100.0, 400.0), EnemyKind::Sine, 1.0, &mut rng);
        enemy.sine_phase = 0.0;
        enemy.advance(0);
        assert_eq!(enemy.pos, Vec2::new(102.0, 50.0));

        let mut normal = Enemy::new(2, Vec2::new(100.0, 400.0), EnemyKind::Normal, 1.0, &mut rng);
        normal.advance(10);
        assert_eq!(normal.pos, Vec2::new(102.0, 400.0));
    }

    #[test]
    fn test_boss_bounces_off_sides() {
        let field = Field::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut boss = Boss::new(5, &field, &mut rng);
        assert_eq!(boss.pos.x, 350.0);
        boss.pos.x = field.width - boss.size.x - 2.0;
        boss.advance(&field);
        assert_eq!(boss.speed, -BOSS_SPEED);
        boss.advance(&field);
        assert_eq!(boss.pos.x, field.width - boss.size.x - 2.0);
    }

    #[test]
    fn test_power_up_falls() {
        let mut power_up = PowerUp::new(1, Vec2::new(10.0, 10.0), PowerUpKind::Speed);
        power_up.advance();
        assert_eq!(power_up.pos, Vec2::new(10.0, 12.0));
    }

    #[test]
    fn test_reset_rebuilds_session() {
        let mut state = GameState::new(11);
        let columns: Vec<f32> = state.enemies.iter().map(|e| e.pos.x).collect();
        state.round = 7;
        state.level = 2;
        state.enemies.clear();
        state.player.apply_power_up(PowerUpKind::Bullets);
        state.reset();
        assert_eq!(state.round, 1);
        assert_eq!(state.level, 1);
        assert_eq!(state.player.max_bullets, PLAYER_BASE_MAX_BULLETS);
        let after: Vec<f32> = state.enemies.iter().map(|e| e.pos.x).collect();
        assert_eq!(columns, after);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_field(
            moves in proptest::collection::vec((-1i32..=1, -1i32..=1), 1..400),
            speed in 1.0f32..20.0,
        ) {
            let field = Field::default();
            let mut player = Player::new(&field);
            player.speed = speed;
            for (dx, dy) in moves {
                player.advance(Vec2::new(dx as f32, dy as f32), &field);
                prop_assert!(player.pos.x >= 0.0 && player.pos.x <= field.width - player.size.x);
                prop_assert!(player.pos.y >= 0.0 && player.pos.y <= field.height - player.size.y);
            }
        }
    }
}
