//! Space Invaders - a fixed-timestep arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, combat, session phases)
//! - `snapshot`: Read-only render handoff produced after every frame
//! - `driver`: Fixed-rate game loop feeding input and presenting snapshots
//! - `autopilot`: Scripted input source for headless runs
//! - `settings`: Field bounds, tick rate and run limits

pub mod autopilot;
pub mod driver;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use driver::{Driver, InputSource, Presenter, RunSummary, StopReason};
pub use settings::{Settings, SettingsError};
pub use snapshot::Snapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Distance from the bottom edge to the player's top edge at spawn
    pub const PLAYER_SPAWN_OFFSET: f32 = 60.0;
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_SPEED: f32 = 9.0;
    pub const PLAYER_BASE_MAX_BULLETS: u32 = 2;
    /// Negative speed marks a bullet as player-owned (travels up)
    pub const PLAYER_BULLET_SPEED: f32 = -10.0;
    /// Half-width of the fan arc used once max bullets exceeds the base (degrees)
    pub const PLAYER_FAN_HALF_ARC: f32 = 30.0;

    /// Power-up buffs
    pub const SPEED_BUFF_STEP: f32 = 2.0;
    pub const BUFF_DURATION_TICKS: u32 = 1200;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    /// Vertical drop applied to the whole formation on a bound bounce
    pub const ENEMY_DROP: f32 = 20.0;
    pub const ENEMY_SHOOT_MIN_TICKS: u32 = 60;
    pub const ENEMY_SHOOT_MAX_TICKS: u32 = 180;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;
    pub const NORMAL_ENEMY_HEALTH: i32 = 2;
    pub const SINE_ENEMY_HEALTH: i32 = 1;
    /// Sine enemies ride `SINE_BASELINE + sin(tick * SINE_FREQUENCY + phase) * SINE_AMPLITUDE`
    pub const SINE_BASELINE: f32 = 50.0;
    pub const SINE_AMPLITUDE: f32 = 50.0;
    pub const SINE_FREQUENCY: f32 = 0.05;
    pub const SINE_SPREAD_ANGLES: [f32; 3] = [-15.0, 0.0, 15.0];

    /// Formation layout
    pub const FORMATION_START_X: f32 = 50.0;
    pub const FORMATION_SPACING: f32 = 60.0;
    /// Formation stops this far from the right edge
    pub const FORMATION_MARGIN: f32 = 50.0;
    pub const FORMATION_Y: f32 = 50.0;

    /// Bullet size
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;

    /// Boss defaults
    pub const BOSS_WIDTH: f32 = 100.0;
    pub const BOSS_HEIGHT: f32 = 80.0;
    pub const BOSS_Y: f32 = 50.0;
    pub const BOSS_SPEED: f32 = 3.0;
    pub const BOSS_BASE_HEALTH: f64 = 100.0;
    /// Boss health multiplier per boss encounter after the first
    pub const BOSS_HEALTH_GROWTH: f64 = 1.25;
    /// Every Nth round is a boss round
    pub const BOSS_ROUND_INTERVAL: u32 = 5;
    pub const BOSS_HIT_DAMAGE: i32 = 10;
    pub const BOSS_FIRST_SHOT_MIN_TICKS: u32 = 60;
    pub const BOSS_FIRST_SHOT_MAX_TICKS: u32 = 120;
    pub const BOSS_SHOT_MIN_TICKS: u32 = 30;
    pub const BOSS_SHOT_MAX_TICKS: u32 = 120;
    pub const BOSS_SPECIAL_TICKS: u32 = 300;
    pub const BOSS_REINFORCE_TICKS: u32 = 600;
    pub const BOSS_REINFORCE_COUNT: usize = 4;
    pub const BOSS_SPREAD_ANGLES: [f32; 5] = [-40.0, -20.0, 0.0, 20.0, 40.0];
    pub const BOSS_SPREAD_SPEED: f32 = 6.0;
    pub const BOSS_COLUMN_OFFSETS: [f32; 3] = [-20.0, 0.0, 20.0];
    pub const BOSS_COLUMN_SPEED: f32 = 8.0;
    pub const BARRAGE_COUNT: usize = 10;
    pub const BARRAGE_MIN_SPEED: f32 = 5.0;
    pub const BARRAGE_MAX_SPEED: f32 = 7.0;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 20.0;
    pub const POWER_UP_SPEED: f32 = 2.0;
    /// Chance that a destroyed enemy drops a power-up
    pub const POWER_UP_DROP_CHANCE: f64 = 0.5;
}

/// Decompose a scalar speed along an angle in degrees.
///
/// Angle 0 runs straight along the vertical axis; the sign of `speed`
/// picks up (negative) or down (positive).
#[inline]
pub fn velocity_from_angle(speed: f32, angle_deg: f32) -> Vec2 {
    let angle = angle_deg.to_radians();
    Vec2::new(speed * angle.sin(), speed * angle.cos())
}

/// Whole seconds remaining on a tick countdown (for HUD display)
#[inline]
pub fn ticks_to_seconds(ticks: u32) -> u32 {
    ticks / consts::TICK_RATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_straight_shot() {
        let v = velocity_from_angle(-10.0, 0.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y + 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_angled_shot() {
        let v = velocity_from_angle(5.0, 30.0);
        assert!((v.x - 2.5).abs() < 1e-4);
        assert!((v.y - 5.0 * 30f32.to_radians().cos()).abs() < 1e-4);
    }

    #[test]
    fn test_ticks_to_seconds() {
        assert_eq!(ticks_to_seconds(1200), 20);
        assert_eq!(ticks_to_seconds(59), 0);
        assert_eq!(ticks_to_seconds(61), 1);
    }
}
