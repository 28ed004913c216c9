//! Game simulation
//!
//! Everything that decides what happens in a session. Given the same seed and
//! the same per-tick input the session evolves identically: time is counted in
//! ticks, every random draw comes from the session RNG, and entity lists are
//! kept in id order. Nothing here draws, plays sound or reads the clock.

pub mod attack;
pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;
pub mod timer;
pub mod wave;

pub use attack::{AttackPattern, Shot};
pub use collision::{CombatReport, resolve_combat};
pub use geometry::{Aabb, Field};
pub use state::{
    Boss, Bullet, Enemy, EnemyKind, GamePhase, GameState, Player, PowerUp, PowerUpKind,
};
pub use tick::{HeldKeys, InputEvent, TickInput, TickOutcome, apply_event, tick};
pub use timer::Countdown;
pub use wave::{boss_health_for_round, formation_columns};
