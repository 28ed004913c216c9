//! Tick countdowns
//!
//! Shoot cooldowns, buff durations and boss cycles are all plain tick
//! counters. A countdown reports expiry exactly once, on the tick it reaches
//! zero; recurring timers are reseeded by their owner.

use serde::{Deserialize, Serialize};

/// A tick counter decremented once per tick while positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    /// Idle countdown (never fires until reset)
    pub fn idle() -> Self {
        Self::default()
    }

    /// Advance one tick. Returns true on the tick the countdown hits zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Restart with a fresh duration (does not stack with what is left)
    pub fn reset(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }
}
