//! Fixed-rate game loop
//!
//! Real time is fed into an accumulator and drained in whole ticks, capped per
//! frame so a stalled host cannot queue an unbounded catch-up. One snapshot is
//! presented after the substeps of each frame.

use std::time::{Duration, Instant};

use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, TickInput, TickOutcome, tick};
use crate::snapshot::Snapshot;

/// Largest frame delta fed into the accumulator
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

/// Supplies the input for each tick
pub trait InputSource {
    /// Called once per tick with the most recent snapshot
    fn poll(&mut self, snapshot: &Snapshot) -> TickInput;
}

/// Consumes a snapshot once per frame
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The session asked to leave (quit, exit or close)
    Exited,
    /// The configured tick limit was reached
    TickLimit,
}

/// Totals reported when a run ends
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub frames: u64,
    pub round: u32,
    pub level: u32,
    pub phase: GamePhase,
    pub stop: StopReason,
}

pub struct Driver<I, P> {
    state: GameState,
    input: I,
    presenter: P,
    snapshot: Snapshot,
    accumulator: Duration,
    tick_period: Duration,
    max_substeps: u32,
    max_ticks: Option<u64>,
    ticks: u64,
    frames: u64,
    stopped: Option<StopReason>,
}

impl<I: InputSource, P: Presenter> Driver<I, P> {
    pub fn new(state: GameState, input: I, presenter: P, settings: &Settings) -> Self {
        let snapshot = Snapshot::capture(&state);
        Self {
            state,
            input,
            presenter,
            snapshot,
            accumulator: Duration::ZERO,
            tick_period: settings.tick_period(),
            max_substeps: settings.max_substeps,
            max_ticks: settings.max_ticks,
            ticks: 0,
            frames: 0,
            stopped: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stopped(&self) -> Option<StopReason> {
        self.stopped
    }

    /// Run exactly one tick: poll input, advance the session, refresh the
    /// snapshot. Does nothing once the run has stopped.
    pub fn step(&mut self) -> Option<StopReason> {
        if self.stopped.is_some() {
            return self.stopped;
        }
        if self.max_ticks.is_some_and(|limit| self.ticks >= limit) {
            log::info!("Tick limit reached after {} ticks", self.ticks);
            self.stopped = Some(StopReason::TickLimit);
            return self.stopped;
        }

        let input = self.input.poll(&self.snapshot);
        let outcome = tick(&mut self.state, &input);
        self.ticks += 1;
        self.snapshot = Snapshot::capture(&self.state);

        if outcome == TickOutcome::Exit {
            log::info!("Exit requested at tick {}", self.ticks);
            self.stopped = Some(StopReason::Exited);
        }
        self.stopped
    }

    /// Feed one frame's worth of real time. Runs as many whole ticks as the
    /// accumulator holds (up to the substep cap), then presents once.
    pub fn advance(&mut self, elapsed: Duration) -> Option<StopReason> {
        self.accumulator += elapsed.min(MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= self.tick_period && substeps < self.max_substeps {
            self.accumulator -= self.tick_period;
            substeps += 1;
            if self.step().is_some() {
                break;
            }
        }

        self.presenter.present(&self.snapshot);
        self.frames += 1;
        self.stopped
    }

    /// Drive the session in real time until it exits or hits the tick limit
    pub fn run(mut self) -> RunSummary {
        log::info!(
            "Running at {} ticks/s (seed {})",
            (Duration::from_secs(1).as_nanos() / self.tick_period.as_nanos().max(1)),
            self.state.seed
        );

        let mut last = Instant::now();
        let stop = loop {
            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;

            if let Some(reason) = self.advance(elapsed) {
                break reason;
            }

            // Sleep until the accumulator holds the next tick
            let wait = self.tick_period.saturating_sub(self.accumulator);
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
        };

        self.summary(stop)
    }

    fn summary(&self, stop: StopReason) -> RunSummary {
        RunSummary {
            seed: self.state.seed,
            ticks: self.ticks,
            frames: self.frames,
            round: self.state.round,
            level: self.state.level,
            phase: self.state.phase,
            stop,
        }
    }
}
