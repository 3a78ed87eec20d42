//! Intro → Playing → GameOver state machine and the tick scheduler.
//!
//! All state changes happen on the caller's thread: the front-end feeds
//! commands and calls `tick` when the scheduler says one is due.  A tick
//! always finishes (including its re-arm decision) before the next one is
//! considered.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::info;

use crate::compute::{self, TickOutcome};
use crate::config::GameConfig;
use crate::entities::{Direction, Field, Fruit, GameState, GameStatus, Player};
use crate::score::{HighScoreStore, HighScoreTracker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    Move(Direction),
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// One-shot, re-armed timer.  Once closed it never arms again.
#[derive(Clone, Debug)]
pub struct Scheduler {
    interval: Duration,
    next_due: Option<Instant>,
    closed: bool,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            closed: false,
        }
    }

    /// Schedule the next tick one interval from `now`.  Returns false when
    /// the scheduler has been closed.
    pub fn arm(&mut self, now: Instant) -> bool {
        if self.closed {
            return false;
        }
        self.next_due = Some(now + self.interval);
        true
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.next_due = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        matches!(self.next_due, Some(at) if now >= at)
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|at| at.saturating_duration_since(now))
    }

    /// Consume the pending arm.  False means no tick may run.
    fn begin_tick(&mut self) -> bool {
        if self.closed || self.next_due.is_none() {
            return false;
        }
        self.next_due = None;
        true
    }
}

// ── Render snapshot ───────────────────────────────────────────────────────────

/// Read-only view of everything a renderer needs for one frame.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub status: GameStatus,
    pub field: Field,
    /// `None` on the intro screen.
    pub player: Option<&'a Player>,
    /// Empty on the intro screen.
    pub fruits: &'a [Fruit],
    pub score: u32,
    pub lives: u32,
    pub high_score: u32,
    pub punchline: Option<&'static str>,
    pub new_high_score: bool,
    pub music_playing: bool,
}

// ── Game ──────────────────────────────────────────────────────────────────────

pub struct Game<S> {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler,
    high_scores: HighScoreTracker<S>,
    new_high_score: bool,
}

impl<S: HighScoreStore> Game<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        let state = compute::init_state(&config);
        let scheduler = Scheduler::new(config.tick_interval());
        Self {
            config,
            state,
            scheduler,
            high_scores: HighScoreTracker::new(store),
            new_high_score: false,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tests and tooling that need to stage a position.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn high_scores(&self) -> &HighScoreTracker<S> {
        &self.high_scores
    }

    /// Apply one command.  Commands that do not belong to the current state
    /// are accepted and ignored.
    pub fn handle(&mut self, command: Command, now: Instant, rng: &mut impl Rng) {
        if self.scheduler.is_closed() {
            return;
        }
        match (self.state.status, command) {
            (GameStatus::Intro, Command::Start) | (GameStatus::GameOver, Command::Restart) => {
                self.enter_playing(now, rng);
            }
            (GameStatus::Playing, Command::Move(direction)) => {
                let field = self.state.field;
                compute::move_player(
                    &mut self.state.player,
                    direction,
                    &field,
                    self.config.player_step,
                );
            }
            _ => {}
        }
    }

    /// Run one scheduled tick.  Does nothing unless a tick is armed.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) -> TickOutcome {
        if !self.scheduler.begin_tick() {
            return TickOutcome::default();
        }
        let outcome = compute::tick(&mut self.state, &self.config, rng);
        if outcome.lives_exhausted {
            self.enter_game_over(rng);
        } else if self.is_running() {
            self.scheduler.arm(now);
        }
        outcome
    }

    /// Stop scheduling for good.  Call before tearing down any output.
    pub fn close(&mut self) {
        self.scheduler.close();
    }

    /// Playing and not yet closed.
    pub fn is_running(&self) -> bool {
        compute::is_running(&self.state) && !self.scheduler.is_closed()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let visible = self.state.status != GameStatus::Intro;
        Snapshot {
            status: self.state.status,
            field: self.state.field,
            player: visible.then_some(&self.state.player),
            fruits: if visible { &self.state.fruits[..] } else { &[] },
            score: self.state.session.score,
            lives: self.state.session.lives,
            high_score: self.high_scores.best(),
            punchline: self.state.punchline,
            new_high_score: self.new_high_score,
            music_playing: !self.scheduler.is_closed(),
        }
    }

    fn enter_playing(&mut self, now: Instant, rng: &mut impl Rng) {
        compute::reset_run(&mut self.state, &self.config, rng);
        self.new_high_score = false;
        self.scheduler.arm(now);
        info!(
            lives = self.state.session.lives,
            pool = self.state.fruits.len(),
            "run started"
        );
    }

    fn enter_game_over(&mut self, rng: &mut impl Rng) {
        self.scheduler.stop();
        self.state.status = GameStatus::GameOver;
        let result = self.high_scores.record_end(self.state.session.score);
        self.new_high_score = result.new_high;
        self.state.punchline = Some(compute::pick_punchline(rng));
        info!(
            score = self.state.session.score,
            high_score = result.value,
            new_high = result.new_high,
            ticks = self.state.frame,
            "run over"
        );
    }
}
