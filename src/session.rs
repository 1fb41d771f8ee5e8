//! Session facade: one game plus its scheduler behind a single handle.
//!
//! Hosts that do not want to wire [`Game`] and [`Scheduler`] together by hand
//! use this. The session forwards key edges and elapsed time, pauses the
//! clock when the game ends, and restarts rounds with the usual countdown.

use serde_json::Value;

use crate::config::Config;
use crate::core::game::Game;
use crate::events::EventSink;
use crate::timing::Scheduler;
use crate::types::Action;

/// Countdown steps shown when a round starts or resumes.
const RESUME_SECONDS: u32 = 3;

pub struct Session {
    game: Game,
    timing: Scheduler,
}

impl Session {
    /// Build a session. Play is paused until [`Session::start`] or
    /// [`Session::resume`] is called.
    pub fn new(config: Config, seed: u64, events: Box<dyn EventSink>) -> Self {
        Self {
            game: Game::new(config.game, seed, events),
            timing: Scheduler::new(config.timing),
        }
    }

    /// Begin play immediately, no countdown.
    pub fn start(&mut self) {
        self.timing.start();
    }

    /// Key-press edge. The caller must filter out OS auto-repeat.
    pub fn key_down(&mut self, action: Action) {
        self.timing.key_down(&mut self.game, action);
        self.freeze_if_over();
    }

    /// Key-release edge.
    pub fn key_up(&mut self, action: Action) {
        self.timing.key_up(action);
    }

    /// Report elapsed wall time.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.timing.advance(&mut self.game, elapsed_ms);
        self.freeze_if_over();
    }

    pub fn pause(&mut self) {
        self.timing.pause();
    }

    /// Resume with a countdown of `seconds` overlay steps.
    pub fn resume(&mut self, seconds: u32) {
        if self.game.game_over() {
            return;
        }
        self.timing.resume(&mut self.game, seconds);
    }

    /// Garbage lines pushed in from an opponent.
    pub fn receive_lines(&mut self, lines: usize) {
        self.game.receive_lines(lines);
    }

    /// Fresh round: reset the engine, then count back in.
    pub fn reset(&mut self) {
        self.game.reset();
        self.timing.pause();
        self.timing.resume(&mut self.game, RESUME_SECONDS);
    }

    /// Apply a flat named-option timing delta, e.g. deserialized settings.
    pub fn apply_config(&mut self, options: &serde_json::Map<String, Value>) {
        let mut cfg = *self.timing.config();
        cfg.apply_named(options);
        self.timing.set_config(cfg);
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn paused(&self) -> bool {
        self.timing.paused()
    }

    pub fn game_over(&self) -> bool {
        self.game.game_over()
    }

    fn freeze_if_over(&mut self) {
        if self.game.game_over() && !self.timing.paused() {
            self.timing.pause();
        }
    }
}
