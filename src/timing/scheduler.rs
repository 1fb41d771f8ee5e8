//! Input/timing scheduler: gravity, auto-shift, auto-drop, the layered lock
//! delays, and the pause/resume countdown.
//!
//! The scheduler owns no clock. The host calls [`Scheduler::key_down`] /
//! [`Scheduler::key_up`] for edge events (OS key repeats must be filtered out
//! by the caller) and [`Scheduler::advance`] with elapsed wall time; the
//! scheduler drives the [`Game`] accordingly.
//!
//! Lock delays are layered:
//! - L1 (short) arms when a soft drop is refused and is cleared by any
//!   successful shift or rotation.
//! - L2 (long) arms alongside L1 but only rotations clear it, which caps how
//!   long a piece can be stalled by shifting alone.
//! - L3 is the infinite-lock window: while it is active a refused gravity
//!   step does not force a lock, letting the piece be finessed indefinitely
//!   until the window is consumed by the next hard drop.

use crate::config::TimingConfig;
use crate::core::game::Game;
use crate::timing::timer::{Interval, Timer};
use crate::types::Action;

pub struct Scheduler {
    cfg: TimingConfig,
    paused: bool,

    held_left: bool,
    held_right: bool,
    held_soft_drop: bool,

    gravity: Interval,
    /// Delay before horizontal auto-repeat kicks in.
    das: Timer,
    /// Horizontal auto-repeat cadence once DAS has elapsed.
    arr: Interval,
    /// Soft-drop auto-repeat; one-shot, re-armed while the key is held.
    auto_drop: Timer,

    l1: Timer,
    l2: Timer,
    l3_rearm: Timer,
    l3_active: bool,

    countdown: Timer,
    countdown_left: Option<u32>,
}

impl Scheduler {
    pub fn new(cfg: TimingConfig) -> Self {
        Self {
            paused: true,
            held_left: false,
            held_right: false,
            held_soft_drop: false,
            gravity: Interval::new(cfg.gravity_ms),
            das: Timer::default(),
            arr: Interval::new(cfg.arr_ms),
            auto_drop: Timer::default(),
            l1: Timer::default(),
            l2: Timer::default(),
            l3_rearm: Timer::default(),
            l3_active: false,
            countdown: Timer::default(),
            countdown_left: None,
            cfg,
        }
    }

    /// Begin play immediately, no countdown.
    pub fn start(&mut self) {
        self.paused = false;
        self.gravity.restart();
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn l3_active(&self) -> bool {
        self.l3_active
    }

    pub fn config(&self) -> &TimingConfig {
        &self.cfg
    }

    /// Swap in new delays. Running intervals keep their phase; armed one-shot
    /// timers keep their original deadline.
    pub fn set_config(&mut self, cfg: TimingConfig) {
        self.cfg = cfg;
        self.gravity.set_period(cfg.gravity_ms);
        self.arr.set_period(cfg.arr_ms);
    }

    /// Handle a key-press edge for a logical action.
    pub fn key_down(&mut self, game: &mut Game, action: Action) {
        if self.paused || game.game_over() {
            return;
        }
        match action {
            Action::HardDrop => {
                self.hard_drop(game);
                self.das.arm(self.cfg.das_ms);
                self.arr.stop();
            }
            Action::SoftDrop => {
                self.held_soft_drop = true;
                if !game.try_move(1, 0) {
                    self.arm_locks();
                }
                self.auto_drop.arm(self.cfg.soft_drop_ms);
            }
            Action::MoveLeft => {
                self.held_left = true;
                if game.try_move(0, -1) {
                    self.l1.cancel();
                }
                self.das.arm(self.cfg.das_ms);
                self.arr.stop();
            }
            Action::MoveRight => {
                self.held_right = true;
                if game.try_move(0, 1) {
                    self.l1.cancel();
                }
                self.das.arm(self.cfg.das_ms);
                self.arr.stop();
            }
            Action::RotateCw => {
                if game.rotate(1) {
                    self.l1.cancel();
                    self.l2.cancel();
                }
            }
            Action::RotateCcw => {
                if game.rotate(-1) {
                    self.l1.cancel();
                    self.l2.cancel();
                }
            }
            Action::Hold => {
                // A fresh spawn gets a full gravity period, same as the
                // spawn after a lock.
                if game.hold() {
                    self.gravity.restart();
                }
            }
        }
    }

    /// Handle a key-release edge.
    pub fn key_up(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.held_left = false,
            Action::MoveRight => self.held_right = false,
            Action::SoftDrop => self.held_soft_drop = false,
            _ => {}
        }
    }

    /// Drive all timers forward by `elapsed_ms`. The countdown runs even
    /// while paused; everything else is frozen until play resumes.
    pub fn advance(&mut self, game: &mut Game, elapsed_ms: u32) {
        if self.countdown.advance(elapsed_ms) {
            self.countdown_step(game);
        }
        if self.paused || game.game_over() {
            return;
        }

        let gravity_fires = self.gravity.advance(elapsed_ms);
        for _ in 0..gravity_fires {
            self.gravity_tick(game);
            if game.game_over() {
                return;
            }
        }

        // When DAS fires mid-slice, only the time past its deadline counts
        // toward the first auto-repeat period.
        let arr_fires = match self.das.advance_surplus(elapsed_ms) {
            Some(surplus) => {
                self.auto_shift(game);
                self.arr.restart();
                self.arr.advance(surplus)
            }
            None => self.arr.advance(elapsed_ms),
        };
        for _ in 0..arr_fires {
            self.auto_shift(game);
        }

        if self.auto_drop.advance(elapsed_ms) && self.held_soft_drop {
            if !game.try_move(1, 0) {
                self.arm_locks();
            }
            self.auto_drop.arm(self.cfg.soft_drop_ms);
        }

        if self.l1.advance(elapsed_ms) {
            log::debug!("l1 lock delay expired");
            self.hard_drop(game);
        }
        if self.l2.advance(elapsed_ms) {
            log::debug!("l2 lock ceiling expired");
            self.hard_drop(game);
        }
        if self.l3_rearm.advance(elapsed_ms) {
            self.l3_active = true;
        }
    }

    /// Freeze play. Held keys are forgotten so nothing auto-repeats into the
    /// resumed game; any pending countdown is abandoned.
    pub fn pause(&mut self) {
        self.l1.cancel();
        self.l2.cancel();
        self.auto_drop.cancel();
        self.das.cancel();
        self.arr.stop();
        self.held_left = false;
        self.held_right = false;
        self.held_soft_drop = false;
        self.countdown.cancel();
        self.countdown_left = None;
        self.paused = true;
    }

    /// Resume after `seconds` countdown steps. Zero resumes immediately;
    /// otherwise the overlay shows `seconds`, then counts down one number per
    /// step until play restarts.
    pub fn resume(&mut self, game: &mut Game, seconds: u32) {
        if seconds == 0 {
            self.countdown.cancel();
            self.countdown_left = None;
            self.paused = false;
            self.gravity.restart();
            game.redraw();
            return;
        }
        game.show_overlay_number(seconds);
        self.countdown_left = Some(seconds);
        self.countdown.arm(self.cfg.countdown_step_ms);
    }

    fn countdown_step(&mut self, game: &mut Game) {
        let Some(left) = self.countdown_left else {
            return;
        };
        let next = left.saturating_sub(1);
        if next == 0 {
            self.countdown_left = None;
            self.paused = false;
            self.gravity.restart();
            game.redraw();
        } else {
            game.show_overlay_number(next);
            self.countdown_left = Some(next);
            self.countdown.arm(self.cfg.countdown_step_ms);
        }
    }

    /// One gravity step. A refused descent locks the piece unless the L2
    /// ceiling is already counting (it owns the lock decision) or the
    /// infinite-lock window is active.
    fn gravity_tick(&mut self, game: &mut Game) {
        if !game.try_move(1, 0) && !self.l2.pending() && !self.l3_active {
            log::debug!("gravity lock");
            self.hard_drop(game);
        }
    }

    /// One auto-repeat step for whichever directions are held. The repeat
    /// chain dies when neither direction is held.
    fn auto_shift(&mut self, game: &mut Game) {
        if !self.held_left && !self.held_right {
            self.arr.stop();
            return;
        }
        if self.held_left && game.try_move(0, -1) {
            self.l1.cancel();
        }
        if self.held_right && game.try_move(0, 1) {
            self.l1.cancel();
        }
    }

    fn arm_locks(&mut self) {
        self.l1.arm_if_idle(self.cfg.l1_ms);
        self.l2.arm_if_idle(self.cfg.l2_ms);
    }

    /// Lock the piece and reset the per-piece timing state: lock delays are
    /// cancelled, the infinite-lock window is consumed and re-armed, and
    /// gravity restarts its phase for the fresh piece.
    fn hard_drop(&mut self, game: &mut Game) {
        game.hard_drop();
        self.l3_active = false;
        self.l1.cancel();
        self.l2.cancel();
        self.l3_rearm.arm(self.cfg.l3_ms);
        self.gravity.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::events::NullSink;

    fn setup() -> (Scheduler, Game) {
        let mut scheduler = Scheduler::new(TimingConfig::default());
        scheduler.start();
        let game = Game::new(GameConfig::default(), 42, Box::new(NullSink));
        (scheduler, game)
    }

    #[test]
    fn test_gravity_descends_one_row_per_interval() {
        let (mut scheduler, mut game) = setup();
        let start = game.current_cells()[0].row;
        scheduler.advance(&mut game, 999);
        assert_eq!(game.current_cells()[0].row, start);
        scheduler.advance(&mut game, 1);
        assert_eq!(game.current_cells()[0].row, start + 1);
    }

    #[test]
    fn test_paused_scheduler_ignores_input_and_time() {
        let (mut scheduler, mut game) = setup();
        scheduler.pause();
        let before = *game.current_cells();
        scheduler.key_down(&mut game, Action::MoveLeft);
        scheduler.advance(&mut game, 10_000);
        assert_eq!(*game.current_cells(), before);
    }

    #[test]
    fn test_key_down_moves_immediately() {
        let (mut scheduler, mut game) = setup();
        let col = game.current_cells()[0].col;
        scheduler.key_down(&mut game, Action::MoveLeft);
        assert_eq!(game.current_cells()[0].col, col - 1);
    }

    #[test]
    fn test_das_then_arr_cadence() {
        let (mut scheduler, mut game) = setup();
        let col = game.current_cells()[0].col;
        scheduler.key_down(&mut game, Action::MoveLeft);
        // DAS window: no repeats yet.
        scheduler.advance(&mut game, 99);
        assert_eq!(game.current_cells()[0].col, col - 1);
        // DAS fires one repeat, then ARR every 25ms.
        scheduler.advance(&mut game, 1);
        assert_eq!(game.current_cells()[0].col, col - 2);
        scheduler.advance(&mut game, 25);
        assert_eq!(game.current_cells()[0].col, col - 3);
        // Release: the chain dies.
        scheduler.key_up(Action::MoveLeft);
        scheduler.advance(&mut game, 250);
        assert_eq!(game.current_cells()[0].col, col - 3);
    }

    #[test]
    fn test_coarse_advance_credits_arr_only_past_das() {
        let (mut scheduler, mut game) = setup();
        let col = game.current_cells()[0].col;
        scheduler.key_down(&mut game, Action::MoveRight);
        // One slice spanning the whole DAS window plus 1ms: the edge move,
        // the DAS repeat, and nothing more - the leftover millisecond is far
        // short of an ARR period.
        scheduler.advance(&mut game, 101);
        assert_eq!(game.current_cells()[0].col, col + 2);
        scheduler.advance(&mut game, 23);
        assert_eq!(game.current_cells()[0].col, col + 2);
        scheduler.advance(&mut game, 1);
        assert_eq!(game.current_cells()[0].col, col + 3);
    }

    #[test]
    fn test_hold_restarts_gravity_phase() {
        let (mut scheduler, mut game) = setup();
        scheduler.advance(&mut game, 900);
        scheduler.key_down(&mut game, Action::Hold);
        let row = game.current_cells()[0].row;
        // The swapped-in piece starts a fresh gravity period.
        scheduler.advance(&mut game, 900);
        assert_eq!(game.current_cells()[0].row, row);
        scheduler.advance(&mut game, 100);
        assert_eq!(game.current_cells()[0].row, row + 1);
        // A refused second hold leaves the phase alone.
        scheduler.advance(&mut game, 900);
        scheduler.key_down(&mut game, Action::Hold);
        scheduler.advance(&mut game, 100);
        assert_eq!(game.current_cells()[0].row, row + 2);
    }

    #[test]
    fn test_hard_drop_consumes_infinite_lock_window() {
        let (mut scheduler, mut game) = setup();
        assert!(!scheduler.l3_active());
        scheduler.key_down(&mut game, Action::HardDrop);
        assert!(!scheduler.l3_active());
        scheduler.advance(&mut game, 20_000);
        assert!(scheduler.l3_active());
        scheduler.key_down(&mut game, Action::HardDrop);
        assert!(!scheduler.l3_active());
    }

    #[test]
    fn test_resume_counts_down_before_unpausing() {
        let (mut scheduler, mut game) = setup();
        scheduler.pause();
        scheduler.resume(&mut game, 3);
        assert!(scheduler.paused());
        scheduler.advance(&mut game, 800);
        scheduler.advance(&mut game, 800);
        assert!(scheduler.paused());
        scheduler.advance(&mut game, 800);
        assert!(!scheduler.paused());
    }

    #[test]
    fn test_resume_zero_is_immediate() {
        let (mut scheduler, mut game) = setup();
        scheduler.pause();
        scheduler.resume(&mut game, 0);
        assert!(!scheduler.paused());
    }

    #[test]
    fn test_pause_clears_held_keys() {
        let (mut scheduler, mut game) = setup();
        scheduler.key_down(&mut game, Action::MoveLeft);
        scheduler.pause();
        scheduler.resume(&mut game, 0);
        let col = game.current_cells()[0].col;
        // No auto-shift resumes from the forgotten key.
        scheduler.advance(&mut game, 500);
        assert_eq!(game.current_cells()[0].col, col);
    }
}
