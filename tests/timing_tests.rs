//! Timing tests - lock-delay layering, auto-repeat, and the resume countdown
//! driven through the scheduler and session.

use std::cell::RefCell;
use std::rc::Rc;

use linefall::config::{Config, GameConfig, TimingConfig};
use linefall::core::Game;
use linefall::events::{EventSink, NullSink};
use linefall::timing::Scheduler;
use linefall::types::Action;

fn setup() -> (Scheduler, Game) {
    setup_with(TimingConfig::default())
}

fn setup_with(cfg: TimingConfig) -> (Scheduler, Game) {
    // RUST_LOG=debug surfaces the lock-delay and gravity traces.
    let _ = env_logger::builder().is_test(true).try_init();
    let mut scheduler = Scheduler::new(cfg);
    scheduler.start();
    let game = Game::new(GameConfig::default(), 404, Box::new(NullSink));
    (scheduler, game)
}

fn ground(game: &mut Game) {
    while game.try_move(1, 0) {}
}

#[test]
fn test_l1_locks_a_grounded_piece() {
    let (mut scheduler, mut game) = setup();
    ground(&mut game);
    let spawned = game.pieces_spawned();

    // A refused soft drop arms the short lock delay.
    scheduler.key_down(&mut game, Action::SoftDrop);
    scheduler.key_up(Action::SoftDrop);
    scheduler.advance(&mut game, 499);
    assert_eq!(game.pieces_spawned(), spawned);
    scheduler.advance(&mut game, 1);
    assert_eq!(game.pieces_spawned(), spawned + 1, "l1 should lock at 500ms");
}

#[test]
fn test_shift_postpones_l1_but_not_l2() {
    let (mut scheduler, mut game) = setup();
    ground(&mut game);
    let spawned = game.pieces_spawned();

    scheduler.key_down(&mut game, Action::SoftDrop);
    scheduler.key_up(Action::SoftDrop);
    // Successful shift cancels L1; L2 keeps counting.
    scheduler.key_down(&mut game, Action::MoveLeft);
    scheduler.key_up(Action::MoveLeft);
    scheduler.advance(&mut game, 600);
    assert_eq!(game.pieces_spawned(), spawned, "shift should defuse l1");

    // The L2 ceiling still fires at 5000ms from the original arm.
    scheduler.advance(&mut game, 4400);
    assert_eq!(game.pieces_spawned(), spawned + 1, "l2 ignores shifting");
}

#[test]
fn test_rotation_clears_both_lock_tiers() {
    let (mut scheduler, mut game) = setup();
    ground(&mut game);
    let spawned = game.pieces_spawned();

    scheduler.key_down(&mut game, Action::SoftDrop);
    scheduler.key_up(Action::SoftDrop);
    scheduler.key_down(&mut game, Action::RotateCw);
    // With both timers defused, neither 500ms nor 5000ms locks the piece.
    scheduler.advance(&mut game, 600);
    assert_eq!(game.pieces_spawned(), spawned);
    scheduler.advance(&mut game, 399);
    assert_eq!(game.pieces_spawned(), spawned);
}

#[test]
fn test_gravity_defers_to_a_pending_l2() {
    let (mut scheduler, mut game) = setup();
    ground(&mut game);
    let spawned = game.pieces_spawned();

    scheduler.key_down(&mut game, Action::SoftDrop);
    scheduler.key_up(Action::SoftDrop);
    scheduler.key_down(&mut game, Action::MoveLeft);
    scheduler.key_up(Action::MoveLeft);

    // Gravity fires at 1000 and 2000 against a grounded piece, but the
    // pending L2 owns the lock decision.
    scheduler.advance(&mut game, 1000);
    scheduler.advance(&mut game, 1000);
    assert_eq!(game.pieces_spawned(), spawned);
}

#[test]
fn test_gravity_locks_without_pending_timers() {
    let (mut scheduler, mut game) = setup();
    ground(&mut game);
    let spawned = game.pieces_spawned();

    // No soft drop, no lock timers armed: gravity's refused step locks.
    scheduler.advance(&mut game, 1000);
    assert_eq!(game.pieces_spawned(), spawned + 1);
}

#[test]
fn test_infinite_lock_window_suppresses_gravity_lock() {
    // Slow gravity keeps it out of the way while the window arms.
    let cfg = TimingConfig {
        gravity_ms: 60_000,
        l3_ms: 1_500,
        ..TimingConfig::default()
    };
    let (mut scheduler, mut game) = setup_with(cfg);

    // The window arms only after a hard drop consumes a piece.
    scheduler.key_down(&mut game, Action::HardDrop);
    scheduler.advance(&mut game, 1_500);
    assert!(scheduler.l3_active());

    ground(&mut game);
    let spawned = game.pieces_spawned();
    // Gravity refuses the descent but must not force a lock now.
    scheduler.advance(&mut game, 60_000);
    scheduler.advance(&mut game, 60_000);
    assert_eq!(game.pieces_spawned(), spawned, "window suppresses the lock");

    // The next hard drop consumes the window again.
    scheduler.key_down(&mut game, Action::HardDrop);
    assert!(!scheduler.l3_active());
    assert_eq!(game.pieces_spawned(), spawned + 1);
}

#[test]
fn test_auto_repeat_walks_to_the_wall() {
    let (mut scheduler, mut game) = setup();
    scheduler.key_down(&mut game, Action::MoveLeft);
    // 100ms DAS + enough ARR periods to cross the whole board.
    scheduler.advance(&mut game, 100);
    for _ in 0..12 {
        scheduler.advance(&mut game, 25);
    }
    let min_col = game.current_cells().iter().map(|c| c.col).min();
    assert_eq!(min_col, Some(0));
}

#[test]
fn test_soft_drop_repeats_while_held() {
    let (mut scheduler, mut game) = setup();
    let row = game.current_cells()[0].row;
    scheduler.key_down(&mut game, Action::SoftDrop);
    // Initial edge moved one row; three 50ms repeats add three more.
    for _ in 0..3 {
        scheduler.advance(&mut game, 50);
    }
    assert_eq!(game.current_cells()[0].row, row + 4);

    scheduler.key_up(Action::SoftDrop);
    scheduler.advance(&mut game, 200);
    assert_eq!(game.current_cells()[0].row, row + 4);
}

#[derive(Default)]
struct Overlays(Vec<u32>);

struct OverlayRecorder(Rc<RefCell<Overlays>>);

impl EventSink for OverlayRecorder {
    fn overlay_number(&mut self, value: u32) {
        self.0.borrow_mut().0.push(value);
    }
}

#[test]
fn test_countdown_overlays_and_unpause() {
    let record = Rc::new(RefCell::new(Overlays::default()));
    let mut session = linefall::Session::new(
        Config::default(),
        11,
        Box::new(OverlayRecorder(Rc::clone(&record))),
    );

    session.resume(3);
    assert!(session.paused());
    session.advance(800);
    session.advance(800);
    assert!(session.paused());
    session.advance(800);
    assert!(!session.paused());
    assert_eq!(record.borrow().0, vec![3, 2, 1]);
}
