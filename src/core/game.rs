//! The game engine: piece movement, rotation, holding, locking, row clears,
//! garbage exchange, and the terminal state.
//!
//! Every piece mutation funnels through [`Game::apply_candidate`]: build a
//! candidate cell set, validate it against the board, commit or reject as a
//! unit. Nothing else writes piece cells, so the board and the piece can
//! never disagree.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::core::attack::attack_for;
use crate::core::board::Board;
use crate::core::kicks::{kick_tests, SPIN_TESTS};
use crate::core::piece::{CellPos, Piece, PieceCells};
use crate::core::queue::{PieceQueue, PreviewPiece};
use crate::events::EventSink;
use crate::types::PieceKind;

/// Pieces shown in the upcoming-queue lookahead.
pub const PREVIEW_LEN: usize = 5;

pub struct Game {
    config: GameConfig,
    board: Board,
    current: Piece,
    held: Option<Piece>,
    queue: PieceQueue,
    combo: u32,
    back_to_back: bool,
    /// Armed by a successful rotation, cleared by any other commit.
    last_move_was_spin: bool,
    game_over: bool,
    can_hold: bool,
    pieces_spawned: u32,
    events: Box<dyn EventSink>,
    /// Garbage gap placement only; the queue owns its own stream.
    rng: Pcg32,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64, events: Box<dyn EventSink>) -> Self {
        let mut queue = PieceQueue::new(config.buffer, config.card_frequency, seed);
        let current = queue.pop();
        let mut game = Self {
            config,
            board: Board::new(&config),
            current,
            held: None,
            queue,
            combo: 0,
            back_to_back: false,
            last_move_was_spin: false,
            game_over: false,
            can_hold: true,
            pieces_spawned: 1,
            events,
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
        };
        game.board
            .paint_footprint(&game.current.cloned_cells(), game.current.kind);
        game.emit_board();
        game
    }

    /// Validate-and-commit chokepoint. On success the board footprint moves,
    /// the piece adopts the candidate, and the spin flag is cleared.
    fn apply_candidate(&mut self, candidate: PieceCells) -> bool {
        if self.board.is_collision(&candidate) {
            return false;
        }
        self.board
            .commit(&self.current.cells, &candidate, self.current.kind);
        self.current.cells = candidate;
        self.last_move_was_spin = false;
        self.emit_board();
        true
    }

    /// Translate the falling piece. Returns whether the move stuck.
    pub fn try_move(&mut self, drow: i32, dcol: i32) -> bool {
        if self.game_over {
            return false;
        }
        let mut candidate = self.current.cloned_cells();
        for cell in &mut candidate {
            cell.row += drow;
            cell.col += dcol;
        }
        self.apply_candidate(candidate)
    }

    /// Rotate the falling piece a quarter turn. `direction` is `1` clockwise
    /// or `-1` counter-clockwise. Tries the bare rotation first, then the
    /// kick table for this transition. A successful rotation arms the spin
    /// flag when the piece is a `T` landing in a covered pocket.
    pub fn rotate(&mut self, direction: i32) -> bool {
        if self.game_over || self.current.kind == PieceKind::O {
            return false;
        }

        let (pivot_row, pivot_col) = self.current.pivot();
        let rotation = self.current.rotation;
        let mut candidate = self.current.cloned_cells();

        for cell in &mut candidate {
            let (row, col) = (cell.row, cell.col);
            if direction == 1 {
                cell.row = pivot_row + (col - pivot_col);
                cell.col = pivot_col - (row - pivot_row);
            } else {
                cell.row = pivot_row - (col - pivot_col);
                cell.col = pivot_col + (row - pivot_row);
            }
            // The I piece pivots off-center; nudge it so the long axis stays
            // within its bounding box across states.
            if self.current.kind == PieceKind::I {
                match rotation {
                    0 => cell.col += direction,
                    1 => cell.row += direction,
                    2 => cell.col -= direction,
                    _ => cell.row -= direction,
                }
            }
        }

        let committed = if self.apply_candidate(candidate) {
            true
        } else {
            self.try_kicks(candidate, direction)
        };
        if !committed {
            return false;
        }

        self.current.rotation = ((rotation as i32 + direction + 4) % 4) as u8;
        self.last_move_was_spin = self.current.kind == PieceKind::T
            && self.detect_spin(pivot_row, pivot_col);
        true
    }

    fn try_kicks(&mut self, candidate: PieceCells, direction: i32) -> bool {
        let Some(table) = kick_tests(self.current.kind, self.current.rotation, direction) else {
            return false;
        };
        for &(drow, dcol) in table {
            let mut kicked = candidate;
            for cell in &mut kicked {
                cell.row += drow;
                cell.col += dcol;
            }
            if self.apply_candidate(kicked) {
                return true;
            }
        }
        false
    }

    /// Three-corner spin test around the post-rotation pivot. The two front
    /// probes face the piece's flat side; filled front corners pin the piece.
    /// The fallback accepts a kicked rotation that displaced the pivot by a
    /// full diagonal.
    fn detect_spin(&self, old_pivot_row: i32, old_pivot_col: i32) -> bool {
        let (pivot_row, pivot_col) = self.current.pivot();
        let rotation = self.current.rotation as usize;

        let occupied = |index: usize| {
            let (drow, dcol) = SPIN_TESTS[index % 4];
            self.board.is_collision(&[CellPos {
                row: pivot_row + drow,
                col: pivot_col + dcol,
                marked: false,
            }])
        };

        let front = [rotation + 2, rotation + 3]
            .into_iter()
            .filter(|&i| occupied(i))
            .count();
        let back = [rotation, rotation + 1]
            .into_iter()
            .filter(|&i| occupied(i))
            .count();

        if front == 2 && back >= 1 {
            true
        } else if front == 1 && back == 2 {
            (pivot_row - old_pivot_row) + (pivot_col - old_pivot_col) == 2
        } else {
            false
        }
    }

    /// Swap the falling piece with the held one (or stash it and draw from
    /// the queue). At most once per spawn; silently ignored otherwise.
    /// Returns whether the swap actually happened.
    pub fn hold(&mut self) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }
        self.board.erase_footprint(&self.current.cloned_cells());
        self.current.reset();

        let incoming = self.held.take();
        self.held = Some(self.current.clone());
        self.spawn_next(incoming);
        self.can_hold = false;

        let held_kind = self.held.as_ref().map(|p| p.kind);
        self.events.hold_changed(held_kind);
        true
    }

    /// Drop the piece to the floor, lock it, clear rows, spawn the next.
    pub fn hard_drop(&mut self) {
        if self.game_over {
            return;
        }
        while self.try_move(1, 0) {}
        self.board.add_filled_counts(&self.current.cells);
        self.clear_rows();
        self.spawn_next(None);
    }

    /// Replace the falling piece with `explicit` or the next queue draw. A
    /// blocked spawn gets one upward nudge; still blocked means game over.
    fn spawn_next(&mut self, explicit: Option<Piece>) {
        self.board.settle_footprint(&self.current.cloned_cells());
        self.current = match explicit {
            Some(piece) => piece,
            None => self.queue.pop(),
        };

        if self.board.is_collision(&self.current.cells) {
            for cell in &mut self.current.cells {
                cell.row -= 1;
            }
            if self.board.is_collision(&self.current.cells) {
                self.set_game_over();
            }
        }

        let cells = self.current.cloned_cells();
        if !self.board.is_collision(&cells) {
            self.board.paint_footprint(&cells, self.current.kind);
        }
        self.last_move_was_spin = false;
        self.can_hold = true;
        self.pieces_spawned += 1;

        self.emit_board();
        let preview = self.queue.peek(PREVIEW_LEN);
        self.events.queue_changed(&preview);
    }

    /// Clear full rows, keep the combo counter, and report the attack.
    fn clear_rows(&mut self) {
        let spin = self.last_move_was_spin;
        let cleared = self.board.clear_full_rows();

        // Piece cells above a removed row ride the stack down.
        for row in &cleared {
            for cell in &mut self.current.cells {
                if cell.row < row.index as i32 {
                    cell.row += 1;
                }
            }
        }

        if cleared.is_empty() {
            self.combo = 0;
            return;
        }
        self.combo += 1;

        let lines = cleared.len() as u32;
        let perfect = self.board.is_empty();
        self.back_to_back = lines >= 4 || spin;
        self.events.lines_sent(attack_for(lines, spin, perfect));

        if cleared.iter().any(|row| row.marked) {
            self.events.special_collected();
        }
    }

    /// Accept garbage lines from an opponent. The whole stack shifts up and
    /// the falling piece is lifted clear of the new rows.
    pub fn receive_lines(&mut self, lines: usize) {
        if self.game_over || lines == 0 {
            return;
        }
        log::debug!("received {lines} garbage lines");
        let probe = lines + self.config.buffer - 1;
        if probe < self.board.rows() && self.board.filled_count(probe) > 0 {
            log::warn!("garbage push overflows the stack ({lines} lines)");
        }

        self.board.erase_footprint(&self.current.cloned_cells());
        self.board.inject_garbage(lines, &mut self.rng);

        // The stack rose under the piece; lift it until it fits again.
        while self.board.is_collision(&self.current.cells) {
            for cell in &mut self.current.cells {
                cell.row -= 1;
            }
        }
        let cells = self.current.cloned_cells();
        self.board.paint_footprint(&cells, self.current.kind);
        self.emit_board();
    }

    /// Fresh round: new bags (marked-piece phase carries over), empty board,
    /// no held piece, counters cleared.
    pub fn reset(&mut self) {
        self.queue.reset();
        self.board.clear_all();
        self.current = self.queue.pop();
        self.held = None;
        self.combo = 0;
        self.back_to_back = false;
        self.last_move_was_spin = false;
        self.game_over = false;
        self.can_hold = true;
        self.pieces_spawned = 1;

        self.board
            .paint_footprint(&self.current.cloned_cells(), self.current.kind);
        self.emit_board();
        self.events.hold_changed(None);
        let preview = self.queue.peek(PREVIEW_LEN);
        self.events.queue_changed(&preview);
    }

    fn set_game_over(&mut self) {
        if !self.game_over {
            self.game_over = true;
            self.events.game_over();
        }
    }

    fn emit_board(&mut self) {
        self.events
            .board_changed(self.board.visible(), self.config.width);
    }

    /// Re-announce the board to the sink, e.g. after a resume.
    pub fn redraw(&mut self) {
        self.emit_board();
    }

    /// Forward a countdown number to the sink.
    pub fn show_overlay_number(&mut self, value: u32) {
        self.events.overlay_number(value);
    }

    /// True when a one-row descent would succeed, without moving anything.
    pub fn can_descend(&self) -> bool {
        let mut candidate = self.current.cloned_cells();
        for cell in &mut candidate {
            cell.row += 1;
        }
        !self.board.is_collision(&candidate)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scenario construction.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_kind(&self) -> PieceKind {
        self.current.kind
    }

    pub fn current_cells(&self) -> &PieceCells {
        &self.current.cells
    }

    pub fn held_kind(&self) -> Option<PieceKind> {
        self.held.as_ref().map(|p| p.kind)
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn spin_armed(&self) -> bool {
        self.last_move_was_spin
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Total pieces entered play, the initial spawn included.
    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn peek(&self, count: usize) -> Vec<PreviewPiece> {
        self.queue.peek(count)
    }
}
