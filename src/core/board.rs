//! Board and collision: the cell grid, per-row fill tracking, row clearing,
//! and garbage injection.
//!
//! The grid is `width x (height + buffer)` in a flat row-major `Vec` for cache
//! locality. The buffer rows sit above the visible area so pieces can spawn
//! off-screen. A parallel `filled_counts` array tracks locked (non-current)
//! filled cells per row, which makes full-row detection O(1) per row.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::config::GameConfig;
use crate::core::piece::CellPos;
use crate::types::{CellColor, PieceKind};

/// One board cell. `current` distinguishes the actively falling piece's cells
/// from settled blocks so a piece never collides with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Cell {
    pub filled: bool,
    pub color: CellColor,
    pub current: bool,
    pub marked: bool,
}

/// A cleared row: its index at clear time and whether it held a marked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedRow {
    pub index: usize,
    pub marked: bool,
}

/// The game grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: usize,
    rows: usize,
    buffer: usize,
    /// Row-major, `rows * width` cells.
    cells: Vec<Cell>,
    /// Locked filled cells per row. Invariant between operations:
    /// `filled_counts[r] == |{c in row r : c.filled && !c.current}|`.
    filled_counts: Vec<u16>,
}

impl Board {
    pub fn new(config: &GameConfig) -> Self {
        let rows = config.total_rows();
        Self {
            width: config.width,
            rows,
            buffer: config.buffer,
            cells: vec![Cell::default(); rows * config.width],
            filled_counts: vec![0; rows],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total rows including the buffer.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Cell at (row, col), or `None` when out of bounds. Rows above the board
    /// (negative) are out of bounds here even though collision permits them.
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || row >= self.rows as i32 || col < 0 || col >= self.width as i32 {
            return None;
        }
        Some(self.cells[self.index(row as usize, col as usize)])
    }

    /// The visible (non-buffer) slice, row-major, top visible row first.
    pub fn visible(&self) -> &[Cell] {
        &self.cells[self.buffer * self.width..]
    }

    /// Locked-cell count for a row.
    pub fn filled_count(&self, row: usize) -> u16 {
        self.filled_counts[row]
    }

    /// True when no cell on the board is filled.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| !c.filled)
    }

    /// Collision test for a candidate cell set: out of horizontal bounds,
    /// below the bottom, or overlapping a settled (`filled && !current`)
    /// block. Cells above the top are permitted — the spawn area extends
    /// upward and overflow is the engine's game-over logic, not a collision.
    pub fn is_collision(&self, cells: &[CellPos]) -> bool {
        for cell in cells {
            if cell.col < 0 || cell.col >= self.width as i32 || cell.row >= self.rows as i32 {
                return true;
            }
            if cell.row >= 0 {
                let occupant = self.cells[self.index(cell.row as usize, cell.col as usize)];
                if occupant.filled && !occupant.current {
                    return true;
                }
            }
        }
        false
    }

    /// Commit a validated move: clear the old footprint, paint the new one.
    /// Must only be called after `is_collision(new)` returned false.
    pub fn commit(&mut self, old: &[CellPos], new: &[CellPos], kind: PieceKind) {
        self.erase_footprint(old);
        self.paint_footprint(new, kind);
    }

    /// Remove a piece footprint from the grid.
    pub(crate) fn erase_footprint(&mut self, cells: &[CellPos]) {
        for cell in cells {
            if let Some(slot) = self.slot_mut(cell.row, cell.col) {
                *slot = Cell::default();
            }
        }
    }

    /// Paint a piece footprint as the falling piece.
    pub(crate) fn paint_footprint(&mut self, cells: &[CellPos], kind: PieceKind) {
        for cell in cells {
            if let Some(slot) = self.slot_mut(cell.row, cell.col) {
                slot.filled = true;
                slot.current = true;
                slot.color = CellColor::Piece(kind);
                slot.marked = cell.marked;
            }
        }
    }

    /// Drop the `current` flag on a footprint, settling it in place.
    pub(crate) fn settle_footprint(&mut self, cells: &[CellPos]) {
        for cell in cells {
            if let Some(slot) = self.slot_mut(cell.row, cell.col) {
                slot.current = false;
            }
        }
    }

    /// Count a locked footprint into the per-row fill tallies.
    pub(crate) fn add_filled_counts(&mut self, cells: &[CellPos]) {
        for cell in cells {
            if (0..self.rows as i32).contains(&cell.row) {
                self.filled_counts[cell.row as usize] += 1;
            }
        }
    }

    fn slot_mut(&mut self, row: i32, col: i32) -> Option<&mut Cell> {
        if row < 0 || row >= self.rows as i32 || col < 0 || col >= self.width as i32 {
            return None;
        }
        let index = self.index(row as usize, col as usize);
        Some(&mut self.cells[index])
    }

    /// Write a settled block directly, keeping the fill tallies consistent.
    /// Used for garbage rows and board construction in tests.
    pub fn set_settled(&mut self, row: usize, col: usize, color: CellColor) {
        let index = self.index(row, col);
        let slot = &mut self.cells[index];
        if !slot.filled || slot.current {
            self.filled_counts[row] += 1;
        }
        slot.filled = true;
        slot.current = false;
        slot.marked = false;
        slot.color = color;
    }

    /// Flag a cell as marked. Scenario construction helper; marked cells
    /// normally come from locked marked pieces.
    pub fn set_marked(&mut self, row: usize, col: usize) {
        let index = self.index(row, col);
        self.cells[index].marked = true;
    }

    /// Remove every full row. Each removed row is spliced out and a fresh
    /// empty row is inserted at the top, with `filled_counts` shifted in
    /// lockstep. Returns the cleared rows bottom-up in scan order; the caller
    /// is responsible for shifting any falling-piece cells above them.
    pub fn clear_full_rows(&mut self) -> ArrayVec<ClearedRow, 4> {
        let mut cleared = ArrayVec::new();
        let width = self.width;

        for row in 0..self.rows {
            if (self.filled_counts[row] as usize) < width {
                continue;
            }
            let start = row * width;
            let marked = self.cells[start..start + width].iter().any(|c| c.marked);
            let _ = cleared.try_push(ClearedRow { index: row, marked });

            // Shift everything above down by one row and blank the top.
            self.cells.copy_within(0..start, width);
            self.cells[..width].fill(Cell::default());
            self.filled_counts.copy_within(0..row, 1);
            self.filled_counts[0] = 0;
        }

        cleared
    }

    /// Inject garbage: drop `lines` rows off the top and append `lines`
    /// garbage rows at the bottom, each with a single random open column.
    pub(crate) fn inject_garbage(&mut self, lines: usize, rng: &mut impl Rng) {
        let lines = lines.min(self.rows);
        let width = self.width;

        self.cells.drain(0..lines * width);
        self.filled_counts.drain(0..lines);

        for _ in 0..lines {
            let gap = rng.random_range(0..width);
            for col in 0..width {
                let mut cell = Cell::default();
                if col != gap {
                    cell.filled = true;
                    cell.color = CellColor::Garbage;
                }
                self.cells.push(cell);
            }
            self.filled_counts.push(width as u16 - 1);
        }
    }

    /// Empty every cell and reset the fill tallies.
    pub fn clear_all(&mut self) {
        self.cells.fill(Cell::default());
        self.filled_counts.fill(0);
    }
}
