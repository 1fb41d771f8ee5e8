//! Falling piece: immutable shape descriptor plus mutable position state.
//!
//! Cells are absolute board coordinates. Index 0 is the pivot used as the
//! rotation center for every kind except `O`. Movement and rotation never
//! mutate cells in place; candidates are built with [`Piece::cloned_cells`]
//! and committed by the engine only after validation.

use rand::Rng;

use crate::types::PieceKind;

/// One cell of a piece: absolute board position plus the marked flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellPos {
    pub row: i32,
    pub col: i32,
    pub marked: bool,
}

/// A piece always has exactly four cells.
pub type PieceCells = [CellPos; 4];

/// Canonical spawn offsets per kind, pivot first. Rows are relative to the
/// top of the board before the buffer shift is applied.
fn spawn_cells(kind: PieceKind) -> PieceCells {
    let raw: [(i32, i32); 4] = match kind {
        PieceKind::I => [(1, 4), (1, 3), (1, 5), (1, 6)],
        PieceKind::J => [(1, 4), (0, 3), (1, 3), (1, 5)],
        PieceKind::L => [(1, 4), (0, 5), (1, 3), (1, 5)],
        PieceKind::O => [(0, 4), (0, 5), (1, 4), (1, 5)],
        PieceKind::S => [(1, 4), (0, 4), (0, 5), (1, 3)],
        PieceKind::T => [(1, 4), (0, 4), (1, 3), (1, 5)],
        PieceKind::Z => [(1, 4), (0, 3), (0, 4), (1, 5)],
    };
    raw.map(|(row, col)| CellPos {
        row,
        col,
        marked: false,
    })
}

/// The actively falling tetromino.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Rotation state, 0..4. 0 is the spawn orientation.
    pub rotation: u8,
    pub cells: PieceCells,
    /// Index of the marked cell, if this piece carries one.
    pub marked_index: Option<usize>,
    buffer: usize,
}

impl Piece {
    /// Create a piece at its spawn position. `marked` pieces get one randomly
    /// chosen marked cell.
    pub fn new(kind: PieceKind, buffer: usize, marked: bool, rng: &mut impl Rng) -> Self {
        let mut piece = Self {
            kind,
            rotation: 0,
            cells: spawn_cells(kind),
            marked_index: None,
            buffer,
        };
        piece.shift_into_buffer();
        if marked {
            let index = rng.random_range(0..piece.cells.len());
            piece.marked_index = Some(index);
            piece.cells[index].marked = true;
        }
        piece
    }

    /// Restore the canonical spawn offsets for this kind. The marked-cell
    /// index survives resets; rotation returns to the spawn orientation.
    pub fn reset(&mut self) {
        self.cells = spawn_cells(self.kind);
        self.rotation = 0;
        self.shift_into_buffer();
        if let Some(index) = self.marked_index {
            self.cells[index].marked = true;
        }
    }

    /// Independent copy of the current cells. Callers may mutate the copy
    /// freely; the piece is untouched until the engine commits it.
    pub fn cloned_cells(&self) -> PieceCells {
        self.cells
    }

    /// Pivot cell position (row, col).
    pub fn pivot(&self) -> (i32, i32) {
        (self.cells[0].row, self.cells[0].col)
    }

    fn shift_into_buffer(&mut self) {
        let shift = self.buffer as i32 - 1;
        for cell in &mut self.cells {
            cell.row += shift;
        }
    }
}
