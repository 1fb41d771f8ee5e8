//! Rules core: board, pieces, randomizer, and the engine that ties them
//! together. Everything here is synchronous and deterministic for a given
//! seed; wall-clock concerns live in [`crate::timing`].

pub mod attack;
pub mod board;
pub mod game;
pub mod kicks;
pub mod piece;
pub mod queue;

pub use attack::attack_for;
pub use board::{Board, Cell, ClearedRow};
pub use game::{Game, PREVIEW_LEN};
pub use piece::{CellPos, Piece, PieceCells};
pub use queue::{PieceQueue, PreviewPiece};
