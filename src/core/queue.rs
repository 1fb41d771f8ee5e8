//! Piece queue: 7-bag randomizer with a lookahead bag and the marked-piece
//! cadence.
//!
//! Two bags are held at all times. Pieces are drawn from the tail of the
//! current bag and the slot is refilled from the lookahead bag, so the queue
//! never shrinks and `peek` can always show a full preview. Every
//! `card_frequency`-th generated piece carries a marked cell.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::core::piece::Piece;
use crate::types::PieceKind;

/// Lookahead entry for preview rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPiece {
    pub kind: PieceKind,
    pub marked: bool,
}

/// Deterministic piece source. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Drawn from the tail; refilled at the head.
    curr_bag: Vec<Piece>,
    next_bag: Vec<Piece>,
    /// Generated pieces remaining until the next marked one.
    card_wait: u32,
    card_frequency: u32,
    buffer: usize,
    rng: Pcg32,
}

impl PieceQueue {
    pub fn new(buffer: usize, card_frequency: u32, seed: u64) -> Self {
        let mut queue = Self {
            curr_bag: Vec::with_capacity(8),
            next_bag: Vec::with_capacity(7),
            card_wait: card_frequency.max(1),
            card_frequency: card_frequency.max(1),
            buffer,
            rng: Pcg32::seed_from_u64(seed),
        };
        queue.curr_bag = queue.generate_bag();
        queue.next_bag = queue.generate_bag();
        queue
    }

    /// Draw the next piece and refill the queue so it never shrinks.
    pub fn pop(&mut self) -> Piece {
        let piece = match self.curr_bag.pop() {
            Some(piece) => piece,
            None => {
                log::warn!("piece queue underflow, substituting a random piece");
                self.random_piece()
            }
        };

        let refill = match self.next_bag.pop() {
            Some(piece) => piece,
            None => {
                log::warn!("lookahead bag underflow, substituting a random piece");
                self.random_piece()
            }
        };
        self.curr_bag.insert(0, refill);

        if self.next_bag.is_empty() {
            self.next_bag = self.generate_bag();
        }

        piece
    }

    /// The next `count` pieces in draw order, without consuming them.
    pub fn peek(&self, count: usize) -> Vec<PreviewPiece> {
        self.curr_bag
            .iter()
            .rev()
            .chain(self.next_bag.iter().rev())
            .take(count)
            .map(|piece| PreviewPiece {
                kind: piece.kind,
                marked: piece.marked_index.is_some(),
            })
            .collect()
    }

    /// Regenerate both bags. The marked-piece phase carries over so a reset
    /// cannot be used to dodge (or farm) marked pieces.
    pub fn reset(&mut self) {
        self.curr_bag = self.generate_bag();
        self.next_bag = self.generate_bag();
    }

    /// A shuffled bag of all seven kinds, applying the marked cadence in
    /// generation order.
    fn generate_bag(&mut self) -> Vec<Piece> {
        let mut kinds = PieceKind::ALL;
        kinds.shuffle(&mut self.rng);
        kinds
            .iter()
            .map(|&kind| {
                self.card_wait = (self.card_wait + self.card_frequency - 1) % self.card_frequency;
                Piece::new(kind, self.buffer, self.card_wait == 0, &mut self.rng)
            })
            .collect()
    }

    /// Underflow substitute. Steps the marked cadence like any generated
    /// piece, so a fallback draw cannot drift the marking phase.
    fn random_piece(&mut self) -> Piece {
        let kind = PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())];
        self.card_wait = (self.card_wait + self.card_frequency - 1) % self.card_frequency;
        Piece::new(kind, self.buffer, self.card_wait == 0, &mut self.rng)
    }
}
