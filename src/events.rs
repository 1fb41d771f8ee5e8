//! Collaborator callbacks.
//!
//! The engine pushes state changes out through this trait instead of owning a
//! renderer or a network transport. Every method has a no-op default so sinks
//! implement only what they consume.

use crate::core::board::Cell;
use crate::core::queue::PreviewPiece;
use crate::types::PieceKind;

/// Callbacks the engine invokes after state-affecting operations.
///
/// `board_changed` receives only the visible (non-buffer) slice, row-major.
pub trait EventSink {
    /// Board mutated; `visible` holds `width`-sized rows, top row first.
    fn board_changed(&mut self, visible: &[Cell], width: usize) {
        let _ = (visible, width);
    }

    /// Lines were cleared; `attack` is the derived attack value for a
    /// multiplayer transport.
    fn lines_sent(&mut self, attack: u32) {
        let _ = attack;
    }

    /// Upcoming-queue lookahead changed.
    fn queue_changed(&mut self, upcoming: &[PreviewPiece]) {
        let _ = upcoming;
    }

    /// Held piece changed.
    fn hold_changed(&mut self, held: Option<PieceKind>) {
        let _ = held;
    }

    /// A row containing a marked cell was cleared.
    fn special_collected(&mut self) {}

    /// Terminal state reached. Invoked exactly once per session.
    fn game_over(&mut self) {}

    /// Numeric overlay for the resume countdown.
    fn overlay_number(&mut self, value: u32) {
        let _ = value;
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {}
