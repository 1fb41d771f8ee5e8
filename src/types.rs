//! Core types shared across the engine.
//!
//! Pure data types with no game logic: piece kinds, logical input actions,
//! cell colors, and the documented timing defaults.

use serde::{Deserialize, Serialize};

/// Default board dimensions (cells).
pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;
/// Hidden rows above the visible area where pieces spawn.
pub const DEFAULT_BUFFER: usize = 3;

/// Default timing values (milliseconds).
pub const DEFAULT_GRAVITY_MS: u32 = 1000;
pub const DEFAULT_DAS_MS: u32 = 100;
pub const DEFAULT_ARR_MS: u32 = 25;
pub const DEFAULT_SOFT_DROP_MS: u32 = 50;
pub const DEFAULT_L1_MS: u32 = 500;
pub const DEFAULT_L2_MS: u32 = 5000;
pub const DEFAULT_L3_MS: u32 = 20000;
/// Interval between resume-countdown steps.
pub const DEFAULT_COUNTDOWN_STEP_MS: u32 = 800;

/// One marked piece per this many queue pops.
pub const DEFAULT_CARD_FREQUENCY: u32 = 7;

/// Tetromino piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds, in bag-fill order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Logical input actions. Physical-key-to-action resolution happens in the
/// input collaborator; the engine only ever sees these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
}

impl Action {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Action::MoveLeft),
            "moveright" => Some(Action::MoveRight),
            "softdrop" => Some(Action::SoftDrop),
            "harddrop" => Some(Action::HardDrop),
            "rotatecw" => Some(Action::RotateCw),
            "rotateccw" => Some(Action::RotateCcw),
            "hold" => Some(Action::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::SoftDrop => "softDrop",
            Action::HardDrop => "hardDrop",
            Action::RotateCw => "rotateCw",
            Action::RotateCcw => "rotateCcw",
            Action::Hold => "hold",
        }
    }
}

/// What a board cell is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellColor {
    #[default]
    Empty,
    Piece(PieceKind),
    Garbage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_kind_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PieceKind::from_str("x"), None);
    }

    #[test]
    fn test_action_round_trip() {
        for action in [
            Action::MoveLeft,
            Action::MoveRight,
            Action::SoftDrop,
            Action::HardDrop,
            Action::RotateCw,
            Action::RotateCcw,
            Action::Hold,
        ] {
            assert_eq!(Action::from_str(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_str("pause"), None);
    }

    #[test]
    fn test_all_kinds_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
