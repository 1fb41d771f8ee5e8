//! Wall-kick offset tables and spin-detection probes.
//!
//! Offsets are `(drow, dcol)` applied to every cell of a rotated candidate.
//! Tables are keyed by the piece's rotation state *before* the rotation and
//! the direction (`+1` clockwise, `-1` counter-clockwise). The first entry is
//! always `(0, 0)`; the remaining four probe progressively further positions.

use crate::types::PieceKind;

/// Five kick offsets tried in order.
pub type KickTable = [(i32, i32); 5];

/// Diagonal probes around the pivot used for spin detection, `(drow, dcol)`.
/// Order matters: indices are selected by rotation state, front corners first.
pub const SPIN_TESTS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const JLSTZ_CW: [KickTable; 4] = [
    // 0 -> 1
    [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
    // 1 -> 2
    [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    // 2 -> 3
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
    // 3 -> 0
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
];

const JLSTZ_CCW: [KickTable; 4] = [
    // 0 -> 3
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
    // 1 -> 0
    [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    // 2 -> 1
    [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
    // 3 -> 2
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
];

const I_CW: [KickTable; 4] = [
    // 0 -> 1
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
    // 1 -> 2
    [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
    // 2 -> 3
    [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
    // 3 -> 0
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
];

const I_CCW: [Option<KickTable>; 4] = [
    // 0 -> 3
    Some([(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)]),
    // 1 -> 0
    Some([(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)]),
    // 2 -> 1
    Some([(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)]),
    // 3 -> 2 has no table; that rotation always fails against a wall.
    None,
];

/// Kick offsets for rotating `kind` from `rotation` in `direction`.
///
/// Returns `None` when no table exists for the transition. `O` never
/// rotates and has no tables. The `I` counter-clockwise 3 -> 2 transition
/// also has no table, so that rotation only succeeds in open space.
pub fn kick_tests(kind: PieceKind, rotation: u8, direction: i32) -> Option<&'static KickTable> {
    let state = (rotation & 3) as usize;
    match (kind, direction) {
        (PieceKind::O, _) => None,
        (PieceKind::I, 1) => Some(&I_CW[state]),
        (PieceKind::I, -1) => I_CCW[state].as_ref(),
        (_, 1) => Some(&JLSTZ_CW[state]),
        (_, -1) => Some(&JLSTZ_CCW[state]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_starts_at_origin() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                for direction in [-1, 1] {
                    if let Some(table) = kick_tests(kind, rotation, direction) {
                        assert_eq!(table[0], (0, 0), "{kind:?} {rotation} {direction}");
                        assert_eq!(table.len(), 5);
                    }
                }
            }
        }
    }

    #[test]
    fn test_o_has_no_tables() {
        for rotation in 0..4 {
            assert!(kick_tests(PieceKind::O, rotation, 1).is_none());
            assert!(kick_tests(PieceKind::O, rotation, -1).is_none());
        }
    }

    #[test]
    fn test_i_ccw_from_state_three_is_absent() {
        assert!(kick_tests(PieceKind::I, 3, -1).is_none());
        assert!(kick_tests(PieceKind::I, 3, 1).is_some());
    }

    #[test]
    fn test_jlstz_cw_ccw_inverse_pairs() {
        // Rotating 0 -> 1 and back 1 -> 0 use mirrored offsets for the
        // common wall positions.
        let cw = kick_tests(PieceKind::T, 0, 1).unwrap();
        let ccw = kick_tests(PieceKind::T, 1, -1).unwrap();
        assert_eq!(cw[1], (0, -1));
        assert_eq!(ccw[1], (0, 1));
    }

    #[test]
    fn test_spin_probes_are_the_four_diagonals() {
        let mut seen = SPIN_TESTS.to_vec();
        seen.sort_unstable();
        assert_eq!(seen, vec![(-1, -1), (-1, 1), (1, -1), (1, 1)]);
    }
}
