//! Attack strength derivation.
//!
//! Pure mapping from a clear's shape to the number of garbage lines it sends.
//! A perfect clear overrides everything else.

/// Garbage lines sent for a clear of `lines` rows.
pub fn attack_for(lines: u32, spin: bool, perfect_clear: bool) -> u32 {
    if perfect_clear {
        return 10;
    }
    match (lines, spin) {
        (0, _) => 0,
        (1, false) => 0,
        (1, true) => 2,
        (2, false) => 1,
        (2, true) => 4,
        (3, false) => 2,
        (3, true) => 6,
        // Four lines sends four, spin or not.
        (_, _) => 4,
    }
}
