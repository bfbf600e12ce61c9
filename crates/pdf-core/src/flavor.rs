//! PDG parton identifiers and the standard 13-flavor window.

/// PDG code of the gluon.
pub const GLUON: i32 = 21;

/// Number of entries in the standard flavor window `[-6, ..., -1, g, 1, ..., 6]`.
pub const STANDARD_WINDOW: usize = 13;

/// Maps the legacy gluon alias `0` onto [`GLUON`]; every other id is returned unchanged.
pub fn canonical_id(id: i32) -> i32 {
    if id == 0 {
        GLUON
    } else {
        id
    }
}

/// PDG id stored at `index` of the standard window (index 6 is the gluon).
///
/// # Panics
/// Panics if `index >= STANDARD_WINDOW`.
pub fn standard_window_id(index: usize) -> i32 {
    assert!(index < STANDARD_WINDOW, "standard window index {index} out of range");
    canonical_id(index as i32 - 6)
}

/// Index of `id` inside the standard window, if it belongs to it.
pub fn standard_window_index(id: i32) -> Option<usize> {
    match canonical_id(id) {
        GLUON => Some(6),
        quark @ -6..=6 => Some((quark + 6) as usize),
        _ => None,
    }
}
