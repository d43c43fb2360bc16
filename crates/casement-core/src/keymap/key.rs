//! The closed set of logical keys reported to applications.
//!
//! Every platform backend translates its native key codes into a [`Key`].
//! The set is deliberately small: digits, letters, arrows, the navigation
//! cluster and the basic editing keys.  Anything else the OS reports becomes
//! [`Key::Unmapped`].
//!
//! # The `Unmapped` sentinel
//!
//! A native code with no logical equivalent is not an error.  It translates
//! to [`Key::Unmapped`], which has no slot in the per-window key state array
//! and is never delivered to a key callback.  Growing the set is a matter of
//! adding a variant here and an entry in the platform tables.

use serde::{Deserialize, Serialize};

/// A logical key.
///
/// The discriminants of the mapped variants are dense (`0..Key::COUNT`) so
/// they double as indices into fixed-size per-key arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Key {
    // Digit row
    Digit0 = 0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Arrows
    Up,
    Down,
    Left,
    Right,

    // Navigation and editing
    Tab,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    NumpadEnter,

    /// A native key with no logical equivalent.
    Unmapped = 0xFF,
}

impl Key {
    /// Number of mapped keys (every variant except [`Key::Unmapped`]).
    pub const COUNT: usize = 52;

    /// Every mapped key in index order.
    pub const ALL: [Key; Key::COUNT] = {
        use Key::*;
        [
            Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
            A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
            Up, Down, Left, Right,
            Tab, PageUp, PageDown, Home, End, Insert, Delete, Backspace, Space, Enter, Escape,
            NumpadEnter,
        ]
    };

    /// Returns the slot of this key in per-key arrays, or `None` for
    /// [`Key::Unmapped`].
    pub const fn index(self) -> Option<usize> {
        match self {
            Key::Unmapped => None,
            key => Some(key as usize),
        }
    }

    /// Returns `true` unless this is [`Key::Unmapped`].
    pub const fn is_mapped(self) -> bool {
        !matches!(self, Key::Unmapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_are_indexed_by_their_position() {
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index(), Some(i), "{key:?} must live at slot {i}");
        }
    }

    #[test]
    fn test_unmapped_has_no_slot() {
        assert_eq!(Key::Unmapped.index(), None);
        assert!(!Key::Unmapped.is_mapped());
    }

    #[test]
    fn test_last_mapped_key_closes_the_dense_range() {
        assert_eq!(Key::NumpadEnter as usize, Key::COUNT - 1);
    }
}
