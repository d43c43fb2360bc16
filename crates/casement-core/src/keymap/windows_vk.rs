//! Windows Virtual Key (VK) code to logical [`Key`] translation table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//! Windows VK codes range from 0x00 to 0xFF.
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`,
//! `VK_SPACE = 0x20`).  A window receives the code in the `wParam` of
//! `WM_KEYDOWN` / `WM_KEYUP`.
//!
//! # How this table works
//!
//! `VK_TO_KEY_TABLE` is a compile-time constant array of 256 [`Key`] values,
//! indexed by VK code.  Position 0x41 holds `Key::A` because Windows VK_A is
//! 0x41.  Any VK code without a logical equivalent stores `Key::Unmapped`.
//!
//! # Aliased keys
//!
//! Some physical keys share a VK code and are told apart only by the
//! "extended" bit of the key message.  The numpad Enter key arrives as
//! `VK_RETURN` with the extended bit set; [`vk_to_key`] remaps it to
//! [`Key::NumpadEnter`].

use super::key::Key;

/// `VK_RETURN`, shared by the main and numpad Enter keys.
pub const VK_RETURN: u8 = 0x0D;
/// `VK_LBUTTON`, queried for the mouse snapshot.
pub const VK_LBUTTON: u8 = 0x01;
/// `VK_RBUTTON`, queried for the mouse snapshot.
pub const VK_RBUTTON: u8 = 0x02;
/// `VK_MBUTTON`, queried for the mouse snapshot.
pub const VK_MBUTTON: u8 = 0x04;

/// Translates a Windows Virtual Key code to a logical [`Key`].
///
/// `extended` is the extended-key flag of the native message; it only
/// matters for keys that alias (currently Enter).  Codes outside the table
/// (including anything above 0xFF) yield [`Key::Unmapped`].
pub fn vk_to_key(vk: u32, extended: bool) -> Key {
    let key = match u8::try_from(vk) {
        Ok(vk) => VK_TO_KEY_TABLE[vk as usize],
        Err(_) => return Key::Unmapped,
    };
    match key {
        Key::Enter if extended => Key::NumpadEnter,
        key => key,
    }
}

/// Translates a logical [`Key`] back to the Windows Virtual Key code that
/// produces it.
///
/// Returns `None` for [`Key::Unmapped`].  [`Key::NumpadEnter`] shares
/// `VK_RETURN` with [`Key::Enter`].
pub fn key_to_vk(key: Key) -> Option<u8> {
    if key == Key::NumpadEnter {
        return Some(VK_RETURN);
    }
    // Linear scan is acceptable for the infrequent key->VK direction.
    VK_TO_KEY_TABLE
        .iter()
        .position(|&mapped| mapped == key && key != Key::Unmapped)
        .map(|vk| vk as u8)
}

/// Complete VK → Key mapping table indexed by VK code (0x00–0xFF).
///
/// Reference: https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes
const VK_TO_KEY_TABLE: [Key; 256] = {
    use Key::*;
    let mut t = [Unmapped; 256];

    // ── Digit row (VK_0=0x30 … VK_9=0x39) ───────────────────────────────────
    t[0x30] = Digit0;
    t[0x31] = Digit1;
    t[0x32] = Digit2;
    t[0x33] = Digit3;
    t[0x34] = Digit4;
    t[0x35] = Digit5;
    t[0x36] = Digit6;
    t[0x37] = Digit7;
    t[0x38] = Digit8;
    t[0x39] = Digit9;

    // ── Alphabet keys (VK_A=0x41 … VK_Z=0x5A) ────────────────────────────────
    t[0x41] = A;
    t[0x42] = B;
    t[0x43] = C;
    t[0x44] = D;
    t[0x45] = E;
    t[0x46] = F;
    t[0x47] = G;
    t[0x48] = H;
    t[0x49] = I;
    t[0x4A] = J;
    t[0x4B] = K;
    t[0x4C] = L;
    t[0x4D] = M;
    t[0x4E] = N;
    t[0x4F] = O;
    t[0x50] = P;
    t[0x51] = Q;
    t[0x52] = R;
    t[0x53] = S;
    t[0x54] = T;
    t[0x55] = U;
    t[0x56] = V;
    t[0x57] = W;
    t[0x58] = X;
    t[0x59] = Y;
    t[0x5A] = Z;

    // ── Arrow keys ────────────────────────────────────────────────────────────
    t[0x25] = Left;  // VK_LEFT
    t[0x26] = Up;    // VK_UP
    t[0x27] = Right; // VK_RIGHT
    t[0x28] = Down;  // VK_DOWN

    // ── Navigation and editing ────────────────────────────────────────────────
    t[0x09] = Tab;       // VK_TAB
    t[0x21] = PageUp;    // VK_PRIOR
    t[0x22] = PageDown;  // VK_NEXT
    t[0x24] = Home;      // VK_HOME
    t[0x23] = End;       // VK_END
    t[0x2D] = Insert;    // VK_INSERT
    t[0x2E] = Delete;    // VK_DELETE
    t[0x08] = Backspace; // VK_BACK
    t[0x20] = Space;     // VK_SPACE
    t[0x0D] = Enter;     // VK_RETURN (NumpadEnter when extended)
    t[0x1B] = Escape;    // VK_ESCAPE

    t
};

#[cfg(test)]
mod tests {
    use super::*;
    use Key::*;

    /// Pairs of (VK code, expected key) for every mapped key.
    const STANDARD_MAPPINGS: &[(u8, Key)] = &[
        // Digits
        (0x30, Digit0), (0x31, Digit1), (0x32, Digit2), (0x33, Digit3), (0x34, Digit4),
        (0x35, Digit5), (0x36, Digit6), (0x37, Digit7), (0x38, Digit8), (0x39, Digit9),
        // Letters
        (0x41, A), (0x42, B), (0x43, C), (0x44, D), (0x45, E), (0x46, F), (0x47, G),
        (0x48, H), (0x49, I), (0x4A, J), (0x4B, K), (0x4C, L), (0x4D, M), (0x4E, N),
        (0x4F, O), (0x50, P), (0x51, Q), (0x52, R), (0x53, S), (0x54, T), (0x55, U),
        (0x56, V), (0x57, W), (0x58, X), (0x59, Y), (0x5A, Z),
        // Arrows
        (0x25, Left), (0x26, Up), (0x27, Right), (0x28, Down),
        // Navigation and editing
        (0x09, Tab), (0x21, PageUp), (0x22, PageDown), (0x24, Home), (0x23, End),
        (0x2D, Insert), (0x2E, Delete), (0x08, Backspace), (0x20, Space),
        (0x0D, Enter), (0x1B, Escape),
    ];

    #[test]
    fn test_all_standard_vk_codes_map_to_correct_key() {
        for &(vk, expected) in STANDARD_MAPPINGS {
            assert_eq!(
                vk_to_key(vk as u32, false),
                expected,
                "vk_to_key(0x{vk:02X}) should return {expected:?}"
            );
        }
    }

    #[test]
    fn test_every_mapped_key_except_numpad_enter_has_a_table_entry() {
        assert_eq!(STANDARD_MAPPINGS.len(), Key::COUNT - 1);
    }

    #[test]
    fn test_extended_return_is_numpad_enter() {
        assert_eq!(vk_to_key(VK_RETURN as u32, true), NumpadEnter);
        assert_eq!(vk_to_key(VK_RETURN as u32, false), Enter);
    }

    #[test]
    fn test_extended_flag_does_not_alias_other_keys() {
        // Extended arrows (the dedicated cluster) are still plain arrows.
        assert_eq!(vk_to_key(0x25, true), Left);
        assert_eq!(vk_to_key(0x2E, true), Delete);
    }

    #[test]
    fn test_unknown_vk_codes_return_unmapped() {
        // Mouse buttons, modifiers, function keys: all outside the logical set.
        for vk in [0x00u32, 0x01, 0x02, 0x10, 0x11, 0x12, 0x70, 0xA0, 0xFF] {
            assert_eq!(vk_to_key(vk, false), Unmapped, "VK 0x{vk:02X} must be Unmapped");
        }
    }

    #[test]
    fn test_codes_above_table_range_return_unmapped() {
        assert_eq!(vk_to_key(0x100, false), Unmapped);
        assert_eq!(vk_to_key(u32::MAX, true), Unmapped);
    }

    #[test]
    fn test_vk_to_key_never_panics_for_any_u8() {
        for vk in 0u32..=255 {
            let _ = vk_to_key(vk, false);
            let _ = vk_to_key(vk, true);
        }
    }

    #[test]
    fn test_round_trip_key_to_vk_to_key_for_all_keys() {
        for key in Key::ALL {
            let vk = key_to_vk(key).expect("every mapped key has a VK code");
            let extended = key == NumpadEnter;
            assert_eq!(vk_to_key(vk as u32, extended), key, "round-trip failed for {key:?}");
        }
    }

    #[test]
    fn test_key_to_vk_unmapped_returns_none() {
        assert_eq!(key_to_vk(Unmapped), None);
    }
}
