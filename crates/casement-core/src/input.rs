//! Input actions, cursor modes and the state containers that track them.
//!
//! Two views of input state exist side by side:
//!
//! - [`KeyStates`] is per window.  It holds exactly one [`KeyAction`] per
//!   logical key and is written only by the event translator, so polling it
//!   and listening to key callbacks always agree.
//! - [`InputSnapshot`] is process wide.  It is refreshed from the OS after
//!   every poll and answers "is this key or button physically down right now".

use serde::{Deserialize, Serialize};

use crate::keymap::{windows_vk, Key};

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyAction {
    /// The key is up.  Every key starts here.
    #[default]
    Release,
    /// The key went down.
    Press,
    /// The key is held and the OS auto-repeat fired.
    Repeat,
}

/// The mouse buttons the backend reports.
///
/// Additional buttons (X1/X2) are received from the OS but dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Every reported button.
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

    const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

/// Whether a mouse button went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonAction {
    Press,
    Release,
}

/// How the cursor behaves while a window has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorMode {
    /// The cursor moves freely.
    #[default]
    Normal,
    /// The cursor is confined to the window's client area while focused.
    Captured,
    /// Intended for hidden, relative pointer motion.  Currently confines the
    /// cursor exactly like [`CursorMode::Captured`].
    Virtual,
}

impl CursorMode {
    /// Returns `true` for the modes that clip the cursor to the client area.
    pub const fn confines_cursor(self) -> bool {
        matches!(self, CursorMode::Captured | CursorMode::Virtual)
    }
}

/// One [`KeyAction`] per logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStates {
    actions: [KeyAction; Key::COUNT],
}

impl KeyStates {
    /// Creates a state array with every key released.
    pub fn new() -> Self {
        Self {
            actions: [KeyAction::Release; Key::COUNT],
        }
    }

    /// Returns the last action recorded for `key`.
    ///
    /// [`Key::Unmapped`] is always reported as released.
    pub fn get(&self, key: Key) -> KeyAction {
        key.index()
            .map_or(KeyAction::Release, |slot| self.actions[slot])
    }

    /// Records `action` for `key`.
    ///
    /// Returns `false` (and records nothing) for [`Key::Unmapped`].
    pub fn set(&mut self, key: Key, action: KeyAction) -> bool {
        match key.index() {
            Some(slot) => {
                self.actions[slot] = action;
                true
            }
            None => false,
        }
    }

    /// Returns the keys whose last action is not [`KeyAction::Release`].
    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL
            .into_iter()
            .filter(|&key| self.get(key) != KeyAction::Release)
    }

    /// Forces every held key to [`KeyAction::Release`] and returns the keys
    /// that changed, in key order.
    pub fn release_all(&mut self) -> Vec<Key> {
        let released: Vec<Key> = self.held().collect();
        for &key in &released {
            self.set(key, KeyAction::Release);
        }
        released
    }
}

impl Default for KeyStates {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide keyboard and mouse state sampled after each poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    keys: [bool; 256],
    buttons: [bool; 3],
}

impl InputSnapshot {
    /// Creates a snapshot with nothing held.
    pub fn new() -> Self {
        Self {
            keys: [false; 256],
            buttons: [false; 3],
        }
    }

    /// Builds a snapshot from a raw 256-byte keyboard state (high bit set
    /// means "down", as returned by `GetKeyboardState`) and the three button
    /// states.
    pub fn from_raw(keyboard: &[u8; 256], left: bool, middle: bool, right: bool) -> Self {
        let mut keys = [false; 256];
        for (down, &state) in keys.iter_mut().zip(keyboard.iter()) {
            *down = state & 0x80 != 0;
        }
        Self {
            keys,
            buttons: [left, middle, right],
        }
    }

    /// Returns `true` if the native key `vk` was down when sampled.
    pub fn is_vk_down(&self, vk: u8) -> bool {
        self.keys[vk as usize]
    }

    /// Returns `true` if the logical `key` was down when sampled.
    ///
    /// [`Key::Unmapped`] is never down.
    pub fn is_key_down(&self, key: Key) -> bool {
        windows_vk::key_to_vk(key).is_some_and(|vk| self.is_vk_down(vk))
    }

    /// Returns `true` if `button` was down when sampled.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_key_states_are_all_released() {
        let states = KeyStates::new();
        for key in Key::ALL {
            assert_eq!(states.get(key), KeyAction::Release);
        }
        assert_eq!(states.held().count(), 0);
    }

    #[test]
    fn test_set_unmapped_is_rejected() {
        let mut states = KeyStates::new();
        assert!(!states.set(Key::Unmapped, KeyAction::Press));
        assert_eq!(states.get(Key::Unmapped), KeyAction::Release);
    }

    #[test]
    fn test_release_all_returns_only_held_keys_in_order() {
        // Arrange
        let mut states = KeyStates::new();
        states.set(Key::W, KeyAction::Press);
        states.set(Key::A, KeyAction::Repeat);
        states.set(Key::Space, KeyAction::Release);

        // Act
        let released = states.release_all();

        // Assert
        assert_eq!(released, vec![Key::A, Key::W]);
        assert_eq!(states.held().count(), 0);
    }

    #[test]
    fn test_release_all_is_empty_when_nothing_held() {
        let mut states = KeyStates::new();
        assert!(states.release_all().is_empty());
    }

    #[test]
    fn test_snapshot_from_raw_reads_high_bit_only() {
        // Arrange
        let mut raw = [0u8; 256];
        raw[0x41] = 0x80; // A down
        raw[0x42] = 0x01; // B toggled but up

        // Act
        let snapshot = InputSnapshot::from_raw(&raw, true, false, true);

        // Assert
        assert!(snapshot.is_key_down(Key::A));
        assert!(!snapshot.is_key_down(Key::B));
        assert!(snapshot.is_button_down(MouseButton::Left));
        assert!(!snapshot.is_button_down(MouseButton::Middle));
        assert!(snapshot.is_button_down(MouseButton::Right));
    }

    #[test]
    fn test_snapshot_unmapped_is_never_down() {
        let snapshot = InputSnapshot::from_raw(&[0xFF; 256], false, false, false);
        assert!(!snapshot.is_key_down(Key::Unmapped));
    }

    #[test]
    fn test_virtual_and_captured_both_confine_the_cursor() {
        assert!(!CursorMode::Normal.confines_cursor());
        assert!(CursorMode::Captured.confines_cursor());
        assert!(CursorMode::Virtual.confines_cursor());
    }
}
