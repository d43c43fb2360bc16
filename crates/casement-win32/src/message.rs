//! Window message identifiers, decoding and synthesis.
//!
//! [`WindowMessage::decode`] turns a [`RawMessage`] into the handful of cases
//! the event translator acts on.  Everything else decodes to
//! [`WindowMessage::Other`] and receives default handling.
//!
//! The `RawMessage` constructors below build messages with the same
//! `wParam`/`lParam` packing the OS uses.  The mock native layer and the
//! tests use them to inject input.
//!
//! # Key message flags (for beginners)
//!
//! `WM_KEYDOWN`/`WM_KEYUP` carry the virtual key in `wParam` and a packed
//! flag word in `lParam`:
//!
//! | Bits  | Meaning                                             |
//! |-------|-----------------------------------------------------|
//! | 0-15  | repeat count                                        |
//! | 16-23 | scan code                                           |
//! | 24    | extended key (right-hand Ctrl/Alt, numpad Enter...) |
//! | 30    | previous key state: 1 if the key was already down   |
//! | 31    | transition state: 1 for key up                      |
//!
//! Bit 30 is what distinguishes the first press from auto-repeat.

use casement_core::{ButtonAction, HitRegion, MouseButton, Point};

use crate::native::RawMessage;

pub const WM_ACTIVATE: u32 = 0x0006;
pub const WM_SETFOCUS: u32 = 0x0007;
pub const WM_KILLFOCUS: u32 = 0x0008;
pub const WM_CLOSE: u32 = 0x0010;
pub const WM_NCCALCSIZE: u32 = 0x0083;
pub const WM_NCHITTEST: u32 = 0x0084;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_XBUTTONDOWN: u32 = 0x020B;
pub const WM_XBUTTONUP: u32 = 0x020C;

/// `WA_INACTIVE`: the low word of `WM_ACTIVATE`'s `wParam` on deactivation.
pub const WA_INACTIVE: usize = 0;
/// `WA_ACTIVE`.
pub const WA_ACTIVE: usize = 1;

// ── Hit-test result codes (WM_NCHITTEST) ──────────────────────────────────────

pub const HTNOWHERE: isize = 0;
pub const HTCLIENT: isize = 1;
pub const HTCAPTION: isize = 2;
pub const HTMINBUTTON: isize = 8;
pub const HTMAXBUTTON: isize = 9;
pub const HTLEFT: isize = 10;
pub const HTRIGHT: isize = 11;
pub const HTTOP: isize = 12;
pub const HTTOPLEFT: isize = 13;
pub const HTTOPRIGHT: isize = 14;
pub const HTBOTTOM: isize = 15;
pub const HTBOTTOMLEFT: isize = 16;
pub const HTBOTTOMRIGHT: isize = 17;
pub const HTCLOSE: isize = 20;

const KEY_EXTENDED: isize = 1 << 24;
const KEY_PREVIOUS_STATE: isize = 1 << 30;
const KEY_TRANSITION: isize = 1 << 31;

/// The subset of window messages the translator handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    Activate {
        active: bool,
    },
    NcCalcSize {
        /// `wParam == TRUE`: the application may pick the client area.
        calc_valid_rects: bool,
    },
    NcHitTest {
        cursor: Point,
    },
    SetFocus,
    KillFocus,
    Key {
        vk: u32,
        down: bool,
        /// The key was already down before this message (bit 30).
        was_down: bool,
        extended: bool,
    },
    /// A mouse button message.  `button` is `None` for the X buttons.
    MouseButton {
        button: Option<MouseButton>,
        action: ButtonAction,
    },
    MouseMove {
        position: Point,
    },
    Close,
    Other,
}

impl WindowMessage {
    /// Decodes `raw` into a [`WindowMessage`].
    pub fn decode(raw: RawMessage) -> Self {
        match raw.id {
            WM_ACTIVATE => WindowMessage::Activate {
                active: raw.wparam & 0xFFFF != WA_INACTIVE,
            },
            WM_NCCALCSIZE => WindowMessage::NcCalcSize {
                calc_valid_rects: raw.wparam != 0,
            },
            WM_NCHITTEST => WindowMessage::NcHitTest {
                cursor: point_from_lparam(raw.lparam),
            },
            WM_SETFOCUS => WindowMessage::SetFocus,
            WM_KILLFOCUS => WindowMessage::KillFocus,
            WM_KEYDOWN | WM_SYSKEYDOWN | WM_KEYUP | WM_SYSKEYUP => WindowMessage::Key {
                vk: raw.wparam as u32,
                down: matches!(raw.id, WM_KEYDOWN | WM_SYSKEYDOWN),
                was_down: raw.lparam & KEY_PREVIOUS_STATE != 0,
                extended: raw.lparam & KEY_EXTENDED != 0,
            },
            WM_LBUTTONDOWN => button(Some(MouseButton::Left), ButtonAction::Press),
            WM_LBUTTONUP => button(Some(MouseButton::Left), ButtonAction::Release),
            WM_MBUTTONDOWN => button(Some(MouseButton::Middle), ButtonAction::Press),
            WM_MBUTTONUP => button(Some(MouseButton::Middle), ButtonAction::Release),
            WM_RBUTTONDOWN => button(Some(MouseButton::Right), ButtonAction::Press),
            WM_RBUTTONUP => button(Some(MouseButton::Right), ButtonAction::Release),
            WM_XBUTTONDOWN => button(None, ButtonAction::Press),
            WM_XBUTTONUP => button(None, ButtonAction::Release),
            WM_MOUSEMOVE => WindowMessage::MouseMove {
                position: point_from_lparam(raw.lparam),
            },
            WM_CLOSE => WindowMessage::Close,
            _ => WindowMessage::Other,
        }
    }
}

fn button(button: Option<MouseButton>, action: ButtonAction) -> WindowMessage {
    WindowMessage::MouseButton { button, action }
}

/// Reads the signed 16-bit x/y pair packed into an `lParam`
/// (`GET_X_LPARAM`/`GET_Y_LPARAM`).  Multi-monitor setups produce negative
/// coordinates, so the words must be sign-extended.
pub fn point_from_lparam(lparam: isize) -> Point {
    let x = (lparam & 0xFFFF) as u16 as i16;
    let y = ((lparam >> 16) & 0xFFFF) as u16 as i16;
    Point::new(x as i32, y as i32)
}

/// Packs `point` into an `lParam` (`MAKELPARAM`).
pub fn lparam_from_point(point: Point) -> isize {
    let packed = ((point.y as u16 as u32) << 16) | point.x as u16 as u32;
    packed as isize
}

/// The `WM_NCHITTEST` result code for `region`.
pub fn hit_test_code(region: HitRegion) -> isize {
    match region {
        HitRegion::Top => HTTOP,
        HitRegion::Bottom => HTBOTTOM,
        HitRegion::Left => HTLEFT,
        HitRegion::Right => HTRIGHT,
        HitRegion::TopLeft => HTTOPLEFT,
        HitRegion::TopRight => HTTOPRIGHT,
        HitRegion::BottomLeft => HTBOTTOMLEFT,
        HitRegion::BottomRight => HTBOTTOMRIGHT,
        HitRegion::Client => HTCLIENT,
        HitRegion::Titlebar => HTCAPTION,
        HitRegion::MinimizeButton => HTMINBUTTON,
        HitRegion::MaximizeButton => HTMAXBUTTON,
        HitRegion::CloseButton => HTCLOSE,
        HitRegion::Nowhere => HTNOWHERE,
    }
}

// ── Synthesis ─────────────────────────────────────────────────────────────────

impl RawMessage {
    /// `WM_KEYDOWN` for `vk`.  `repeat` sets the previous-state bit.
    pub fn key_down(vk: u8, repeat: bool, extended: bool) -> Self {
        let mut lparam = 1;
        if extended {
            lparam |= KEY_EXTENDED;
        }
        if repeat {
            lparam |= KEY_PREVIOUS_STATE;
        }
        Self::new(WM_KEYDOWN, vk as usize, lparam)
    }

    /// `WM_KEYUP` for `vk`.
    pub fn key_up(vk: u8, extended: bool) -> Self {
        let mut lparam = 1 | KEY_PREVIOUS_STATE | KEY_TRANSITION;
        if extended {
            lparam |= KEY_EXTENDED;
        }
        Self::new(WM_KEYUP, vk as usize, lparam)
    }

    /// `WM_SYSKEYDOWN` (a key pressed while Alt is held).
    pub fn sys_key_down(vk: u8, repeat: bool) -> Self {
        Self {
            id: WM_SYSKEYDOWN,
            ..Self::key_down(vk, repeat, false)
        }
    }

    /// `WM_SYSKEYUP`.
    pub fn sys_key_up(vk: u8) -> Self {
        Self {
            id: WM_SYSKEYUP,
            ..Self::key_up(vk, false)
        }
    }

    /// A button message for `button` at client position `(x, y)`.
    pub fn mouse_button(button: MouseButton, action: ButtonAction, x: i32, y: i32) -> Self {
        let id = match (button, action) {
            (MouseButton::Left, ButtonAction::Press) => WM_LBUTTONDOWN,
            (MouseButton::Left, ButtonAction::Release) => WM_LBUTTONUP,
            (MouseButton::Middle, ButtonAction::Press) => WM_MBUTTONDOWN,
            (MouseButton::Middle, ButtonAction::Release) => WM_MBUTTONUP,
            (MouseButton::Right, ButtonAction::Press) => WM_RBUTTONDOWN,
            (MouseButton::Right, ButtonAction::Release) => WM_RBUTTONUP,
        };
        Self::new(id, 0, lparam_from_point(Point::new(x, y)))
    }

    /// `WM_XBUTTONDOWN` for X button `index` (1 or 2).
    pub fn x_button_down(index: u16) -> Self {
        Self::new(WM_XBUTTONDOWN, (index as usize) << 16, 0)
    }

    /// `WM_MOUSEMOVE` at client position `(x, y)`.
    pub fn mouse_move(x: i32, y: i32) -> Self {
        Self::new(WM_MOUSEMOVE, 0, lparam_from_point(Point::new(x, y)))
    }

    /// `WM_NCHITTEST` at screen position `(x, y)`.
    pub fn nc_hit_test(x: i32, y: i32) -> Self {
        Self::new(WM_NCHITTEST, 0, lparam_from_point(Point::new(x, y)))
    }

    /// `WM_NCCALCSIZE`.
    pub fn nc_calc_size(calc_valid_rects: bool) -> Self {
        Self::new(WM_NCCALCSIZE, calc_valid_rects as usize, 0)
    }

    /// `WM_ACTIVATE`.
    pub fn activate(active: bool) -> Self {
        let state = if active { WA_ACTIVE } else { WA_INACTIVE };
        Self::new(WM_ACTIVATE, state, 0)
    }

    pub fn set_focus() -> Self {
        Self::new(WM_SETFOCUS, 0, 0)
    }

    pub fn kill_focus() -> Self {
        Self::new(WM_KILLFOCUS, 0, 0)
    }

    pub fn close() -> Self {
        Self::new(WM_CLOSE, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_key_down_is_not_previously_down() {
        let decoded = WindowMessage::decode(RawMessage::key_down(0x41, false, false));
        assert_eq!(
            decoded,
            WindowMessage::Key { vk: 0x41, down: true, was_down: false, extended: false }
        );
    }

    #[test]
    fn test_repeat_key_down_sets_previous_state() {
        let decoded = WindowMessage::decode(RawMessage::key_down(0x41, true, false));
        assert!(matches!(decoded, WindowMessage::Key { down: true, was_down: true, .. }));
    }

    #[test]
    fn test_extended_flag_is_bit_24() {
        // Bit 23 is part of the scan code and must not be read as "extended".
        let scan_code_only = RawMessage::new(WM_KEYDOWN, 0x0D, 1 << 23);
        assert!(matches!(
            WindowMessage::decode(scan_code_only),
            WindowMessage::Key { extended: false, .. }
        ));
        assert!(matches!(
            WindowMessage::decode(RawMessage::key_down(0x0D, false, true)),
            WindowMessage::Key { extended: true, .. }
        ));
    }

    #[test]
    fn test_sys_keys_decode_like_plain_keys() {
        assert!(matches!(
            WindowMessage::decode(RawMessage::sys_key_down(0x41, false)),
            WindowMessage::Key { down: true, .. }
        ));
        assert!(matches!(
            WindowMessage::decode(RawMessage::sys_key_up(0x41)),
            WindowMessage::Key { down: false, .. }
        ));
    }

    #[test]
    fn test_negative_coordinates_are_sign_extended() {
        let raw = RawMessage::nc_hit_test(-1200, -5);
        assert_eq!(
            WindowMessage::decode(raw),
            WindowMessage::NcHitTest { cursor: Point::new(-1200, -5) }
        );
    }

    #[test]
    fn test_activate_reads_low_word_only() {
        // High word carries the minimised flag and must be ignored.
        let minimised_inactive = RawMessage::new(WM_ACTIVATE, 0x0001_0000, 0);
        assert_eq!(
            WindowMessage::decode(minimised_inactive),
            WindowMessage::Activate { active: false }
        );
        assert_eq!(
            WindowMessage::decode(RawMessage::activate(true)),
            WindowMessage::Activate { active: true }
        );
    }

    #[test]
    fn test_x_buttons_decode_without_a_button() {
        assert_eq!(
            WindowMessage::decode(RawMessage::x_button_down(1)),
            WindowMessage::MouseButton { button: None, action: ButtonAction::Press }
        );
    }

    #[test]
    fn test_every_reported_button_round_trips_through_synthesis() {
        for button in MouseButton::ALL {
            for action in [ButtonAction::Press, ButtonAction::Release] {
                assert_eq!(
                    WindowMessage::decode(RawMessage::mouse_button(button, action, 3, 4)),
                    WindowMessage::MouseButton { button: Some(button), action }
                );
            }
        }
    }

    #[test]
    fn test_unhandled_ids_decode_to_other() {
        assert_eq!(WindowMessage::decode(RawMessage::new(0x000F, 0, 0)), WindowMessage::Other);
    }

    #[test]
    fn test_hit_test_codes_match_winuser() {
        assert_eq!(hit_test_code(HitRegion::Client), 1);
        assert_eq!(hit_test_code(HitRegion::Titlebar), 2);
        assert_eq!(hit_test_code(HitRegion::TopLeft), 13);
        assert_eq!(hit_test_code(HitRegion::BottomRight), 17);
        assert_eq!(hit_test_code(HitRegion::CloseButton), 20);
        assert_eq!(hit_test_code(HitRegion::Nowhere), 0);
    }
}
