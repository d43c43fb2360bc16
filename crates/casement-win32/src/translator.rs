//! The event translator: native window messages in, window state updates
//! and callbacks out.
//!
//! [`EventTranslator`] is installed as the thread's [`MessageRouter`].  For
//! every message it looks up the window record, updates state and fires
//! callbacks, and tells the window procedure whether the OS default handling
//! should still run.
//!
//! | Message                    | Effect                                                        | Result            |
//! |----------------------------|---------------------------------------------------------------|-------------------|
//! | `WM_ACTIVATE`              | re-extend frame (undecorated), default proc, activate callback | default result    |
//! | `WM_NCCALCSIZE` (`TRUE`)   | undecorated: client area = whole window                       | `0` / default     |
//! | `WM_NCHITTEST`             | callback, else border heuristic when undecorated              | `HT*` / default   |
//! | `WM_SETFOCUS`              | focus flag, re-apply cursor clip, activate callback           | default           |
//! | `WM_KILLFOCUS`             | release clip, release held keys, activate callback            | default           |
//! | `WM_(SYS)KEYDOWN/UP`       | key state + key callback                                      | default           |
//! | `WM_[LMR]BUTTON*`          | mouse button callback (X buttons dropped)                     | `0`               |
//! | `WM_MOUSEMOVE`             | cursor position callback                                      | `0`               |
//! | `WM_CLOSE`                 | close flag                                                    | `0`               |
//!
//! Key messages always fall through to the default procedure so the OS keeps
//! its own handling (Alt+F4, the system menu on Alt+Space, ...).

use std::rc::Rc;

use casement_core::{border_hit_test, keymap::windows_vk, Key, KeyAction, Point};
use tracing::{debug, trace};

use crate::cursor;
use crate::message::{hit_test_code, WindowMessage};
use crate::native::{MessageRouter, NativeApi, NativeHandle, RawMessage, FRAME_EXTENSION};
use crate::window::{HitTestQuery, WindowRecord, WindowRegistry};

/// Routes native messages for every registered window.
pub(crate) struct EventTranslator<N: NativeApi> {
    native: N,
    registry: Rc<WindowRegistry>,
    border_width: i32,
}

impl<N: NativeApi> EventTranslator<N> {
    pub(crate) fn new(native: N, registry: Rc<WindowRegistry>, border_width: i32) -> Self {
        Self {
            native,
            registry,
            border_width,
        }
    }

    /// Translates one message for `window`.
    pub(crate) fn translate(&self, window: &WindowRecord, raw: RawMessage) -> Option<isize> {
        match WindowMessage::decode(raw) {
            WindowMessage::Activate { active } => Some(self.on_activate(window, raw, active)),
            WindowMessage::NcCalcSize { calc_valid_rects } => {
                (calc_valid_rects && !window.is_decorated()).then_some(0)
            }
            WindowMessage::NcHitTest { cursor } => self.on_hit_test(window, cursor),
            WindowMessage::SetFocus => {
                self.on_focus_gained(window);
                None
            }
            WindowMessage::KillFocus => {
                self.on_focus_lost(window);
                None
            }
            WindowMessage::Key { vk, down, was_down, extended } => {
                let action = match (down, was_down) {
                    (false, _) => KeyAction::Release,
                    (true, false) => KeyAction::Press,
                    (true, true) => KeyAction::Repeat,
                };
                self.on_key(window, windows_vk::vk_to_key(vk, extended), action);
                None
            }
            WindowMessage::MouseButton { button, action } => {
                match button {
                    Some(button) => window.emit_mouse_button(button, action),
                    None => trace!(id = %window.id(), "dropping extra mouse button"),
                }
                Some(0)
            }
            WindowMessage::MouseMove { position } => {
                window.emit_cursor_pos(position.x, position.y);
                Some(0)
            }
            WindowMessage::Close => {
                debug!(id = %window.id(), "close requested");
                window.request_close();
                Some(0)
            }
            WindowMessage::Other => None,
        }
    }

    fn on_activate(&self, window: &WindowRecord, raw: RawMessage, active: bool) -> isize {
        if !window.is_decorated() {
            extend_frame(&self.native, window.handle());
        }
        let result = self.native.default_window_proc(window.handle(), raw);
        window.emit_activate(active);
        result
    }

    /// A registered callback always answers. Without one, undecorated
    /// windows use the border heuristic and decorated windows keep the OS
    /// default hit-testing.
    fn on_hit_test(&self, window: &WindowRecord, cursor: Point) -> Option<isize> {
        let query = HitTestQuery {
            cursor,
            window_rect: self.native.window_rect(window.handle()),
            client_rect: self.native.client_rect(window.handle()),
        };
        let region = match window.query_hit_test(query) {
            Some(region) => region,
            None if window.is_decorated() => return None,
            None => border_hit_test(cursor, query.window_rect, self.border_width),
        };
        Some(hit_test_code(region))
    }

    fn on_focus_gained(&self, window: &WindowRecord) {
        window.set_focused(true);
        cursor::enter_mode(&self.native, window.handle(), window.cursor_mode());
        window.emit_activate(true);
    }

    /// Order matters: the clip is released before any callback runs, then
    /// every held key gets a synthetic release, then the application hears
    /// about the focus loss.
    fn on_focus_lost(&self, window: &WindowRecord) {
        window.set_focused(false);
        cursor::leave_mode(&self.native, window.cursor_mode());
        let released = window.release_all_keys();
        if !released.is_empty() {
            debug!(id = %window.id(), count = released.len(), "releasing held keys on focus loss");
        }
        for key in released {
            window.emit_key(key, KeyAction::Release);
        }
        window.emit_activate(false);
    }

    fn on_key(&self, window: &WindowRecord, key: Key, action: KeyAction) {
        if window.record_key(key, action) {
            window.emit_key(key, action);
        }
    }
}

impl<N: NativeApi> MessageRouter for EventTranslator<N> {
    fn route(&self, handle: NativeHandle, message: RawMessage) -> Option<isize> {
        let window = self.registry.lookup(handle)?;
        self.translate(&window, message)
    }
}

/// Extends the DWM frame one pixel into the client area and makes the OS
/// recompute the non-client area, so an undecorated window keeps its
/// shadow and loses its visible frame.
pub(crate) fn extend_frame<N: NativeApi>(native: &N, handle: NativeHandle) {
    native.extend_frame_into_client_area(handle, FRAME_EXTENSION);
    native.refresh_frame(handle);
}
