//! Cursor capture through the OS cursor clip.
//!
//! The clip region is a single process-wide setting: clipping to window B
//! replaces whatever clip window A installed, and releasing the clip frees
//! the cursor no matter who set it.  Capture is therefore only held while
//! the capturing window has focus; the translator re-applies it on focus
//! gain and drops it on focus loss.

use casement_core::{CursorMode, Rect};
use tracing::debug;

use crate::native::{NativeApi, NativeHandle};

/// Confines the cursor to the current client rectangle of `handle` and
/// returns that rectangle.
pub fn capture<N: NativeApi>(native: &N, handle: NativeHandle) -> Rect {
    let client = native.client_rect(handle);
    native.clip_cursor(Some(client));
    debug!(?handle, ?client, "cursor confined");
    client
}

/// Removes any cursor clip.
pub fn release<N: NativeApi>(native: &N) {
    native.clip_cursor(None);
    debug!("cursor released");
}

/// Applies `mode` for a window that has (or just gained) focus.
pub fn enter_mode<N: NativeApi>(native: &N, handle: NativeHandle, mode: CursorMode) {
    match mode {
        CursorMode::Normal => {}
        CursorMode::Captured => {
            capture(native, handle);
        }
        // Same clip as Captured; no hidden or relative motion yet.
        CursorMode::Virtual => {
            capture(native, handle);
        }
    }
}

/// Undoes `mode` for a window that is losing focus or switching modes.
pub fn leave_mode<N: NativeApi>(native: &N, mode: CursorMode) {
    if mode.confines_cursor() {
        release(native);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::mock::MockNative;

    #[test]
    fn test_capture_clips_to_client_rect() {
        // Arrange
        let native = MockNative::new();
        let handle = NativeHandle(0x20);
        native.add_window_at(handle, Rect::new(100, 100, 500, 400));

        // Act
        let clip = capture(&native, handle);

        // Assert
        assert_eq!(native.cursor_clip(), Some(clip));
        assert_eq!(clip, native.client_rect(handle));
    }

    #[test]
    fn test_second_capture_supersedes_first() {
        let native = MockNative::new();
        let a = NativeHandle(0x20);
        let b = NativeHandle(0x30);
        native.add_window_at(a, Rect::new(0, 0, 300, 300));
        native.add_window_at(b, Rect::new(1000, 0, 1400, 300));

        capture(&native, a);
        capture(&native, b);

        assert_eq!(native.cursor_clip(), Some(native.client_rect(b)));
    }

    #[test]
    fn test_normal_mode_leaves_clip_untouched() {
        let native = MockNative::new();
        let handle = NativeHandle(0x20);
        native.add_window_at(handle, Rect::new(0, 0, 300, 300));

        enter_mode(&native, handle, CursorMode::Normal);
        leave_mode(&native, CursorMode::Normal);

        assert_eq!(native.cursor_clip(), None);
        assert_eq!(native.clip_calls(), 0);
    }

    #[test]
    fn test_virtual_mode_clips_like_captured() {
        let native = MockNative::new();
        let handle = NativeHandle(0x20);
        native.add_window_at(handle, Rect::new(0, 0, 300, 300));

        enter_mode(&native, handle, CursorMode::Virtual);
        let virtual_clip = native.cursor_clip();
        leave_mode(&native, CursorMode::Virtual);
        enter_mode(&native, handle, CursorMode::Captured);

        assert_eq!(virtual_clip, native.cursor_clip());
        assert!(virtual_clip.is_some());
    }
}
