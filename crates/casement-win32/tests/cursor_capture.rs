//! Integration tests for cursor capture across focus changes.

use casement_win32::casement_core::{CursorMode, Rect};
use casement_win32::native::NativeApi;
use casement_win32::{MockNative, Platform, PlatformConfig, Window, WindowCreateInfo};

fn init(native: &MockNative) -> Platform<MockNative> {
    Platform::init(native.clone(), PlatformConfig::default()).expect("mock bootstrap")
}

fn captured_window(platform: &mut Platform<MockNative>, title: &str) -> Window {
    let window = platform
        .create_window(&WindowCreateInfo::new(400, 300, title))
        .expect("create window");
    platform.set_cursor_mode(&window, CursorMode::Captured);
    window
}

#[test]
fn test_focus_gain_confines_cursor_to_client_rect() {
    let native = MockNative::new();
    let mut platform = init(&native);
    let window = captured_window(&mut platform, "capture");
    let handle = platform.native_handle(&window);

    native.focus_window(handle);

    assert_eq!(native.cursor_clip(), Some(native.client_rect(handle)));
    assert!(window.has_focus());
}

#[test]
fn test_second_capturing_window_supersedes_the_first() {
    // Arrange
    let native = MockNative::new();
    let mut platform = init(&native);
    let first = captured_window(&mut platform, "first");
    let second = captured_window(&mut platform, "second");
    let (a, b) = (platform.native_handle(&first), platform.native_handle(&second));
    native.set_window_rect(b, Rect::new(1000, 100, 1400, 400));

    // Act
    native.focus_window(a);
    native.focus_window(b);

    // Assert: A's focus loss released the clip, B's gain installed its own.
    assert_eq!(native.cursor_clip(), Some(native.client_rect(b)));
    assert_ne!(native.cursor_clip(), Some(native.client_rect(a)));
}

#[test]
fn test_focus_loss_releases_the_clip() {
    let native = MockNative::new();
    let mut platform = init(&native);
    let window = captured_window(&mut platform, "capture");
    native.focus_window(platform.native_handle(&window));

    native.blur();

    assert_eq!(native.cursor_clip(), None);
    assert_eq!(window.cursor_mode(), CursorMode::Captured, "the mode itself is kept");
}

#[test]
fn test_refocus_re_applies_the_current_client_rect() {
    // Arrange
    let native = MockNative::new();
    let mut platform = init(&native);
    let window = captured_window(&mut platform, "capture");
    let handle = platform.native_handle(&window);
    native.focus_window(handle);
    native.blur();

    // Act: the user moved the window while it was in the background.
    native.set_window_rect(handle, Rect::new(500, 500, 900, 800));
    native.focus_window(handle);

    // Assert
    assert_eq!(native.cursor_clip(), Some(native.client_rect(handle)));
}

#[test]
fn test_normal_mode_window_never_touches_the_clip() {
    let native = MockNative::new();
    let mut platform = init(&native);
    let window = platform
        .create_window(&WindowCreateInfo::new(400, 300, "free"))
        .expect("create window");

    native.focus_window(platform.native_handle(&window));
    native.blur();

    assert_eq!(native.clip_calls(), 0);
}

#[test]
fn test_mode_change_on_focused_window_applies_immediately() {
    // Arrange
    let native = MockNative::new();
    let mut platform = init(&native);
    let window = platform
        .create_window(&WindowCreateInfo::new(400, 300, "switch"))
        .expect("create window");
    let handle = platform.native_handle(&window);
    native.focus_window(handle);

    // Act
    platform.set_cursor_mode(&window, CursorMode::Captured);
    let after_capture = native.cursor_clip();
    platform.set_cursor_mode(&window, CursorMode::Normal);

    // Assert
    assert_eq!(after_capture, Some(native.client_rect(handle)));
    assert_eq!(native.cursor_clip(), None);
}

#[test]
fn test_virtual_mode_behaves_like_captured() {
    let native = MockNative::new();
    let mut platform = init(&native);
    let window = platform
        .create_window(&WindowCreateInfo::new(400, 300, "virtual"))
        .expect("create window");
    let handle = platform.native_handle(&window);
    platform.set_cursor_mode(&window, CursorMode::Virtual);

    native.focus_window(handle);
    let focused_clip = native.cursor_clip();
    native.blur();

    assert_eq!(focused_clip, Some(native.client_rect(handle)));
    assert_eq!(native.cursor_clip(), None);
}
