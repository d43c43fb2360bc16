//! The seam between the platform logic and the operating system.
//!
//! Everything the backend needs from Win32 (window class, windows, DWM frame,
//! cursor clip, message queue, keyboard state, the OpenGL module) goes through
//! the [`NativeApi`] trait.  On Windows [`windows::Win32Native`] implements it
//! with real API calls; on every host [`mock::MockNative`] implements it with
//! a small simulated window manager so the translator, capture and lifecycle
//! rules can be tested without a desktop session.
//!
//! # Message routing
//!
//! Win32 delivers messages by calling the window procedure of the window's
//! class.  The backend installs a single [`MessageRouter`] per thread; the
//! window procedure hands every message to it and falls back to the OS
//! default handling whenever the router returns `None`.  The router is the
//! only place that sees a message together with the backend's per-window
//! record, which is what allows callbacks to fire synchronously from inside
//! the message pump.

use std::rc::Rc;

use casement_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gl::{Hdc, SymbolSource};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Errors reported by the native layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NativeError {
    /// An OS call failed; `code` is the thread's last-error value.
    #[error("{call} failed with OS error {code}")]
    Os { call: &'static str, code: u32 },
}

/// An opaque native window handle (`HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub isize);

/// A window message as delivered to the window procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub id: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub const fn new(id: u32, wparam: usize, lparam: isize) -> Self {
        Self { id, wparam, lparam }
    }
}

/// Window style bits passed at creation and to frame size queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowStyle {
    pub style: u32,
    pub ex_style: u32,
}

const WS_POPUP: u32 = 0x8000_0000;
const WS_CLIPSIBLINGS: u32 = 0x0400_0000;
const WS_CLIPCHILDREN: u32 = 0x0200_0000;
const WS_CAPTION: u32 = 0x00C0_0000;
const WS_SYSMENU: u32 = 0x0008_0000;
const WS_THICKFRAME: u32 = 0x0004_0000;
const WS_MINIMIZEBOX: u32 = 0x0002_0000;
const WS_MAXIMIZEBOX: u32 = 0x0001_0000;
const WS_EX_APPWINDOW: u32 = 0x0004_0000;

/// The one style mask every window (decorated or not) is created with.
///
/// Undecorated windows keep the caption and thick frame so the OS still
/// provides snapping, shadows and minimise/maximise animations; the frame is
/// removed visually by extending the DWM frame and answering
/// `WM_NCCALCSIZE`.
pub const WINDOW_STYLE: WindowStyle = WindowStyle {
    style: WS_CLIPSIBLINGS
        | WS_CLIPCHILDREN
        | WS_POPUP
        | WS_THICKFRAME
        | WS_CAPTION
        | WS_SYSMENU
        | WS_MAXIMIZEBOX
        | WS_MINIMIZEBOX,
    ex_style: WS_EX_APPWINDOW,
};

/// Distances by which the DWM frame is extended into the client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// One pixel on every side: enough for DWM to keep drawing the drop shadow
/// of an undecorated window.
pub const FRAME_EXTENSION: Margins = Margins {
    left: 1,
    right: 1,
    top: 1,
    bottom: 1,
};

/// Everything the OS needs to create a top-level window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeWindowDesc {
    /// NUL-terminated UTF-16 title.
    pub title: Vec<u16>,
    /// Outer window size.
    pub size: Size,
    pub style: WindowStyle,
}

/// Show state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowCommand {
    Show,
    Hide,
    Restore,
    Minimize,
    Maximize,
}

/// The legacy pixel format requested for every OpenGL-capable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelFormatDesc {
    pub color_bits: u8,
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    pub double_buffer: bool,
}

impl Default for PixelFormatDesc {
    fn default() -> Self {
        Self {
            color_bits: 24,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
            double_buffer: true,
        }
    }
}

/// Receives every message delivered to a window of the backend's class.
pub trait MessageRouter {
    /// Handles `message` for `handle`.
    ///
    /// `Some(result)` is returned to the OS as the message result.  `None`
    /// asks the window procedure to apply the OS default handling.
    fn route(&self, handle: NativeHandle, message: RawMessage) -> Option<isize>;
}

/// Operations the platform layer needs from the OS.
///
/// Implementations are cheap handles (`Clone`) over shared, thread-bound
/// state; the platform keeps one copy and the installed router another.
/// All rectangles are in screen coordinates.
pub trait NativeApi: SymbolSource + Clone {
    // ── Window class and routing ─────────────────────────────────────────────

    fn register_window_class(&self) -> Result<(), NativeError>;
    fn unregister_window_class(&self);
    /// Installs the router every window procedure call is forwarded to.
    fn install_router(&self, router: Rc<dyn MessageRouter>);
    fn remove_router(&self);

    // ── Windows ──────────────────────────────────────────────────────────────

    fn create_window(&self, desc: &NativeWindowDesc) -> Result<NativeHandle, NativeError>;
    /// Destroys the window.  Messages generated by the destruction (focus
    /// loss in particular) are routed before this returns.
    fn destroy_window(&self, handle: NativeHandle);
    fn set_pixel_format(
        &self,
        handle: NativeHandle,
        format: &PixelFormatDesc,
    ) -> Result<(), NativeError>;
    /// The window's device context, valid for the life of the window.
    fn device_context(&self, handle: NativeHandle) -> Hdc;
    fn show_window(&self, handle: NativeHandle, command: ShowCommand);

    // ── Frame and geometry ───────────────────────────────────────────────────

    fn extend_frame_into_client_area(&self, handle: NativeHandle, margins: Margins);
    /// Makes the OS recompute the non-client area (sends `WM_NCCALCSIZE`).
    fn refresh_frame(&self, handle: NativeHandle);
    /// Outer window rectangle.
    fn window_rect(&self, handle: NativeHandle) -> Rect;
    /// Client rectangle.
    fn client_rect(&self, handle: NativeHandle) -> Rect;
    /// Grows `rect` into the outer rectangle a window of `style` needs to
    /// have `rect` as its client rectangle.
    fn adjust_window_rect(&self, rect: Rect, style: WindowStyle) -> Rect;
    fn move_window(&self, handle: NativeHandle, origin: Point);
    fn resize_window(&self, handle: NativeHandle, size: Size);

    // ── Input ────────────────────────────────────────────────────────────────

    /// Confines the cursor to `region`, or releases it for `None`.  The clip
    /// is process wide: a new region replaces the previous one.
    fn clip_cursor(&self, region: Option<Rect>);
    /// The raw 256-entry keyboard state (high bit = down).
    fn keyboard_state(&self) -> [u8; 256];
    /// Whether the virtual key `vk` is currently down.
    fn is_vk_down(&self, vk: u8) -> bool;

    // ── Messages ─────────────────────────────────────────────────────────────

    /// The OS default handling for `message`.
    fn default_window_proc(&self, handle: NativeHandle, message: RawMessage) -> isize;
    /// Dispatches every pending message (only those for `filter` when set)
    /// without blocking.  Returns the number dispatched.
    fn pump_messages(&self, filter: Option<NativeHandle>) -> usize;

    // ── OpenGL module ────────────────────────────────────────────────────────

    fn load_gl_module(&self) -> Result<(), NativeError>;
    fn unload_gl_module(&self);
}

/// Encodes `text` as NUL-terminated UTF-16.
pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}
