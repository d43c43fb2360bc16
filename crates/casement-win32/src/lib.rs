//! # casement-win32
//!
//! Win32 platform backend of the casement window/input library.
//!
//! # Architecture overview (for beginners)
//!
//! A Win32 program never asks "what happened?".  Instead the OS calls the
//! window procedure of each window with a *message* (key went down, window
//! lost focus, "which part of you is under the cursor?") while the program
//! pumps its message queue.  This crate turns that inverted flow into the
//! callback API described in `casement-core`:
//!
//! - **`platform`** – [`Platform`], the process-wide context.  Registers the
//!   window class, bootstraps the graphics backend (the WGL loader for
//!   OpenGL), owns every window and pumps messages.
//!
//! - **`window`** – [`Window`] handles, creation parameters and the
//!   per-window callbacks and key state.
//!
//! - **`translator`** – The message router: decodes each message, updates
//!   window state and fires callbacks synchronously.
//!
//! - **`message`** – Message identifiers and the pure decoding of
//!   `wparam`/`lparam` into [`message::WindowMessage`].
//!
//! - **`cursor`** – Cursor capture via the OS clip rectangle.
//!
//! - **`gl`** – The WGL extension loader: mandatory entry points, optional
//!   extensions and the typed attribute lists they take.
//!
//! - **`native`** – The [`NativeApi`] seam: a real Win32 implementation on
//!   Windows and [`MockNative`], a simulated window manager used by the
//!   tests and available on every host.
//!
//! - **`config`** – TOML configuration ([`PlatformConfig`]).
//!
//! # Threading
//!
//! Win32 windows belong to the thread that created them.  [`Platform`] and
//! [`Window`] are deliberately `!Send`: create, poll and destroy everything
//! on one thread.

pub mod config;
pub mod cursor;
pub mod gl;
pub mod message;
pub mod native;
pub mod platform;
mod translator;
pub mod window;

pub use casement_core;
pub use config::{Backend, ConfigError, PlatformConfig};
pub use native::mock::MockNative;
pub use native::{NativeApi, NativeError, NativeHandle};
pub use platform::{ExternalBackend, Platform, PlatformError};
pub use window::{HitTestQuery, Window, WindowCreateInfo, WindowError, WindowId};

#[cfg(target_os = "windows")]
pub use native::windows::Win32Native;
