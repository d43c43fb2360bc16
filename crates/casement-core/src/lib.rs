//! # casement-core
//!
//! OS-independent foundation of the casement window/input library: the
//! logical input model every platform backend translates into, plus the pure
//! pieces of window management that can be reasoned about without a live
//! window.
//!
//! This crate has zero dependencies on OS APIs.  Everything here can be unit
//! tested on any host.
//!
//! # Architecture overview (for beginners)
//!
//! A desktop window library sits between the operating system and an
//! application.  The OS reports things like "virtual key 0x41 went down on
//! window 0x3F0A2" and the application wants to hear "key A was pressed on my
//! main window".  The platform backend (`casement-win32`) does that
//! translation; this crate defines the vocabulary it translates into:
//!
//! - **`keymap`** – The closed set of logical keys ([`Key`]) and the table
//!   that maps Windows Virtual Key codes onto it.
//!
//! - **`input`** – Key and button actions, cursor modes, the per-window key
//!   state array and the polled keyboard/mouse snapshot.
//!
//! - **`geometry`** – Rectangles, points, sizes and the [`FrameInsets`]
//!   conversion between whole-window and content (client) coordinates.
//!
//! - **`hit_test`** – The named window regions used by undecorated windows
//!   and the built-in border heuristic that classifies a cursor position.

pub mod geometry;
pub mod hit_test;
pub mod input;
pub mod keymap;

pub use geometry::{FrameInsets, GeometryError, Point, Rect, Size};
pub use hit_test::{border_hit_test, HitRegion, DEFAULT_BORDER_WIDTH};
pub use input::{ButtonAction, CursorMode, InputSnapshot, KeyAction, KeyStates, MouseButton};
pub use keymap::Key;
