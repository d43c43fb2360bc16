//! Logical windows: the per-window record, callbacks and the registry that
//! maps native handles back to records.
//!
//! # Ownership (for beginners)
//!
//! Each native window has one [`WindowRecord`], shared through an `Rc`
//! between two owners:
//!
//! - the application's [`Window`] value, which is not `Clone` and is
//!   consumed by `Platform::destroy_window`, so a window cannot be used after
//!   it is destroyed;
//! - the [`WindowRegistry`], which the event translator uses to find the
//!   record for an incoming native message.
//!
//! All mutable state lives in `Cell`/`RefCell` because the translator updates
//! a record while the application may hold a `&Window` inside a callback.
//! Records are `!Send`: windows belong to the thread that created them.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use casement_core::{
    ButtonAction, CursorMode, GeometryError, HitRegion, Key, KeyAction, KeyStates, MouseButton,
    Point, Rect,
};
use thiserror::Error;

use crate::native::{NativeError, NativeHandle};

/// Errors returned by window creation.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("invalid window size: {0}")]
    InvalidSize(#[from] GeometryError),

    #[error("native window creation failed: {0}")]
    Native(#[source] NativeError),

    #[error("could not set the pixel format on the new window: {0}")]
    PixelFormat(#[source] NativeError),
}

/// Identifies a window in callbacks.  Ids are never reused within one
/// platform context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u32);

impl WindowId {
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Parameters for `Platform::create_window`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowCreateInfo {
    /// Outer window width.
    pub width: i32,
    /// Outer window height.
    pub height: i32,
    pub title: String,
    /// `false` removes the OS chrome; the application then draws its own
    /// and answers hit-test queries.
    pub decorated: bool,
}

impl WindowCreateInfo {
    /// A decorated window of the given outer size.
    pub fn new(width: i32, height: i32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            decorated: true,
        }
    }

    pub fn decorated(mut self, decorated: bool) -> Self {
        self.decorated = decorated;
        self
    }
}

/// What a hit-test callback is asked to classify.  All coordinates are in
/// screen space.  Either rectangle can be empty while the window is
/// minimised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestQuery {
    pub cursor: Point,
    pub window_rect: Rect,
    pub client_rect: Rect,
}

pub type KeyCallback = dyn FnMut(WindowId, Key, KeyAction);
pub type MouseButtonCallback = dyn FnMut(WindowId, MouseButton, ButtonAction);
pub type CursorPosCallback = dyn FnMut(WindowId, i32, i32);
pub type ActivateCallback = dyn FnMut(WindowId, bool);
pub type HitTestCallback = dyn FnMut(WindowId, HitTestQuery) -> HitRegion;

// ── Callback slots ────────────────────────────────────────────────────────────

/// Holds at most one callback.
///
/// While a callback runs it is moved out of the slot, so a nested message
/// for the same window finds the slot empty and skips the callback instead
/// of aliasing it.  Afterwards it is moved back unless the slot was set or
/// cleared in the meantime (tracked by `generation`).
struct Slot<C: ?Sized> {
    callback: RefCell<Option<Box<C>>>,
    generation: Cell<u64>,
}

impl<C: ?Sized> Slot<C> {
    fn new() -> Self {
        Self {
            callback: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    fn set(&self, callback: Box<C>) {
        *self.callback.borrow_mut() = Some(callback);
        self.generation.set(self.generation.get() + 1);
    }

    fn clear(&self) {
        self.callback.borrow_mut().take();
        self.generation.set(self.generation.get() + 1);
    }

    fn is_set(&self) -> bool {
        self.callback.borrow().is_some()
    }

    fn invoke<R>(&self, call: impl FnOnce(&mut C) -> R) -> Option<R> {
        let mut callback = self.callback.borrow_mut().take()?;
        let generation = self.generation.get();
        let result = call(&mut *callback);
        if self.generation.get() == generation {
            *self.callback.borrow_mut() = Some(callback);
        }
        Some(result)
    }
}

struct Callbacks {
    key: Slot<KeyCallback>,
    mouse_button: Slot<MouseButtonCallback>,
    cursor_pos: Slot<CursorPosCallback>,
    activate: Slot<ActivateCallback>,
    hit_test: Slot<HitTestCallback>,
}

impl Callbacks {
    fn new() -> Self {
        Self {
            key: Slot::new(),
            mouse_button: Slot::new(),
            cursor_pos: Slot::new(),
            activate: Slot::new(),
            hit_test: Slot::new(),
        }
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// Backend state for one native window.
pub(crate) struct WindowRecord {
    id: WindowId,
    handle: NativeHandle,
    decorated: bool,
    cursor_mode: Cell<CursorMode>,
    focused: Cell<bool>,
    close_requested: Cell<bool>,
    keys: RefCell<KeyStates>,
    callbacks: Callbacks,
}

impl WindowRecord {
    pub(crate) fn new(id: WindowId, handle: NativeHandle, decorated: bool) -> Self {
        Self {
            id,
            handle,
            decorated,
            cursor_mode: Cell::new(CursorMode::Normal),
            focused: Cell::new(false),
            close_requested: Cell::new(false),
            keys: RefCell::new(KeyStates::new()),
            callbacks: Callbacks::new(),
        }
    }

    pub(crate) fn id(&self) -> WindowId {
        self.id
    }

    pub(crate) fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub(crate) fn is_decorated(&self) -> bool {
        self.decorated
    }

    pub(crate) fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode.get()
    }

    /// Stores `mode` and returns the previous mode.
    pub(crate) fn replace_cursor_mode(&self, mode: CursorMode) -> CursorMode {
        self.cursor_mode.replace(mode)
    }

    pub(crate) fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub(crate) fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
    }

    pub(crate) fn request_close(&self) {
        self.close_requested.set(true);
    }

    /// Records `action` for `key`.  Returns `false` for unmapped keys.
    pub(crate) fn record_key(&self, key: Key, action: KeyAction) -> bool {
        self.keys.borrow_mut().set(key, action)
    }

    /// Releases every held key and returns the keys that were held.
    pub(crate) fn release_all_keys(&self) -> Vec<Key> {
        self.keys.borrow_mut().release_all()
    }

    pub(crate) fn emit_key(&self, key: Key, action: KeyAction) {
        self.callbacks.key.invoke(|callback| callback(self.id, key, action));
    }

    pub(crate) fn emit_mouse_button(&self, button: MouseButton, action: ButtonAction) {
        self.callbacks
            .mouse_button
            .invoke(|callback| callback(self.id, button, action));
    }

    pub(crate) fn emit_cursor_pos(&self, x: i32, y: i32) {
        self.callbacks.cursor_pos.invoke(|callback| callback(self.id, x, y));
    }

    pub(crate) fn emit_activate(&self, active: bool) {
        self.callbacks.activate.invoke(|callback| callback(self.id, active));
    }

    /// Asks the hit-test callback.  `None` when no callback is installed.
    pub(crate) fn query_hit_test(&self, query: HitTestQuery) -> Option<HitRegion> {
        self.callbacks.hit_test.invoke(|callback| callback(self.id, query))
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Native handle to record lookup for the translator.
#[derive(Default)]
pub(crate) struct WindowRegistry {
    windows: RefCell<HashMap<NativeHandle, Rc<WindowRecord>>>,
    next_id: Cell<u32>,
}

impl WindowRegistry {
    pub(crate) fn allocate_id(&self) -> WindowId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        WindowId(id)
    }

    pub(crate) fn insert(&self, record: Rc<WindowRecord>) {
        self.windows.borrow_mut().insert(record.handle(), record);
    }

    pub(crate) fn remove(&self, handle: NativeHandle) -> Option<Rc<WindowRecord>> {
        self.windows.borrow_mut().remove(&handle)
    }

    pub(crate) fn lookup(&self, handle: NativeHandle) -> Option<Rc<WindowRecord>> {
        self.windows.borrow().get(&handle).cloned()
    }

    pub(crate) fn handles(&self) -> Vec<NativeHandle> {
        self.windows.borrow().keys().copied().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.windows.borrow().len()
    }
}

// ── Public handle ─────────────────────────────────────────────────────────────

/// A window created by `Platform::create_window`.
///
/// Geometry and visibility are changed through the platform; input state and
/// callbacks are reached directly on the window.  Callbacks run synchronously
/// from inside `Platform::poll_events` on the owning thread.
pub struct Window {
    record: Rc<WindowRecord>,
}

impl Window {
    pub(crate) fn new(record: Rc<WindowRecord>) -> Self {
        Self { record }
    }

    pub(crate) fn record(&self) -> &WindowRecord {
        &self.record
    }

    pub(crate) fn native_handle(&self) -> NativeHandle {
        self.record.handle()
    }

    pub fn id(&self) -> WindowId {
        self.record.id()
    }

    pub fn is_decorated(&self) -> bool {
        self.record.is_decorated()
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.record.cursor_mode()
    }

    /// Whether the window currently has keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.record.is_focused()
    }

    /// Set when the user asks to close the window (close button, Alt+F4).
    /// The window stays open until the application destroys it.
    pub fn close_requested(&self) -> bool {
        self.record.close_requested.get()
    }

    /// Sets or clears the close flag, e.g. to veto a close request.
    pub fn set_close_requested(&self, requested: bool) {
        self.record.close_requested.set(requested);
    }

    /// The last action recorded for `key`.
    pub fn key_action(&self, key: Key) -> KeyAction {
        self.record.keys.borrow().get(key)
    }

    pub fn set_key_callback(&self, callback: impl FnMut(WindowId, Key, KeyAction) + 'static) {
        self.record.callbacks.key.set(Box::new(callback));
    }

    pub fn clear_key_callback(&self) {
        self.record.callbacks.key.clear();
    }

    pub fn set_mouse_button_callback(
        &self,
        callback: impl FnMut(WindowId, MouseButton, ButtonAction) + 'static,
    ) {
        self.record.callbacks.mouse_button.set(Box::new(callback));
    }

    pub fn clear_mouse_button_callback(&self) {
        self.record.callbacks.mouse_button.clear();
    }

    /// The callback receives client-area coordinates exactly as the OS
    /// reports them.
    pub fn set_cursor_pos_callback(&self, callback: impl FnMut(WindowId, i32, i32) + 'static) {
        self.record.callbacks.cursor_pos.set(Box::new(callback));
    }

    pub fn clear_cursor_pos_callback(&self) {
        self.record.callbacks.cursor_pos.clear();
    }

    /// Called with `true` when the window gains activation or focus and
    /// `false` when it loses them.
    pub fn set_activate_callback(&self, callback: impl FnMut(WindowId, bool) + 'static) {
        self.record.callbacks.activate.set(Box::new(callback));
    }

    pub fn clear_activate_callback(&self) {
        self.record.callbacks.activate.clear();
    }

    /// Installs the hit-test callback. Its answer is used for decorated and
    /// undecorated windows alike. Without one, undecorated windows fall back
    /// to the border heuristic and decorated windows to the OS default.
    pub fn set_hit_test_callback(
        &self,
        callback: impl FnMut(WindowId, HitTestQuery) -> HitRegion + 'static,
    ) {
        self.record.callbacks.hit_test.set(Box::new(callback));
    }

    pub fn clear_hit_test_callback(&self) {
        self.record.callbacks.hit_test.clear();
    }

    pub fn has_hit_test_callback(&self) -> bool {
        self.record.callbacks.hit_test.is_set()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id())
            .field("handle", &self.native_handle())
            .field("decorated", &self.is_decorated())
            .finish_non_exhaustive()
    }
}
