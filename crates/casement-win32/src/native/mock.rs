//! Simulated native layer for tests and non-Windows hosts.
//!
//! [`MockNative`] behaves like a tiny single-threaded window manager:
//!
//! - windows have an outer rectangle and a client rectangle derived from
//!   configurable [`FrameInsets`]; a window whose router answers
//!   `WM_NCCALCSIZE` gets a client area equal to the whole window, exactly
//!   like Win32;
//! - posted messages queue up until [`NativeApi::pump_messages`] drains them,
//!   while sent messages (focus changes, frame refreshes, destruction) are
//!   routed synchronously, so reentrancy is exercised;
//! - the cursor clip is a single process-wide region;
//! - a fake OpenGL driver exports `extern "system"` functions through
//!   [`SymbolSource`], and extension symbols only resolve while a fake
//!   context is current.
//!
//! Failure injection (`fail_*`, [`MockNative::remove_symbol`]) drives the
//! bootstrap rollback paths.
//!
//! The handle is `Clone`; every clone shares the same state.  Keep one
//! clone in the test and hand another to the platform.  The fake driver
//! state is per thread, so use one `MockNative` per test thread.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::ffi::CStr;
use std::rc::Rc;

use casement_core::{FrameInsets, Point, Rect, Size};

use super::{
    Margins, MessageRouter, NativeApi, NativeError, NativeHandle, NativeWindowDesc,
    PixelFormatDesc, RawMessage, ShowCommand, WindowStyle,
};
use crate::gl::{Hdc, SymbolSource};
use crate::message::{HTCLIENT, WM_KILLFOCUS, WM_NCHITTEST, WM_SETFOCUS};

/// Frame of a themed Windows 10 window with the standard style at 100% DPI.
pub const DEFAULT_FRAME: FrameInsets = FrameInsets::new(8, 31, 8, 8);
/// Where new windows are placed (`CW_USEDEFAULT`).
pub const DEFAULT_ORIGIN: Point = Point::new(100, 100);
/// The rectangle a maximised window fills.
pub const WORK_AREA: Rect = Rect::new(0, 0, 1920, 1040);
/// The rectangle of a minimised (iconic) window.
pub const ICONIC_RECT: Rect = Rect::new(-32000, -32000, -31840, -31972);

const ERROR_CLASS_ALREADY_EXISTS: u32 = 1410;
const ERROR_INVALID_PIXEL_FORMAT: u32 = 2000;
const ERROR_MOD_NOT_FOUND: u32 = 126;
const ERROR_NOT_ENOUGH_MEMORY: u32 = 8;

#[derive(Debug, Clone)]
struct MockWindow {
    title: Vec<u16>,
    style: WindowStyle,
    outer: Rect,
    restore: Option<Rect>,
    frame_collapsed: bool,
    frame_extension: Option<Margins>,
    frame_refreshes: u32,
    pixel_format: Option<PixelFormatDesc>,
    show_state: Option<ShowCommand>,
}

impl MockWindow {
    fn new(title: Vec<u16>, style: WindowStyle, outer: Rect) -> Self {
        Self {
            title,
            style,
            outer,
            restore: None,
            frame_collapsed: false,
            frame_extension: None,
            frame_refreshes: 0,
            pixel_format: None,
            show_state: None,
        }
    }
}

#[derive(Default)]
struct Failures {
    class_registration: Cell<bool>,
    window_creation: Cell<bool>,
    pixel_format: Cell<bool>,
    gl_module: Cell<bool>,
}

struct MockState {
    class_registered: Cell<bool>,
    gl_module_loaded: Cell<bool>,
    router: RefCell<Option<Rc<dyn MessageRouter>>>,
    windows: RefCell<BTreeMap<NativeHandle, MockWindow>>,
    next_handle: Cell<isize>,
    destroyed: RefCell<Vec<NativeHandle>>,
    queue: RefCell<VecDeque<(NativeHandle, RawMessage)>>,
    focused: Cell<Option<NativeHandle>>,
    frame: Cell<FrameInsets>,
    clip: Cell<Option<Rect>>,
    clip_calls: Cell<usize>,
    keyboard: RefCell<[u8; 256]>,
    default_calls: RefCell<HashMap<u32, usize>>,
    missing_symbols: RefCell<HashSet<String>>,
    failures: Failures,
}

/// A simulated [`NativeApi`].  See the module docs.
#[derive(Clone)]
pub struct MockNative {
    state: Rc<MockState>,
}

impl MockNative {
    /// Creates an empty desktop and resets this thread's fake driver.
    pub fn new() -> Self {
        fake_wgl::reset();
        Self {
            state: Rc::new(MockState {
                class_registered: Cell::new(false),
                gl_module_loaded: Cell::new(false),
                router: RefCell::new(None),
                windows: RefCell::new(BTreeMap::new()),
                next_handle: Cell::new(0x1000),
                destroyed: RefCell::new(Vec::new()),
                queue: RefCell::new(VecDeque::new()),
                focused: Cell::new(None),
                frame: Cell::new(DEFAULT_FRAME),
                clip: Cell::new(None),
                clip_calls: Cell::new(0),
                keyboard: RefCell::new([0; 256]),
                default_calls: RefCell::new(HashMap::new()),
                missing_symbols: RefCell::new(HashSet::new()),
                failures: Failures::default(),
            }),
        }
    }

    // ── Failure injection ────────────────────────────────────────────────────

    pub fn fail_class_registration(&self) {
        self.state.failures.class_registration.set(true);
    }

    pub fn fail_window_creation(&self, fail: bool) {
        self.state.failures.window_creation.set(fail);
    }

    pub fn fail_pixel_format(&self, fail: bool) {
        self.state.failures.pixel_format.set(fail);
    }

    pub fn fail_gl_module(&self) {
        self.state.failures.gl_module.set(true);
    }

    /// Makes the fake driver refuse to create contexts.
    pub fn fail_context_creation(&self) {
        fake_wgl::refuse_contexts();
    }

    /// Hides `name` from both symbol lookups.
    pub fn remove_symbol(&self, name: &str) {
        self.state.missing_symbols.borrow_mut().insert(name.to_owned());
    }

    // ── Desktop simulation ───────────────────────────────────────────────────

    /// Sets the frame thickness every decorated window reports.
    pub fn set_frame_insets(&self, insets: FrameInsets) {
        self.state.frame.set(insets);
    }

    /// Adds a window with a chosen handle and outer rectangle without going
    /// through creation (no messages are sent).
    pub fn add_window_at(&self, handle: NativeHandle, outer: Rect) {
        let window = MockWindow::new(vec![0], super::WINDOW_STYLE, outer);
        self.state.windows.borrow_mut().insert(handle, window);
    }

    /// Moves or resizes a window behind the application's back, as a user
    /// drag would.
    pub fn set_window_rect(&self, handle: NativeHandle, outer: Rect) {
        if let Some(window) = self.state.windows.borrow_mut().get_mut(&handle) {
            window.outer = outer;
        }
    }

    /// Queues `message` for `handle` (`PostMessageW`).
    pub fn post_message(&self, handle: NativeHandle, message: RawMessage) {
        self.state.queue.borrow_mut().push_back((handle, message));
    }

    /// Delivers `message` immediately (`SendMessageW`) and returns the
    /// result.
    pub fn send_message(&self, handle: NativeHandle, message: RawMessage) -> isize {
        self.deliver(handle, message)
    }

    /// Moves keyboard focus to `handle` in the OS order: deactivate the
    /// previous window, activate `handle`, then `WM_KILLFOCUS` to the
    /// previous window before `WM_SETFOCUS` to `handle`.
    pub fn focus_window(&self, handle: NativeHandle) {
        let previous = self.state.focused.get();
        if previous == Some(handle) {
            return;
        }
        if let Some(previous) = previous {
            self.deliver(previous, RawMessage::activate(false));
        }
        self.deliver(handle, RawMessage::activate(true));
        if let Some(previous) = previous {
            self.deliver(previous, RawMessage::kill_focus());
        }
        self.deliver(handle, RawMessage::set_focus());
    }

    /// Moves focus away from every window (the user switched applications).
    pub fn blur(&self) {
        if let Some(previous) = self.state.focused.get() {
            self.deliver(previous, RawMessage::activate(false));
            self.deliver(previous, RawMessage::kill_focus());
        }
    }

    /// Sets the physical state of virtual key `vk`.
    pub fn set_key_down(&self, vk: u8, down: bool) {
        self.state.keyboard.borrow_mut()[vk as usize] = if down { 0x80 } else { 0 };
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    pub fn is_class_registered(&self) -> bool {
        self.state.class_registered.get()
    }

    pub fn has_router(&self) -> bool {
        self.state.router.borrow().is_some()
    }

    pub fn is_gl_module_loaded(&self) -> bool {
        self.state.gl_module_loaded.get()
    }

    pub fn window_count(&self) -> usize {
        self.state.windows.borrow().len()
    }

    pub fn window_exists(&self, handle: NativeHandle) -> bool {
        self.state.windows.borrow().contains_key(&handle)
    }

    /// Every window destroyed so far, in order.
    pub fn destroyed_windows(&self) -> Vec<NativeHandle> {
        self.state.destroyed.borrow().clone()
    }

    /// The title without its terminating NUL.
    pub fn window_title(&self, handle: NativeHandle) -> Option<String> {
        self.with_window(handle, |window| {
            let units = window.title.strip_suffix(&[0]).unwrap_or(&window.title);
            String::from_utf16_lossy(units)
        })
    }

    pub fn window_style(&self, handle: NativeHandle) -> Option<WindowStyle> {
        self.with_window(handle, |window| window.style)
    }

    pub fn frame_extension(&self, handle: NativeHandle) -> Option<Margins> {
        self.with_window(handle, |window| window.frame_extension).flatten()
    }

    pub fn frame_refreshes(&self, handle: NativeHandle) -> u32 {
        self.with_window(handle, |window| window.frame_refreshes).unwrap_or(0)
    }

    pub fn pixel_format(&self, handle: NativeHandle) -> Option<PixelFormatDesc> {
        self.with_window(handle, |window| window.pixel_format).flatten()
    }

    pub fn show_state(&self, handle: NativeHandle) -> Option<ShowCommand> {
        self.with_window(handle, |window| window.show_state).flatten()
    }

    pub fn focused_window(&self) -> Option<NativeHandle> {
        self.state.focused.get()
    }

    pub fn queued_messages(&self) -> usize {
        self.state.queue.borrow().len()
    }

    /// How often the default procedure ran for message `id`.
    pub fn default_proc_calls(&self, id: u32) -> usize {
        self.state.default_calls.borrow().get(&id).copied().unwrap_or(0)
    }

    /// The active cursor clip; `None` when the cursor is free.
    pub fn cursor_clip(&self) -> Option<Rect> {
        self.state.clip.get()
    }

    /// How many times the clip was set or released.
    pub fn clip_calls(&self) -> usize {
        self.state.clip_calls.get()
    }

    /// A device context the fake driver accepts, not tied to any window.
    pub fn fake_device_context(&self) -> Hdc {
        0xDC0 as Hdc
    }

    /// Fake contexts created and not yet deleted on this thread.
    pub fn live_gl_contexts(&self) -> usize {
        fake_wgl::live_contexts()
    }

    pub fn has_current_gl_context(&self) -> bool {
        fake_wgl::has_current_context()
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn with_window<R>(&self, handle: NativeHandle, f: impl FnOnce(&MockWindow) -> R) -> Option<R> {
        self.state.windows.borrow().get(&handle).map(f)
    }

    fn with_window_mut<R>(
        &self,
        handle: NativeHandle,
        f: impl FnOnce(&mut MockWindow) -> R,
    ) -> Option<R> {
        self.state.windows.borrow_mut().get_mut(&handle).map(f)
    }

    /// Asks the router only.  No state borrow is held while it runs.
    fn route(&self, handle: NativeHandle, message: RawMessage) -> Option<isize> {
        let router = self.state.router.borrow().clone();
        router.and_then(|router| router.route(handle, message))
    }

    /// Runs the window procedure for `message`: router first, default
    /// procedure if the router declines.
    fn deliver(&self, handle: NativeHandle, message: RawMessage) -> isize {
        match message.id {
            WM_SETFOCUS => self.state.focused.set(Some(handle)),
            WM_KILLFOCUS if self.state.focused.get() == Some(handle) => {
                self.state.focused.set(None)
            }
            _ => {}
        }
        match self.route(handle, message) {
            Some(result) => result,
            None => self.default_window_proc(handle, message),
        }
    }

    /// Sends `WM_NCCALCSIZE`.  An application that answers it keeps the
    /// whole window as client area.
    fn recalculate_frame(&self, handle: NativeHandle) {
        let message = RawMessage::nc_calc_size(true);
        let collapsed = match self.route(handle, message) {
            Some(_) => true,
            None => {
                self.default_window_proc(handle, message);
                false
            }
        };
        self.with_window_mut(handle, |window| window.frame_collapsed = collapsed);
    }

    fn os_error(call: &'static str, code: u32) -> NativeError {
        NativeError::Os { call, code }
    }
}

impl Default for MockNative {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolSource for MockNative {
    fn module_symbol(&self, name: &CStr) -> Option<usize> {
        if !self.state.gl_module_loaded.get() || self.is_missing(name) {
            return None;
        }
        fake_wgl::baseline_symbol(name.to_bytes())
    }

    fn extension_symbol(&self, name: &CStr) -> Option<usize> {
        if !fake_wgl::has_current_context() || self.is_missing(name) {
            return None;
        }
        fake_wgl::extension_symbol(name.to_bytes())
    }
}

impl MockNative {
    fn is_missing(&self, name: &CStr) -> bool {
        name.to_str()
            .is_ok_and(|name| self.state.missing_symbols.borrow().contains(name))
    }
}

impl NativeApi for MockNative {
    fn register_window_class(&self) -> Result<(), NativeError> {
        if self.state.failures.class_registration.get() || self.state.class_registered.get() {
            return Err(Self::os_error("RegisterClassExW", ERROR_CLASS_ALREADY_EXISTS));
        }
        self.state.class_registered.set(true);
        Ok(())
    }

    fn unregister_window_class(&self) {
        self.state.class_registered.set(false);
    }

    fn install_router(&self, router: Rc<dyn MessageRouter>) {
        *self.state.router.borrow_mut() = Some(router);
    }

    fn remove_router(&self) {
        self.state.router.borrow_mut().take();
    }

    fn create_window(&self, desc: &NativeWindowDesc) -> Result<NativeHandle, NativeError> {
        if self.state.failures.window_creation.get() {
            return Err(Self::os_error("CreateWindowExW", ERROR_NOT_ENOUGH_MEMORY));
        }
        let handle = NativeHandle(self.state.next_handle.get());
        self.state.next_handle.set(handle.0 + 0x10);
        let outer = Rect::from_origin_size(DEFAULT_ORIGIN, desc.size);
        self.state
            .windows
            .borrow_mut()
            .insert(handle, MockWindow::new(desc.title.clone(), desc.style, outer));
        self.recalculate_frame(handle);
        Ok(handle)
    }

    fn destroy_window(&self, handle: NativeHandle) {
        if !self.window_exists(handle) {
            return;
        }
        if self.state.focused.get() == Some(handle) {
            self.deliver(handle, RawMessage::activate(false));
            self.deliver(handle, RawMessage::kill_focus());
        }
        self.state.windows.borrow_mut().remove(&handle);
        self.state.queue.borrow_mut().retain(|&(target, _)| target != handle);
        self.state.destroyed.borrow_mut().push(handle);
    }

    fn set_pixel_format(
        &self,
        handle: NativeHandle,
        format: &PixelFormatDesc,
    ) -> Result<(), NativeError> {
        if self.state.failures.pixel_format.get() {
            return Err(Self::os_error("SetPixelFormat", ERROR_INVALID_PIXEL_FORMAT));
        }
        self.with_window_mut(handle, |window| window.pixel_format = Some(*format))
            .ok_or_else(|| Self::os_error("SetPixelFormat", ERROR_INVALID_PIXEL_FORMAT))
    }

    fn device_context(&self, handle: NativeHandle) -> Hdc {
        if self.window_exists(handle) {
            handle.0 as Hdc
        } else {
            std::ptr::null_mut()
        }
    }

    fn show_window(&self, handle: NativeHandle, command: ShowCommand) {
        self.with_window_mut(handle, |window| {
            match command {
                ShowCommand::Minimize | ShowCommand::Maximize => {
                    window.restore.get_or_insert(window.outer);
                    window.outer = if command == ShowCommand::Minimize {
                        ICONIC_RECT
                    } else {
                        WORK_AREA
                    };
                }
                ShowCommand::Restore => {
                    if let Some(restore) = window.restore.take() {
                        window.outer = restore;
                    }
                }
                ShowCommand::Show | ShowCommand::Hide => {}
            }
            window.show_state = Some(command);
        });
    }

    fn extend_frame_into_client_area(&self, handle: NativeHandle, margins: Margins) {
        self.with_window_mut(handle, |window| window.frame_extension = Some(margins));
    }

    fn refresh_frame(&self, handle: NativeHandle) {
        if self.with_window_mut(handle, |window| window.frame_refreshes += 1).is_some() {
            self.recalculate_frame(handle);
        }
    }

    fn window_rect(&self, handle: NativeHandle) -> Rect {
        self.with_window(handle, |window| window.outer).unwrap_or(Rect::ZERO)
    }

    fn client_rect(&self, handle: NativeHandle) -> Rect {
        let frame = self.state.frame.get();
        self.with_window(handle, |window| {
            if window.frame_collapsed {
                window.outer
            } else {
                frame.content_rect(window.outer)
            }
        })
        .unwrap_or(Rect::ZERO)
    }

    fn adjust_window_rect(&self, rect: Rect, _style: WindowStyle) -> Rect {
        self.state.frame.get().outer_rect(rect)
    }

    fn move_window(&self, handle: NativeHandle, origin: Point) {
        self.with_window_mut(handle, |window| {
            window.outer = Rect::from_origin_size(origin, window.outer.size());
        });
    }

    fn resize_window(&self, handle: NativeHandle, size: Size) {
        let resized = self.with_window_mut(handle, |window| {
            window.outer = Rect::from_origin_size(window.outer.origin(), size);
        });
        if resized.is_some() {
            self.recalculate_frame(handle);
        }
    }

    fn clip_cursor(&self, region: Option<Rect>) {
        self.state.clip.set(region);
        self.state.clip_calls.set(self.state.clip_calls.get() + 1);
    }

    fn keyboard_state(&self) -> [u8; 256] {
        *self.state.keyboard.borrow()
    }

    fn is_vk_down(&self, vk: u8) -> bool {
        self.state.keyboard.borrow()[vk as usize] & 0x80 != 0
    }

    fn default_window_proc(&self, _handle: NativeHandle, message: RawMessage) -> isize {
        *self.state.default_calls.borrow_mut().entry(message.id).or_insert(0) += 1;
        if message.id == WM_NCHITTEST {
            HTCLIENT
        } else {
            0
        }
    }

    fn pump_messages(&self, filter: Option<NativeHandle>) -> usize {
        let mut dispatched = 0;
        loop {
            let next = {
                let mut queue = self.state.queue.borrow_mut();
                queue
                    .iter()
                    .position(|&(target, _)| filter.map_or(true, |only| only == target))
                    .and_then(|index| queue.remove(index))
            };
            let Some((handle, message)) = next else {
                break;
            };
            if self.window_exists(handle) {
                self.deliver(handle, message);
                dispatched += 1;
            }
        }
        dispatched
    }

    fn load_gl_module(&self) -> Result<(), NativeError> {
        if self.state.failures.gl_module.get() {
            return Err(Self::os_error("LoadLibraryW", ERROR_MOD_NOT_FOUND));
        }
        self.state.gl_module_loaded.set(true);
        Ok(())
    }

    fn unload_gl_module(&self) {
        self.state.gl_module_loaded.set(false);
    }
}

/// A fake OpenGL driver.  Context handles are small integers; the state is
/// per thread like real WGL currency.
mod fake_wgl {
    use std::cell::RefCell;
    use std::ffi::{c_char, CStr};
    use std::ptr;

    use crate::gl::{
        Hdc, Hglrc, WglChoosePixelFormatArb, WglCreateContext, WglCreateContextAttribsArb,
        WglDeleteContext, WglGetCurrentContext, WglGetCurrentDc, WglGetExtensionsStringArb,
        WglGetPixelFormatAttribfvArb, WglGetPixelFormatAttribivArb, WglGetSwapIntervalExt,
        WglMakeCurrent, WglShareLists, WglSwapBuffers, WglSwapIntervalExt,
    };

    const EXTENSIONS: &CStr = c"WGL_ARB_create_context WGL_ARB_create_context_profile WGL_ARB_pixel_format WGL_ARB_multisample WGL_EXT_swap_control";
    const MAX_MAJOR_VERSION: i32 = 4;
    const WGL_CONTEXT_MAJOR_VERSION_ARB: i32 = 0x2091;
    const FAKE_PIXEL_FORMAT: i32 = 7;

    #[derive(Default)]
    struct Driver {
        next_context: usize,
        live: Vec<usize>,
        current: Option<(usize, usize)>,
        refuse_contexts: bool,
        swap_interval: i32,
    }

    thread_local! {
        static DRIVER: RefCell<Driver> = RefCell::new(Driver::default());
    }

    fn with<R>(f: impl FnOnce(&mut Driver) -> R) -> R {
        DRIVER.with(|driver| f(&mut driver.borrow_mut()))
    }

    pub(super) fn reset() {
        with(|driver| *driver = Driver::default());
    }

    pub(super) fn refuse_contexts() {
        with(|driver| driver.refuse_contexts = true);
    }

    pub(super) fn has_current_context() -> bool {
        with(|driver| driver.current.is_some())
    }

    pub(super) fn live_contexts() -> usize {
        with(|driver| driver.live.len())
    }

    pub(super) fn baseline_symbol(name: &[u8]) -> Option<usize> {
        let address = match name {
            b"wglCreateContext" => create_context as WglCreateContext as usize,
            b"wglDeleteContext" => delete_context as WglDeleteContext as usize,
            b"wglGetCurrentDC" => get_current_dc as WglGetCurrentDc as usize,
            b"wglGetCurrentContext" => get_current_context as WglGetCurrentContext as usize,
            b"wglMakeCurrent" => make_current as WglMakeCurrent as usize,
            b"wglShareLists" => share_lists as WglShareLists as usize,
            b"wglSwapBuffers" => swap_buffers as WglSwapBuffers as usize,
            _ => return None,
        };
        Some(address)
    }

    pub(super) fn extension_symbol(name: &[u8]) -> Option<usize> {
        let address = match name {
            b"wglGetExtensionsStringARB" => {
                get_extensions_string as WglGetExtensionsStringArb as usize
            }
            b"wglCreateContextAttribsARB" => {
                create_context_attribs as WglCreateContextAttribsArb as usize
            }
            b"wglGetPixelFormatAttribivARB" => {
                get_pixel_format_attribiv as WglGetPixelFormatAttribivArb as usize
            }
            b"wglGetPixelFormatAttribfvARB" => {
                get_pixel_format_attribfv as WglGetPixelFormatAttribfvArb as usize
            }
            b"wglChoosePixelFormatARB" => choose_pixel_format as WglChoosePixelFormatArb as usize,
            b"wglSwapIntervalEXT" => swap_interval as WglSwapIntervalExt as usize,
            b"wglGetSwapIntervalEXT" => get_swap_interval as WglGetSwapIntervalExt as usize,
            _ => return None,
        };
        Some(address)
    }

    fn new_context(hdc: Hdc) -> Hglrc {
        with(|driver| {
            if hdc.is_null() || driver.refuse_contexts {
                return ptr::null_mut();
            }
            driver.next_context += 1;
            let context = 0x6000 + driver.next_context;
            driver.live.push(context);
            context as Hglrc
        })
    }

    unsafe extern "system" fn create_context(hdc: Hdc) -> Hglrc {
        new_context(hdc)
    }

    unsafe extern "system" fn delete_context(context: Hglrc) -> i32 {
        with(|driver| {
            let context = context as usize;
            let before = driver.live.len();
            driver.live.retain(|&live| live != context);
            if driver.current.is_some_and(|(_, current)| current == context) {
                driver.current = None;
            }
            (driver.live.len() != before) as i32
        })
    }

    unsafe extern "system" fn get_current_dc() -> Hdc {
        with(|driver| driver.current.map_or(ptr::null_mut(), |(hdc, _)| hdc as Hdc))
    }

    unsafe extern "system" fn get_current_context() -> Hglrc {
        with(|driver| {
            driver
                .current
                .map_or(ptr::null_mut(), |(_, context)| context as Hglrc)
        })
    }

    unsafe extern "system" fn make_current(hdc: Hdc, context: Hglrc) -> i32 {
        with(|driver| {
            if context.is_null() {
                driver.current = None;
                return 1;
            }
            let context = context as usize;
            if hdc.is_null() || !driver.live.contains(&context) {
                return 0;
            }
            driver.current = Some((hdc as usize, context));
            1
        })
    }

    unsafe extern "system" fn share_lists(source: Hglrc, target: Hglrc) -> i32 {
        with(|driver| {
            (driver.live.contains(&(source as usize)) && driver.live.contains(&(target as usize)))
                as i32
        })
    }

    unsafe extern "system" fn swap_buffers(hdc: Hdc) -> i32 {
        (!hdc.is_null()) as i32
    }

    unsafe extern "system" fn get_extensions_string(_hdc: Hdc) -> *const c_char {
        EXTENSIONS.as_ptr()
    }

    unsafe extern "system" fn create_context_attribs(
        hdc: Hdc,
        _share: Hglrc,
        attribs: *const i32,
    ) -> Hglrc {
        let mut cursor = attribs;
        while !cursor.is_null() && *cursor != 0 {
            if *cursor == WGL_CONTEXT_MAJOR_VERSION_ARB && *cursor.add(1) > MAX_MAJOR_VERSION {
                return ptr::null_mut();
            }
            cursor = cursor.add(2);
        }
        new_context(hdc)
    }

    unsafe extern "system" fn get_pixel_format_attribiv(
        _hdc: Hdc,
        _format: i32,
        _layer: i32,
        count: u32,
        _attributes: *const i32,
        values: *mut i32,
    ) -> i32 {
        for index in 0..count as usize {
            *values.add(index) = 1;
        }
        1
    }

    unsafe extern "system" fn get_pixel_format_attribfv(
        _hdc: Hdc,
        _format: i32,
        _layer: i32,
        count: u32,
        _attributes: *const i32,
        values: *mut f32,
    ) -> i32 {
        for index in 0..count as usize {
            *values.add(index) = 1.0;
        }
        1
    }

    unsafe extern "system" fn choose_pixel_format(
        hdc: Hdc,
        _int_attributes: *const i32,
        _float_attributes: *const f32,
        max_formats: u32,
        formats: *mut i32,
        count: *mut u32,
    ) -> i32 {
        if hdc.is_null() {
            return 0;
        }
        let found = max_formats.min(1);
        if found > 0 {
            *formats = FAKE_PIXEL_FORMAT;
        }
        *count = found;
        1
    }

    unsafe extern "system" fn swap_interval(interval: i32) -> i32 {
        with(|driver| {
            if driver.current.is_none() || interval < 0 {
                return 0;
            }
            driver.swap_interval = interval;
            1
        })
    }

    unsafe extern "system" fn get_swap_interval() -> i32 {
        with(|driver| driver.swap_interval)
    }
}
