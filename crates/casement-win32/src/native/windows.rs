//! Win32 implementation of the native seam.
//!
//! Every OS call the backend makes lives in this file.  The window procedure
//! is a plain `extern "system"` function shared by every window of the class;
//! it forwards messages to the router installed for the calling thread and
//! falls back to `DefWindowProcW`.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::{Cell, RefCell};
use std::ffi::{c_void, CStr};
use std::rc::Rc;

use casement_core::{Point, Rect, Size};
use tracing::{debug, warn};
use windows::core::{w, PCSTR, PCWSTR};
use windows::Win32::Foundation::{
    FreeLibrary, GetLastError, HINSTANCE, HMODULE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM,
};
use windows::Win32::Graphics::Dwm::DwmExtendFrameIntoClientArea;
use windows::Win32::Graphics::Gdi::{ClientToScreen, GetDC, HDC};
use windows::Win32::Graphics::OpenGL::{
    wglGetProcAddress, ChoosePixelFormat, SetPixelFormat, PFD_DOUBLEBUFFER, PFD_DRAW_TO_WINDOW,
    PFD_SUPPORT_OPENGL, PFD_TYPE_RGBA, PIXELFORMATDESCRIPTOR,
};
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress, LoadLibraryW};
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, GetKeyboardState};
use windows::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRectEx, ClipCursor, CreateWindowExW, DefWindowProcW, DestroyWindow,
    DispatchMessageW, GetClientRect, GetWindowRect, LoadCursorW, PeekMessageW, RegisterClassExW,
    SetWindowPos, ShowWindow, TranslateMessage, UnregisterClassW, CS_HREDRAW, CS_OWNDC,
    CS_VREDRAW, CW_USEDEFAULT, IDC_ARROW, MSG, PM_REMOVE, SET_WINDOW_POS_FLAGS, SHOW_WINDOW_CMD,
    SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SW_HIDE,
    SW_MAXIMIZE, SW_MINIMIZE, SW_RESTORE, SW_SHOW, WINDOW_EX_STYLE, WINDOW_STYLE, WNDCLASSEXW,
};

use super::{
    Margins, MessageRouter, NativeApi, NativeError, NativeHandle, NativeWindowDesc,
    PixelFormatDesc, RawMessage, ShowCommand, WindowStyle,
};
use crate::gl::{Hdc, SymbolSource};

const CLASS_NAME: PCWSTR = w!("CasementWindowClass");
const GL_MODULE_NAME: PCWSTR = w!("opengl32.dll");

thread_local! {
    /// The router for windows created on this thread.
    static ROUTER: RefCell<Option<Rc<dyn MessageRouter>>> = const { RefCell::new(None) };
}

/// Window procedure shared by every window of [`CLASS_NAME`].
///
/// # Safety
///
/// Called by Windows on the thread that owns `hwnd`.
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    // Clone the router out so the borrow is released before routing; the
    // router may destroy windows, which re-enters this procedure.
    let router = ROUTER.with(|slot| slot.borrow().clone());
    if let Some(router) = router {
        let message = RawMessage::new(msg, w_param.0, l_param.0);
        if let Some(result) = router.route(handle_of(hwnd), message) {
            return LRESULT(result);
        }
    }
    // SAFETY: forwarding the untouched message to the default procedure.
    unsafe { DefWindowProcW(hwnd, msg, w_param, l_param) }
}

fn handle_of(hwnd: HWND) -> NativeHandle {
    NativeHandle(hwnd.0 as isize)
}

fn hwnd_of(handle: NativeHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

fn rect_of(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

fn win32_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

fn last_error(call: &'static str) -> NativeError {
    // SAFETY: GetLastError only reads thread-local state.
    let code = unsafe { GetLastError() }.0;
    NativeError::Os { call, code }
}

struct Win32State {
    instance: HINSTANCE,
    gl_module: Cell<Option<HMODULE>>,
}

/// The real Win32 native layer.  Cheap to clone; all clones share the
/// module instance and the loaded OpenGL module.
#[derive(Clone)]
pub struct Win32Native {
    state: Rc<Win32State>,
}

impl Win32Native {
    /// Binds to the current executable module.
    ///
    /// # Errors
    ///
    /// Returns [`NativeError::Os`] if the module handle cannot be obtained.
    pub fn new() -> Result<Self, NativeError> {
        // SAFETY: `None` asks for the module of the running executable.
        let module = unsafe { GetModuleHandleW(None) }
            .map_err(|_| last_error("GetModuleHandleW"))?;
        Ok(Self {
            state: Rc::new(Win32State {
                instance: HINSTANCE(module.0),
                gl_module: Cell::new(None),
            }),
        })
    }

    fn set_window_pos(
        &self,
        handle: NativeHandle,
        origin: Point,
        size: Size,
        flags: SET_WINDOW_POS_FLAGS,
    ) {
        let flags = flags | SWP_NOZORDER | SWP_NOACTIVATE;
        // SAFETY: `handle` names a window created by this thread; an invalid
        // handle makes the call fail without side effects.
        let result = unsafe {
            SetWindowPos(hwnd_of(handle), None, origin.x, origin.y, size.width, size.height, flags)
        };
        if let Err(e) = result {
            warn!(?handle, error = %e, "SetWindowPos failed");
        }
    }
}

impl SymbolSource for Win32Native {
    fn module_symbol(&self, name: &CStr) -> Option<usize> {
        let module = self.state.gl_module.get()?;
        // SAFETY: `module` is loaded and `name` is NUL terminated.
        let address = unsafe { GetProcAddress(module, PCSTR(name.as_ptr().cast())) }?;
        Some(address as usize)
    }

    fn extension_symbol(&self, name: &CStr) -> Option<usize> {
        // SAFETY: `name` is NUL terminated; without a current context the
        // driver simply returns NULL.
        let address = unsafe { wglGetProcAddress(PCSTR(name.as_ptr().cast())) }?;
        Some(address as usize)
    }
}

impl NativeApi for Win32Native {
    fn register_window_class(&self) -> Result<(), NativeError> {
        // SAFETY: IDC_ARROW is a predefined system cursor.
        let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default();
        let class = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC,
            lpfnWndProc: Some(window_proc),
            hInstance: self.state.instance,
            hCursor: cursor,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };
        // SAFETY: `class` is fully initialised and CLASS_NAME is 'static.
        let atom = unsafe { RegisterClassExW(&class) };
        if atom == 0 {
            return Err(last_error("RegisterClassExW"));
        }
        debug!("window class registered");
        Ok(())
    }

    fn unregister_window_class(&self) {
        // SAFETY: no window of the class is alive at teardown.
        if let Err(e) = unsafe { UnregisterClassW(CLASS_NAME, Some(self.state.instance)) } {
            warn!(error = %e, "UnregisterClassW failed");
        }
    }

    fn install_router(&self, router: Rc<dyn MessageRouter>) {
        ROUTER.with(|slot| *slot.borrow_mut() = Some(router));
    }

    fn remove_router(&self) {
        let router = ROUTER.with(|slot| slot.borrow_mut().take());
        drop(router);
    }

    fn create_window(&self, desc: &NativeWindowDesc) -> Result<NativeHandle, NativeError> {
        // SAFETY: the class is registered and `desc.title` is NUL terminated
        // and outlives the call.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(desc.style.ex_style),
                CLASS_NAME,
                PCWSTR(desc.title.as_ptr()),
                WINDOW_STYLE(desc.style.style),
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                desc.size.width,
                desc.size.height,
                None,
                None,
                Some(self.state.instance),
                None,
            )
        }
        .map_err(|_| last_error("CreateWindowExW"))?;
        Ok(handle_of(hwnd))
    }

    fn destroy_window(&self, handle: NativeHandle) {
        // SAFETY: destroying a window owned by this thread; WM_ACTIVATE and
        // WM_KILLFOCUS are sent synchronously before the call returns.
        if let Err(e) = unsafe { DestroyWindow(hwnd_of(handle)) } {
            warn!(?handle, error = %e, "DestroyWindow failed");
        }
    }

    fn set_pixel_format(
        &self,
        handle: NativeHandle,
        format: &PixelFormatDesc,
    ) -> Result<(), NativeError> {
        let mut flags = PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL;
        if format.double_buffer {
            flags |= PFD_DOUBLEBUFFER;
        }
        let descriptor = PIXELFORMATDESCRIPTOR {
            nSize: std::mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16,
            nVersion: 1,
            dwFlags: flags,
            iPixelType: PFD_TYPE_RGBA,
            cColorBits: format.color_bits,
            cRedBits: format.red_bits,
            cGreenBits: format.green_bits,
            cBlueBits: format.blue_bits,
            cAlphaBits: format.alpha_bits,
            cDepthBits: format.depth_bits,
            cStencilBits: format.stencil_bits,
            ..Default::default()
        };
        let hdc = HDC(self.device_context(handle));
        // SAFETY: `hdc` is the class-owned DC of a live window and
        // `descriptor` outlives both calls.
        unsafe {
            let index = ChoosePixelFormat(hdc, &descriptor);
            if index == 0 {
                return Err(last_error("ChoosePixelFormat"));
            }
            SetPixelFormat(hdc, index, &descriptor).map_err(|_| last_error("SetPixelFormat"))
        }
    }

    fn device_context(&self, handle: NativeHandle) -> Hdc {
        // SAFETY: CS_OWNDC gives each window one DC for its whole life, so
        // it is never released.
        unsafe { GetDC(Some(hwnd_of(handle))) }.0
    }

    fn show_window(&self, handle: NativeHandle, command: ShowCommand) {
        let command: SHOW_WINDOW_CMD = match command {
            ShowCommand::Show => SW_SHOW,
            ShowCommand::Hide => SW_HIDE,
            ShowCommand::Restore => SW_RESTORE,
            ShowCommand::Minimize => SW_MINIMIZE,
            ShowCommand::Maximize => SW_MAXIMIZE,
        };
        // SAFETY: the return value is the previous visibility, not an error.
        let _ = unsafe { ShowWindow(hwnd_of(handle), command) };
    }

    fn extend_frame_into_client_area(&self, handle: NativeHandle, margins: Margins) {
        let margins = MARGINS {
            cxLeftWidth: margins.left,
            cxRightWidth: margins.right,
            cyTopHeight: margins.top,
            cyBottomHeight: margins.bottom,
        };
        // SAFETY: `margins` outlives the call.
        if let Err(e) = unsafe { DwmExtendFrameIntoClientArea(hwnd_of(handle), &margins) } {
            warn!(?handle, error = %e, "DwmExtendFrameIntoClientArea failed");
        }
    }

    fn refresh_frame(&self, handle: NativeHandle) {
        self.set_window_pos(
            handle,
            Point::default(),
            Size::default(),
            SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE,
        );
    }

    fn window_rect(&self, handle: NativeHandle) -> Rect {
        let mut rect = RECT::default();
        // SAFETY: `rect` is a valid out pointer.
        match unsafe { GetWindowRect(hwnd_of(handle), &mut rect) } {
            Ok(()) => rect_of(rect),
            Err(_) => Rect::ZERO,
        }
    }

    fn client_rect(&self, handle: NativeHandle) -> Rect {
        let hwnd = hwnd_of(handle);
        let mut rect = RECT::default();
        let mut origin = POINT::default();
        // SAFETY: both out pointers are valid for the duration of the calls.
        let ok = unsafe {
            GetClientRect(hwnd, &mut rect).is_ok() && ClientToScreen(hwnd, &mut origin).as_bool()
        };
        if ok {
            rect_of(rect).offset(origin.x, origin.y)
        } else {
            Rect::ZERO
        }
    }

    fn adjust_window_rect(&self, rect: Rect, style: WindowStyle) -> Rect {
        let mut adjusted = win32_rect(rect);
        // SAFETY: `adjusted` is a valid in/out pointer.
        let result = unsafe {
            AdjustWindowRectEx(
                &mut adjusted,
                WINDOW_STYLE(style.style),
                false.into(),
                WINDOW_EX_STYLE(style.ex_style),
            )
        };
        match result {
            Ok(()) => rect_of(adjusted),
            Err(e) => {
                warn!(error = %e, "AdjustWindowRectEx failed");
                rect
            }
        }
    }

    fn move_window(&self, handle: NativeHandle, origin: Point) {
        self.set_window_pos(handle, origin, Size::default(), SWP_NOSIZE);
    }

    fn resize_window(&self, handle: NativeHandle, size: Size) {
        self.set_window_pos(handle, Point::default(), size, SWP_NOMOVE);
    }

    fn clip_cursor(&self, region: Option<Rect>) {
        let rect = region.map(win32_rect);
        // SAFETY: the RECT, if any, outlives the call; `None` removes the clip.
        let result = unsafe { ClipCursor(rect.as_ref().map(|r| r as *const RECT)) };
        if let Err(e) = result {
            warn!(?region, error = %e, "ClipCursor failed");
        }
    }

    fn keyboard_state(&self) -> [u8; 256] {
        let mut state = [0u8; 256];
        // SAFETY: `state` is exactly the 256 bytes the call writes.
        if let Err(e) = unsafe { GetKeyboardState(&mut state) } {
            warn!(error = %e, "GetKeyboardState failed");
        }
        state
    }

    fn is_vk_down(&self, vk: u8) -> bool {
        // SAFETY: GetKeyState has no preconditions.
        let state = unsafe { GetKeyState(i32::from(vk)) };
        state < 0
    }

    fn default_window_proc(&self, handle: NativeHandle, message: RawMessage) -> isize {
        // SAFETY: forwarding a message that was delivered to `handle`.
        unsafe {
            DefWindowProcW(
                hwnd_of(handle),
                message.id,
                WPARAM(message.wparam),
                LPARAM(message.lparam),
            )
        }
        .0
    }

    fn pump_messages(&self, filter: Option<NativeHandle>) -> usize {
        let filter = filter.map(hwnd_of);
        let mut msg = MSG::default();
        let mut dispatched = 0;
        // SAFETY: standard non-blocking PeekMessage/DispatchMessage loop on
        // the thread that owns the windows.
        unsafe {
            while PeekMessageW(&mut msg, filter, 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
                dispatched += 1;
            }
        }
        dispatched
    }

    fn load_gl_module(&self) -> Result<(), NativeError> {
        // SAFETY: loading a system DLL by name.
        let module = unsafe { LoadLibraryW(GL_MODULE_NAME) }
            .map_err(|_| last_error("LoadLibraryW"))?;
        self.state.gl_module.set(Some(module));
        debug!("opengl32.dll loaded");
        Ok(())
    }

    fn unload_gl_module(&self) {
        if let Some(module) = self.state.gl_module.take() {
            // SAFETY: every context created through the module is gone.
            if let Err(e) = unsafe { FreeLibrary(module) } {
                warn!(error = %e, "FreeLibrary(opengl32.dll) failed");
            }
        }
    }
}
