//! The platform context: bootstrap, teardown, the message pump and the
//! window operations that need the OS.
//!
//! # Lifecycle
//!
//! ```text
//! Platform::init ──► create_window ──► poll_events (loop) ──► destroy_window ──► terminate
//! ```
//!
//! Everything between `init` and `terminate` is a method on the
//! [`Platform`] value or on a [`Window`] it created, so nothing can run
//! outside the bracket.  `Platform` holds `Rc`s and is therefore neither
//! `Send` nor `Sync`: all windows live on the thread that initialised it.
//!
//! # OpenGL bootstrap
//!
//! 1. register the window class and install the message router;
//! 2. load `opengl32.dll`;
//! 3. create the hidden probe window, hide it twice (the first
//!    `ShowWindow` of a process may use the `STARTUPINFO` show command
//!    instead of ours) and drain its pending messages;
//! 4. set the baseline pixel format on the probe;
//! 5. resolve the mandatory entry points from the module export table;
//! 6. create a legacy context on the probe, make it current, resolve the
//!    extension catalog, then release and delete the context.
//!
//! A failure at any step tears down every earlier step in reverse order
//! and leaves no global state behind.

use std::rc::Rc;

use casement_core::{CursorMode, FrameInsets, InputSnapshot, Point, Rect, Size};
use casement_core::keymap::windows_vk::{VK_LBUTTON, VK_MBUTTON, VK_RBUTTON};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{Backend, PlatformConfig};
use crate::cursor;
use crate::gl::{self, Hdc, LoaderError, WglFunctions};
use crate::native::{
    to_wide, NativeApi, NativeError, NativeHandle, NativeWindowDesc, ShowCommand, WINDOW_STYLE,
};
use crate::translator::{extend_frame, EventTranslator};
use crate::window::{Window, WindowCreateInfo, WindowError, WindowRecord, WindowRegistry};

/// Errors returned by [`Platform::init`].  Every variant is reported after
/// a full rollback.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to register the window class: {0}")]
    ClassRegistration(#[source] NativeError),

    #[error("failed to load the OpenGL module: {0}")]
    GlModule(#[source] NativeError),

    #[error("failed to create the OpenGL probe window: {0}")]
    ProbeWindow(#[source] NativeError),

    #[error("failed to set the probe window's pixel format: {0}")]
    PixelFormat(#[source] NativeError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("failed to create the bootstrap OpenGL context")]
    ContextCreation,

    #[error("the explicit graphics backend was selected but none was supplied")]
    BackendUnavailable,

    #[error("the explicit graphics backend failed to initialise: {0}")]
    Backend(String),
}

/// Bootstrap hooks for the explicit graphics backend, which lives outside
/// this crate.
pub trait ExternalBackend {
    /// Called once during [`Platform::init`] after the window class exists.
    fn init(&mut self) -> Result<(), String>;
    /// Called once during teardown, before the window class is removed.
    fn terminate(&mut self);
}

/// The process-wide platform context.  See the module docs.
pub struct Platform<N: NativeApi + 'static> {
    native: N,
    config: PlatformConfig,
    registry: Rc<WindowRegistry>,
    gl_module_loaded: bool,
    probe: Option<NativeHandle>,
    gl: Option<WglFunctions>,
    external: Option<Box<dyn ExternalBackend>>,
    snapshot: InputSnapshot,
    terminated: bool,
}

impl<N: NativeApi + 'static> Platform<N> {
    /// Initialises the platform with the backend selected in `config`.
    ///
    /// # Errors
    ///
    /// See [`PlatformError`].  On error nothing remains registered, loaded
    /// or created.
    pub fn init(native: N, config: PlatformConfig) -> Result<Self, PlatformError> {
        Self::init_with_backend(native, config, None)
    }

    /// Like [`Platform::init`], supplying the bootstrap for
    /// [`Backend::Explicit`].  `external` is ignored for the OpenGL backend.
    ///
    /// # Errors
    ///
    /// See [`PlatformError`].
    pub fn init_with_backend(
        native: N,
        config: PlatformConfig,
        external: Option<Box<dyn ExternalBackend>>,
    ) -> Result<Self, PlatformError> {
        info!(backend = ?config.backend, "initialising platform");

        native
            .register_window_class()
            .map_err(PlatformError::ClassRegistration)?;

        let registry = Rc::new(WindowRegistry::default());
        native.install_router(Rc::new(EventTranslator::new(
            native.clone(),
            Rc::clone(&registry),
            config.chrome.border_width,
        )));

        let mut platform = Self {
            native,
            config,
            registry,
            gl_module_loaded: false,
            probe: None,
            gl: None,
            external: None,
            snapshot: InputSnapshot::new(),
            terminated: false,
        };

        let bootstrapped = match platform.config.backend {
            Backend::OpenGl => platform.bootstrap_gl(),
            Backend::Explicit => platform.bootstrap_external(external),
        };
        match bootstrapped {
            Ok(()) => {
                info!("platform ready");
                Ok(platform)
            }
            Err(e) => {
                error!(error = %e, "platform bootstrap failed; rolling back");
                platform.teardown();
                Err(e)
            }
        }
    }

    fn bootstrap_gl(&mut self) -> Result<(), PlatformError> {
        self.native.load_gl_module().map_err(PlatformError::GlModule)?;
        self.gl_module_loaded = true;

        let probe_size = Size::new(self.config.probe.width, self.config.probe.height);
        let probe = self
            .native
            .create_window(&NativeWindowDesc {
                title: to_wide(&self.config.probe.title),
                size: probe_size,
                style: WINDOW_STYLE,
            })
            .map_err(PlatformError::ProbeWindow)?;
        self.probe = Some(probe);
        self.native.show_window(probe, ShowCommand::Hide);
        self.native.show_window(probe, ShowCommand::Hide);
        let drained = self.native.pump_messages(Some(probe));
        debug!(?probe, drained, "probe window created");

        self.native
            .set_pixel_format(probe, &self.config.pixel_format)
            .map_err(PlatformError::PixelFormat)?;

        let baseline = gl::load_baseline(&self.native)?;
        let hdc = self.native.device_context(probe);
        // SAFETY: `hdc` belongs to the live probe window, which has a pixel
        // format set.
        let extensions = unsafe {
            baseline.with_temporary_context(hdc, || gl::load_extensions(&self.native))
        }
        .ok_or(PlatformError::ContextCreation)?;

        let missing = extensions.missing();
        if missing.is_empty() {
            info!("all WGL extension entry points resolved");
        } else {
            info!(?missing, "some WGL extension entry points are unavailable");
        }
        self.gl = Some(WglFunctions { baseline, extensions });
        Ok(())
    }

    fn bootstrap_external(
        &mut self,
        external: Option<Box<dyn ExternalBackend>>,
    ) -> Result<(), PlatformError> {
        let mut backend = external.ok_or(PlatformError::BackendUnavailable)?;
        backend.init().map_err(PlatformError::Backend)?;
        self.external = Some(backend);
        Ok(())
    }

    /// Tears everything down in reverse bootstrap order.  Safe to call on a
    /// partially initialised platform and idempotent.
    fn teardown(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        let leftover = self.registry.handles();
        if !leftover.is_empty() {
            warn!(count = leftover.len(), "destroying windows still open at terminate");
        }
        for handle in leftover {
            self.native.destroy_window(handle);
            self.registry.remove(handle);
        }

        if let Some(mut backend) = self.external.take() {
            backend.terminate();
        }
        self.gl = None;
        if let Some(probe) = self.probe.take() {
            self.native.destroy_window(probe);
        }
        if self.gl_module_loaded {
            self.native.unload_gl_module();
            self.gl_module_loaded = false;
        }
        self.native.remove_router();
        self.native.unregister_window_class();
        debug!("platform torn down");
    }

    /// Releases every platform resource.  Windows still open are destroyed.
    pub fn terminate(mut self) {
        info!("terminating platform");
        self.teardown();
    }

    // ── Event pump ───────────────────────────────────────────────────────────

    /// Dispatches every message already queued for this thread without
    /// waiting for new ones, then refreshes the input snapshot.  Callbacks
    /// run from inside this call.  Returns the number of messages
    /// dispatched.
    pub fn poll_events(&mut self) -> usize {
        let dispatched = self.native.pump_messages(None);
        self.snapshot = InputSnapshot::from_raw(
            &self.native.keyboard_state(),
            self.native.is_vk_down(VK_LBUTTON),
            self.native.is_vk_down(VK_MBUTTON),
            self.native.is_vk_down(VK_RBUTTON),
        );
        dispatched
    }

    /// Keyboard and mouse state sampled at the end of the last poll.
    pub fn input_snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn backend(&self) -> Backend {
        self.config.backend
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// The resolved WGL entry points (OpenGL backend only).
    pub fn gl_functions(&self) -> Option<&WglFunctions> {
        self.gl.as_ref()
    }

    /// Number of windows created and not yet destroyed.
    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    /// The native handle of `window`, for interop with other APIs.
    pub fn native_handle(&self, window: &Window) -> NativeHandle {
        window.native_handle()
    }

    /// The device context of `window`, for creating rendering contexts.
    pub fn device_context(&self, window: &Window) -> Hdc {
        self.native.device_context(window.native_handle())
    }

    // ── Window lifecycle ─────────────────────────────────────────────────────

    /// Creates a window.  It starts hidden; call [`Platform::show_window`].
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidSize`] for non-positive sizes,
    /// [`WindowError::Native`] if the OS refuses the window and
    /// [`WindowError::PixelFormat`] if the OpenGL backend cannot set the
    /// pixel format (the native window is destroyed again).
    pub fn create_window(&mut self, info: &WindowCreateInfo) -> Result<Window, WindowError> {
        let size = Size::positive(info.width, info.height)?;
        let handle = self
            .native
            .create_window(&NativeWindowDesc {
                title: to_wide(&info.title),
                size,
                style: WINDOW_STYLE,
            })
            .map_err(WindowError::Native)?;

        if self.config.backend == Backend::OpenGl {
            if let Err(e) = self.native.set_pixel_format(handle, &self.config.pixel_format) {
                warn!(?handle, error = %e, "pixel format rejected; destroying window");
                self.native.destroy_window(handle);
                return Err(WindowError::PixelFormat(e));
            }
        }

        let record = Rc::new(WindowRecord::new(
            self.registry.allocate_id(),
            handle,
            info.decorated,
        ));
        self.registry.insert(Rc::clone(&record));
        if !info.decorated {
            extend_frame(&self.native, handle);
        }

        info!(
            id = %record.id(),
            ?handle,
            decorated = info.decorated,
            title = %info.title,
            "window created"
        );
        Ok(Window::new(record))
    }

    /// Destroys `window`.  Focus-loss messages produced by the destruction
    /// are still delivered to its callbacks.
    pub fn destroy_window(&mut self, window: Window) {
        let handle = window.native_handle();
        self.native.destroy_window(handle);
        self.registry.remove(handle);
        info!(id = %window.id(), ?handle, "window destroyed");
    }

    // ── Geometry ─────────────────────────────────────────────────────────────

    /// Frame thickness between the outer and client rectangles, computed
    /// from the creation style.
    fn frame_insets(&self, window: &Window) -> FrameInsets {
        if window.is_decorated() {
            let adjusted = self.native.adjust_window_rect(Rect::ZERO, WINDOW_STYLE);
            FrameInsets::from_adjusted_zero(adjusted)
        } else {
            FrameInsets::NONE
        }
    }

    /// Screen position of the outer window.
    pub fn window_position(&self, window: &Window) -> Point {
        self.native.window_rect(window.native_handle()).origin()
    }

    pub fn set_window_position(&self, window: &Window, position: Point) {
        self.native.move_window(window.native_handle(), position);
    }

    /// Size of the outer window.
    pub fn window_size(&self, window: &Window) -> Size {
        self.native.window_rect(window.native_handle()).size()
    }

    /// Screen position of the client area.
    pub fn content_position(&self, window: &Window) -> Point {
        self.native.client_rect(window.native_handle()).origin()
    }

    /// Moves the window so its client area starts at `position`.
    pub fn set_content_position(&self, window: &Window, position: Point) {
        let outer = self.frame_insets(window).outer_origin(position);
        self.native.move_window(window.native_handle(), outer);
    }

    /// Size of the client area.
    pub fn content_size(&self, window: &Window) -> Size {
        self.native.client_rect(window.native_handle()).size()
    }

    /// Resizes the window so its client area is `size`.  The outer origin
    /// does not move.
    pub fn set_content_size(&self, window: &Window, size: Size) {
        let outer = self.frame_insets(window).outer_size(size);
        self.native.resize_window(window.native_handle(), outer);
    }

    // ── Visibility ───────────────────────────────────────────────────────────

    pub fn show_window(&self, window: &Window) {
        self.native.show_window(window.native_handle(), ShowCommand::Show);
    }

    pub fn hide_window(&self, window: &Window) {
        self.native.show_window(window.native_handle(), ShowCommand::Hide);
    }

    pub fn restore_window(&self, window: &Window) {
        self.native.show_window(window.native_handle(), ShowCommand::Restore);
    }

    pub fn minimize_window(&self, window: &Window) {
        self.native.show_window(window.native_handle(), ShowCommand::Minimize);
    }

    pub fn maximize_window(&self, window: &Window) {
        self.native.show_window(window.native_handle(), ShowCommand::Maximize);
    }

    // ── Cursor ───────────────────────────────────────────────────────────────

    /// Changes the cursor mode of `window`.  A focused window switches
    /// immediately; otherwise the mode applies on the next focus gain.
    pub fn set_cursor_mode(&self, window: &Window, mode: CursorMode) {
        let record = window.record();
        let previous = record.replace_cursor_mode(mode);
        if previous == mode || !record.is_focused() {
            return;
        }
        debug!(id = %window.id(), ?previous, ?mode, "cursor mode changed while focused");
        cursor::leave_mode(&self.native, previous);
        cursor::enter_mode(&self.native, window.native_handle(), mode);
    }
}

impl<N: NativeApi + 'static> Drop for Platform<N> {
    fn drop(&mut self) {
        self.teardown();
    }
}
