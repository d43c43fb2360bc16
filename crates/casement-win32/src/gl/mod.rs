//! WGL entry point loader.
//!
//! # The bootstrap problem (for beginners)
//!
//! On Windows the OpenGL driver's extension functions (modern context
//! creation, pixel format queries, swap interval) can only be looked up with
//! `wglGetProcAddress`, and `wglGetProcAddress` only answers while *some*
//! OpenGL context is current.  Creating that first context needs the legacy
//! functions (`wglCreateContext`, `wglMakeCurrent`, ...), which live in the
//! export table of `opengl32.dll` itself.
//!
//! So loading happens in two phases:
//!
//! 1. [`load_baseline`] resolves the legacy functions from the module
//!    export table.  These are mandatory: without them no context can ever
//!    exist, and bootstrap fails.
//! 2. With a throwaway context current, [`load_extensions`] resolves the
//!    extension catalog.  Every extension entry is optional; a missing one is
//!    recorded as `None` and is a capability gap, never an error.
//!
//! Some drivers return small integers or `-1` instead of `NULL` for unknown
//! names, so [`is_valid_proc_address`] filters those out as well.

use std::ffi::{c_char, c_void, CStr};

use thiserror::Error;

pub mod attribs;

pub use attribs::{ContextAttribs, ContextProfile, PixelFormatAttribs};

/// A device context handle (`HDC`).
pub type Hdc = *mut c_void;
/// An OpenGL rendering context handle (`HGLRC`).
pub type Hglrc = *mut c_void;

// ── Entry point signatures ────────────────────────────────────────────────────

pub type WglCreateContext = unsafe extern "system" fn(Hdc) -> Hglrc;
pub type WglDeleteContext = unsafe extern "system" fn(Hglrc) -> i32;
pub type WglGetCurrentDc = unsafe extern "system" fn() -> Hdc;
pub type WglGetCurrentContext = unsafe extern "system" fn() -> Hglrc;
pub type WglMakeCurrent = unsafe extern "system" fn(Hdc, Hglrc) -> i32;
pub type WglShareLists = unsafe extern "system" fn(Hglrc, Hglrc) -> i32;
pub type WglSwapBuffers = unsafe extern "system" fn(Hdc) -> i32;

pub type WglGetExtensionsStringArb = unsafe extern "system" fn(Hdc) -> *const c_char;
pub type WglCreateContextAttribsArb = unsafe extern "system" fn(Hdc, Hglrc, *const i32) -> Hglrc;
pub type WglGetPixelFormatAttribivArb =
    unsafe extern "system" fn(Hdc, i32, i32, u32, *const i32, *mut i32) -> i32;
pub type WglGetPixelFormatAttribfvArb =
    unsafe extern "system" fn(Hdc, i32, i32, u32, *const i32, *mut f32) -> i32;
pub type WglChoosePixelFormatArb =
    unsafe extern "system" fn(Hdc, *const i32, *const f32, u32, *mut i32, *mut u32) -> i32;
pub type WglSwapIntervalExt = unsafe extern "system" fn(i32) -> i32;
pub type WglGetSwapIntervalExt = unsafe extern "system" fn() -> i32;

/// Errors produced while loading WGL entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// A legacy entry point every OpenGL driver must export was not found.
    #[error("mandatory WGL entry point {0} could not be resolved")]
    MissingBaseline(&'static str),
}

/// Where entry point addresses come from.
#[cfg_attr(test, mockall::automock)]
pub trait SymbolSource {
    /// Looks `name` up in the export table of the loaded OpenGL module.
    fn module_symbol(&self, name: &CStr) -> Option<usize>;
    /// Looks `name` up through the driver (`wglGetProcAddress`).  Only
    /// answers while a context is current on the calling thread.
    fn extension_symbol(&self, name: &CStr) -> Option<usize>;
}

/// Returns `false` for `NULL` and the sentinel values (1, 2, 3, -1) some
/// drivers return for unknown names.
pub fn is_valid_proc_address(address: usize) -> bool {
    !matches!(address, 0..=3) && address != usize::MAX
}

/// Resolves one entry point named by the identifier `$name` through
/// `$source.$lookup` and reinterprets it as `$ty`.
macro_rules! resolve {
    ($source:expr, $lookup:ident, $name:ident as $ty:ty) => {{
        let bytes = concat!(stringify!($name), "\0").as_bytes();
        // SAFETY: an identifier never contains NUL and exactly one is appended.
        let symbol = unsafe { CStr::from_bytes_with_nul_unchecked(bytes) };
        $source
            .$lookup(symbol)
            .filter(|&address| is_valid_proc_address(address))
            // SAFETY: the driver exports `$name` with the documented
            // signature `$ty`, and function pointers are pointer sized.
            .map(|address| unsafe { std::mem::transmute::<usize, $ty>(address) })
    }};
}

macro_rules! require {
    ($source:expr, $name:ident as $ty:ty) => {
        resolve!($source, module_symbol, $name as $ty)
            .ok_or(LoaderError::MissingBaseline(stringify!($name)))?
    };
}

// ── Baseline ──────────────────────────────────────────────────────────────────

/// The legacy WGL functions exported by `opengl32.dll`.
#[derive(Debug, Clone, Copy)]
pub struct BaselineWgl {
    pub wgl_create_context: WglCreateContext,
    pub wgl_delete_context: WglDeleteContext,
    pub wgl_get_current_dc: WglGetCurrentDc,
    pub wgl_get_current_context: WglGetCurrentContext,
    pub wgl_make_current: WglMakeCurrent,
    pub wgl_share_lists: WglShareLists,
    pub wgl_swap_buffers: WglSwapBuffers,
}

/// Resolves every mandatory entry point from the module export table.
///
/// # Errors
///
/// Returns [`LoaderError::MissingBaseline`] naming the first entry point
/// that could not be resolved.
pub fn load_baseline(source: &dyn SymbolSource) -> Result<BaselineWgl, LoaderError> {
    Ok(BaselineWgl {
        wgl_create_context: require!(source, wglCreateContext as WglCreateContext),
        wgl_delete_context: require!(source, wglDeleteContext as WglDeleteContext),
        wgl_get_current_dc: require!(source, wglGetCurrentDC as WglGetCurrentDc),
        wgl_get_current_context: require!(source, wglGetCurrentContext as WglGetCurrentContext),
        wgl_make_current: require!(source, wglMakeCurrent as WglMakeCurrent),
        wgl_share_lists: require!(source, wglShareLists as WglShareLists),
        wgl_swap_buffers: require!(source, wglSwapBuffers as WglSwapBuffers),
    })
}

impl BaselineWgl {
    /// Creates a legacy context for `hdc`.
    ///
    /// # Safety
    ///
    /// `hdc` must be a live device context with a pixel format set.
    pub unsafe fn create_context(&self, hdc: Hdc) -> Option<Hglrc> {
        let context = (self.wgl_create_context)(hdc);
        (!context.is_null()).then_some(context)
    }

    /// # Safety
    ///
    /// `context` must have been created by this driver and not yet deleted.
    pub unsafe fn delete_context(&self, context: Hglrc) -> bool {
        (self.wgl_delete_context)(context) != 0
    }

    /// Makes `context` current on `hdc`, or releases the current context
    /// when both are null.
    ///
    /// # Safety
    ///
    /// Both handles must be live or both null.
    pub unsafe fn make_current(&self, hdc: Hdc, context: Hglrc) -> bool {
        (self.wgl_make_current)(hdc, context) != 0
    }

    /// The context current on this thread, if any.
    pub fn current_context(&self) -> Option<Hglrc> {
        // SAFETY: takes no arguments and only reads thread-local driver state.
        let context = unsafe { (self.wgl_get_current_context)() };
        (!context.is_null()).then_some(context)
    }

    /// The device context of the current context, if any.
    pub fn current_dc(&self) -> Option<Hdc> {
        // SAFETY: as for `current_context`.
        let hdc = unsafe { (self.wgl_get_current_dc)() };
        (!hdc.is_null()).then_some(hdc)
    }

    /// Shares display lists (and textures, buffers) of `source` with `target`.
    ///
    /// # Safety
    ///
    /// Both contexts must be live.
    pub unsafe fn share_lists(&self, source: Hglrc, target: Hglrc) -> bool {
        (self.wgl_share_lists)(source, target) != 0
    }

    /// # Safety
    ///
    /// `hdc` must be a live, double-buffered device context.
    pub unsafe fn swap_buffers(&self, hdc: Hdc) -> bool {
        (self.wgl_swap_buffers)(hdc) != 0
    }

    /// Runs `f` with a temporary legacy context current on `hdc`, then
    /// releases and deletes the context.  Returns `None` (without calling
    /// `f`) if no context could be created or made current.
    ///
    /// # Safety
    ///
    /// `hdc` must be a live device context with a pixel format set.
    pub unsafe fn with_temporary_context<R>(&self, hdc: Hdc, f: impl FnOnce() -> R) -> Option<R> {
        let context = self.create_context(hdc)?;
        if !self.make_current(hdc, context) {
            self.delete_context(context);
            return None;
        }
        let result = f();
        self.make_current(std::ptr::null_mut(), std::ptr::null_mut());
        self.delete_context(context);
        Some(result)
    }
}

// ── Extensions ────────────────────────────────────────────────────────────────

/// The optional extension catalog.  `None` means the driver does not
/// provide the entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct WglExtensions {
    pub wgl_get_extensions_string_arb: Option<WglGetExtensionsStringArb>,
    pub wgl_create_context_attribs_arb: Option<WglCreateContextAttribsArb>,
    pub wgl_get_pixel_format_attribiv_arb: Option<WglGetPixelFormatAttribivArb>,
    pub wgl_get_pixel_format_attribfv_arb: Option<WglGetPixelFormatAttribfvArb>,
    pub wgl_choose_pixel_format_arb: Option<WglChoosePixelFormatArb>,
    pub wgl_swap_interval_ext: Option<WglSwapIntervalExt>,
    pub wgl_get_swap_interval_ext: Option<WglGetSwapIntervalExt>,
}

/// Resolves the extension catalog.  Must be called while a context is
/// current, otherwise every entry comes back `None`.
pub fn load_extensions(source: &dyn SymbolSource) -> WglExtensions {
    WglExtensions {
        wgl_get_extensions_string_arb: resolve!(
            source,
            extension_symbol,
            wglGetExtensionsStringARB as WglGetExtensionsStringArb
        ),
        wgl_create_context_attribs_arb: resolve!(
            source,
            extension_symbol,
            wglCreateContextAttribsARB as WglCreateContextAttribsArb
        ),
        wgl_get_pixel_format_attribiv_arb: resolve!(
            source,
            extension_symbol,
            wglGetPixelFormatAttribivARB as WglGetPixelFormatAttribivArb
        ),
        wgl_get_pixel_format_attribfv_arb: resolve!(
            source,
            extension_symbol,
            wglGetPixelFormatAttribfvARB as WglGetPixelFormatAttribfvArb
        ),
        wgl_choose_pixel_format_arb: resolve!(
            source,
            extension_symbol,
            wglChoosePixelFormatARB as WglChoosePixelFormatArb
        ),
        wgl_swap_interval_ext: resolve!(
            source,
            extension_symbol,
            wglSwapIntervalEXT as WglSwapIntervalExt
        ),
        wgl_get_swap_interval_ext: resolve!(
            source,
            extension_symbol,
            wglGetSwapIntervalEXT as WglGetSwapIntervalExt
        ),
    }
}

impl WglExtensions {
    /// Names of the entry points that did not resolve.
    pub fn missing(&self) -> Vec<&'static str> {
        let entries = [
            ("wglGetExtensionsStringARB", self.wgl_get_extensions_string_arb.is_some()),
            ("wglCreateContextAttribsARB", self.wgl_create_context_attribs_arb.is_some()),
            ("wglGetPixelFormatAttribivARB", self.wgl_get_pixel_format_attribiv_arb.is_some()),
            ("wglGetPixelFormatAttribfvARB", self.wgl_get_pixel_format_attribfv_arb.is_some()),
            ("wglChoosePixelFormatARB", self.wgl_choose_pixel_format_arb.is_some()),
            ("wglSwapIntervalEXT", self.wgl_swap_interval_ext.is_some()),
            ("wglGetSwapIntervalEXT", self.wgl_get_swap_interval_ext.is_some()),
        ];
        entries
            .into_iter()
            .filter(|&(_, resolved)| !resolved)
            .map(|(name, _)| name)
            .collect()
    }

    /// The space-separated extension string for `hdc`.
    ///
    /// # Safety
    ///
    /// `hdc` must be a live device context.
    pub unsafe fn extension_string(&self, hdc: Hdc) -> Option<String> {
        let query = self.wgl_get_extensions_string_arb?;
        let raw = query(hdc);
        if raw.is_null() {
            return None;
        }
        Some(CStr::from_ptr(raw).to_string_lossy().into_owned())
    }

    /// Whether the driver advertises `name` for `hdc`.  Matches whole
    /// words only.
    ///
    /// # Safety
    ///
    /// As for [`WglExtensions::extension_string`].
    pub unsafe fn has_extension(&self, hdc: Hdc, name: &str) -> bool {
        self.extension_string(hdc)
            .is_some_and(|extensions| extensions.split_ascii_whitespace().any(|ext| ext == name))
    }

    /// Creates a context through `wglCreateContextAttribsARB`.
    ///
    /// # Safety
    ///
    /// `hdc` must be live with a pixel format set; `share` must be null or
    /// a live context.
    pub unsafe fn create_context_with_attribs(
        &self,
        hdc: Hdc,
        share: Hglrc,
        attribs: &ContextAttribs,
    ) -> Option<Hglrc> {
        let create = self.wgl_create_context_attribs_arb?;
        let list = attribs.to_attrib_list();
        let context = create(hdc, share, list.as_ptr());
        (!context.is_null()).then_some(context)
    }

    /// Picks the best pixel format matching `attribs`.
    ///
    /// # Safety
    ///
    /// `hdc` must be a live device context.
    pub unsafe fn choose_pixel_format(
        &self,
        hdc: Hdc,
        attribs: &PixelFormatAttribs,
    ) -> Option<i32> {
        let choose = self.wgl_choose_pixel_format_arb?;
        let list = attribs.to_attrib_list();
        let mut format = 0i32;
        let mut count = 0u32;
        let ok = choose(hdc, list.as_ptr(), std::ptr::null(), 1, &mut format, &mut count);
        (ok != 0 && count > 0).then_some(format)
    }

    /// Queries integer attributes of pixel format `format`.
    ///
    /// # Safety
    ///
    /// `hdc` must be a live device context.
    pub unsafe fn pixel_format_attribs(
        &self,
        hdc: Hdc,
        format: i32,
        attributes: &[i32],
    ) -> Option<Vec<i32>> {
        let query = self.wgl_get_pixel_format_attribiv_arb?;
        let mut values = vec![0i32; attributes.len()];
        let ok = query(
            hdc,
            format,
            0,
            attributes.len() as u32,
            attributes.as_ptr(),
            values.as_mut_ptr(),
        );
        (ok != 0).then_some(values)
    }

    /// Sets the swap interval of the current context.  Returns `false` if
    /// the extension is missing or the driver refused.
    pub fn set_swap_interval(&self, interval: i32) -> bool {
        self.wgl_swap_interval_ext
            // SAFETY: operates on the thread's current context only.
            .is_some_and(|set| unsafe { set(interval) } != 0)
    }

    /// The swap interval of the current context.
    pub fn swap_interval(&self) -> Option<i32> {
        // SAFETY: as for `set_swap_interval`.
        self.wgl_get_swap_interval_ext.map(|get| unsafe { get() })
    }
}

/// Every entry point the loader resolved.
#[derive(Debug, Clone, Copy)]
pub struct WglFunctions {
    pub baseline: BaselineWgl,
    pub extensions: WglExtensions,
}
