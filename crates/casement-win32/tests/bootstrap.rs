//! Integration tests for platform bootstrap, rollback and teardown.

use std::cell::RefCell;
use std::rc::Rc;

use casement_win32::casement_core::Size;
use casement_win32::gl::LoaderError;
use casement_win32::native::{NativeApi, NativeHandle, ShowCommand};
use casement_win32::{
    Backend, ExternalBackend, MockNative, Platform, PlatformConfig, PlatformError,
    WindowCreateInfo,
};

const OPTIONAL_ENTRY_POINTS: [&str; 7] = [
    "wglGetExtensionsStringARB",
    "wglCreateContextAttribsARB",
    "wglGetPixelFormatAttribivARB",
    "wglGetPixelFormatAttribfvARB",
    "wglChoosePixelFormatARB",
    "wglSwapIntervalEXT",
    "wglGetSwapIntervalEXT",
];

const BASELINE_ENTRY_POINTS: [&str; 7] = [
    "wglCreateContext",
    "wglDeleteContext",
    "wglGetCurrentDC",
    "wglGetCurrentContext",
    "wglMakeCurrent",
    "wglShareLists",
    "wglSwapBuffers",
];

/// Asserts that nothing the bootstrap acquires is still held.
fn assert_fully_rolled_back(native: &MockNative) {
    assert!(!native.is_class_registered(), "window class still registered");
    assert!(!native.has_router(), "router still installed");
    assert!(!native.is_gl_module_loaded(), "GL module still loaded");
    assert_eq!(native.window_count(), 0, "probe window still alive");
    assert_eq!(native.live_gl_contexts(), 0, "bootstrap context leaked");
    assert!(!native.has_current_gl_context());
}

#[test]
fn test_bootstrap_resolves_every_entry_point_with_a_full_driver() {
    let native = MockNative::new();

    let platform = Platform::init(native.clone(), PlatformConfig::default()).expect("bootstrap");

    let gl = platform.gl_functions().expect("OpenGL backend loads WGL");
    assert!(gl.extensions.missing().is_empty());
    assert_eq!(platform.backend(), Backend::OpenGl);
    assert_eq!(native.live_gl_contexts(), 0, "bootstrap context is deleted");
}

#[test]
fn test_bootstrap_succeeds_with_every_optional_entry_point_missing() {
    // Arrange
    let native = MockNative::new();
    for name in OPTIONAL_ENTRY_POINTS {
        native.remove_symbol(name);
    }

    // Act
    let platform = Platform::init(native.clone(), PlatformConfig::default());

    // Assert
    let platform = platform.expect("optional entries never fail bootstrap");
    let extensions = &platform.gl_functions().expect("gl loaded").extensions;
    assert_eq!(extensions.missing(), OPTIONAL_ENTRY_POINTS.to_vec());
    assert!(extensions.wgl_create_context_attribs_arb.is_none());
    assert!(extensions.wgl_swap_interval_ext.is_none());
}

#[test]
fn test_bootstrap_fails_and_rolls_back_when_any_baseline_entry_is_missing() {
    for name in BASELINE_ENTRY_POINTS {
        // Arrange
        let native = MockNative::new();
        native.remove_symbol(name);

        // Act
        let result = Platform::init(native.clone(), PlatformConfig::default());

        // Assert
        match result {
            Err(PlatformError::Loader(LoaderError::MissingBaseline(missing))) => {
                assert_eq!(missing, name, "wrong entry reported")
            }
            Err(other) => panic!("expected MissingBaseline for {name}, got {other}"),
            Ok(_) => panic!("bootstrap succeeded without {name}"),
        }
        assert_fully_rolled_back(&native);
        assert_eq!(native.destroyed_windows().len(), 1, "probe destroyed exactly once");
    }
}

#[test]
fn test_class_registration_failure_leaves_nothing_behind() {
    let native = MockNative::new();
    native.fail_class_registration();

    let result = Platform::init(native.clone(), PlatformConfig::default());

    assert!(matches!(result, Err(PlatformError::ClassRegistration(_))));
    assert_fully_rolled_back(&native);
}

#[test]
fn test_missing_gl_module_unregisters_the_class() {
    let native = MockNative::new();
    native.fail_gl_module();

    let result = Platform::init(native.clone(), PlatformConfig::default());

    assert!(matches!(result, Err(PlatformError::GlModule(_))));
    assert_fully_rolled_back(&native);
}

#[test]
fn test_probe_window_failure_unloads_the_module() {
    let native = MockNative::new();
    native.fail_window_creation(true);

    let result = Platform::init(native.clone(), PlatformConfig::default());

    assert!(matches!(result, Err(PlatformError::ProbeWindow(_))));
    assert_fully_rolled_back(&native);
}

#[test]
fn test_probe_pixel_format_failure_destroys_the_probe() {
    let native = MockNative::new();
    native.fail_pixel_format(true);

    let result = Platform::init(native.clone(), PlatformConfig::default());

    assert!(matches!(result, Err(PlatformError::PixelFormat(_))));
    assert_fully_rolled_back(&native);
    assert_eq!(native.destroyed_windows().len(), 1);
}

#[test]
fn test_context_creation_failure_rolls_back() {
    let native = MockNative::new();
    native.fail_context_creation();

    let result = Platform::init(native.clone(), PlatformConfig::default());

    assert!(matches!(result, Err(PlatformError::ContextCreation)));
    assert_fully_rolled_back(&native);
}

#[test]
fn test_platform_can_be_initialised_again_after_terminate() {
    let native = MockNative::new();

    let first = Platform::init(native.clone(), PlatformConfig::default()).expect("first init");
    first.terminate();
    let second = Platform::init(native.clone(), PlatformConfig::default());

    assert!(second.is_ok(), "terminate must unregister the class");
}

#[test]
fn test_terminate_destroys_leftover_windows() {
    // Arrange
    let native = MockNative::new();
    let mut platform =
        Platform::init(native.clone(), PlatformConfig::default()).expect("bootstrap");
    let a = platform.create_window(&WindowCreateInfo::new(100, 100, "a")).expect("a");
    let b = platform.create_window(&WindowCreateInfo::new(100, 100, "b")).expect("b");
    let handles = [platform.native_handle(&a), platform.native_handle(&b)];

    // Act
    platform.terminate();

    // Assert
    for handle in handles {
        assert!(!native.window_exists(handle));
    }
    assert_fully_rolled_back(&native);
    drop((a, b));
}

struct CountingBackend {
    events: Rc<RefCell<Vec<&'static str>>>,
}

impl ExternalBackend for CountingBackend {
    fn init(&mut self) -> Result<(), String> {
        self.events.borrow_mut().push("init");
        Ok(())
    }

    fn terminate(&mut self) {
        self.events.borrow_mut().push("terminate");
    }
}

#[test]
fn test_explicit_backend_bootstrap_skips_wgl_and_terminates_collaborator() {
    // Arrange
    let native = MockNative::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let config = PlatformConfig::from_toml_str(r#"backend = "explicit""#).expect("config");

    // Act
    let mut platform = Platform::init_with_backend(
        native.clone(),
        config,
        Some(Box::new(CountingBackend { events: Rc::clone(&events) })),
    )
    .expect("explicit bootstrap");
    let window = platform
        .create_window(&WindowCreateInfo::new(640, 480, "explicit"))
        .expect("create window");
    let handle = platform.native_handle(&window);
    let pixel_format = native.pixel_format(handle);
    platform.destroy_window(window);
    platform.terminate();

    // Assert
    assert_eq!(pixel_format, None, "no GL pixel format for the explicit backend");
    assert_eq!(*events.borrow(), vec!["init", "terminate"]);
    assert_fully_rolled_back(&native);
}

#[test]
fn test_probe_window_uses_configured_size_and_title() {
    // Arrange
    let native = MockNative::new();
    let config = PlatformConfig::from_toml_str(
        r#"
            [probe]
            width = 320
            height = 240
            title = "loader"
        "#,
    )
    .expect("config");

    // Act
    let platform = Platform::init(native.clone(), config).expect("bootstrap");

    // Assert: the probe is the first window the native layer hands out.
    let probe = NativeHandle(0x1000);
    assert_eq!(native.window_title(probe).as_deref(), Some("loader"));
    assert_eq!(native.window_rect(probe).size(), Size::new(320, 240));
    assert_eq!(native.show_state(probe), Some(ShowCommand::Hide));
    assert_eq!(platform.window_count(), 0, "the probe is not an application window");
    let gl = platform.gl_functions().expect("gl");
    assert!(gl.baseline.current_context().is_none());
}
