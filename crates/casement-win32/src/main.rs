//! casement demo entry point.
//!
//! Opens one undecorated window with a custom titlebar and logs every event
//! until the window is closed (close button, Alt+F4 or Escape).
//!
//! ```text
//! casement-demo [config.toml]
//! ```
//!
//! # Custom chrome (for beginners)
//!
//! An undecorated window draws no OS titlebar, so the OS cannot know where
//! the user may drag the window or which pixels are the close button.  The
//! hit-test callback answers that question for every cursor position: the
//! top 32 pixels are the titlebar, the rightmost 46 pixels of it are the
//! close button, and the outer 8 pixels are resize borders.

use std::path::PathBuf;

use casement_win32::PlatformConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn load_config() -> anyhow::Result<PlatformConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = PlatformConfig::load(&path)?;
            Ok(config)
        }
        None => Ok(PlatformConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(backend = ?config.backend, "casement demo starting");
    demo::run(config)
}

#[cfg(target_os = "windows")]
mod demo {
    use std::time::Duration;

    use casement_win32::casement_core::{border_hit_test, HitRegion, Key, KeyAction};
    use casement_win32::{Platform, PlatformConfig, Win32Native, WindowCreateInfo};
    use tracing::info;

    const TITLEBAR_HEIGHT: i32 = 32;
    const CLOSE_BUTTON_WIDTH: i32 = 46;
    const FRAME_INTERVAL: Duration = Duration::from_millis(16);

    pub fn run(config: PlatformConfig) -> anyhow::Result<()> {
        let border = config.chrome.border_width;
        let mut platform = Platform::init(Win32Native::new()?, config)?;

        let window = platform.create_window(
            &WindowCreateInfo::new(960, 600, "casement demo").decorated(false),
        )?;

        window.set_hit_test_callback(move |_, query| {
            let region = border_hit_test(query.cursor, query.window_rect, border);
            if region != HitRegion::Client {
                return region;
            }
            let y = query.cursor.y - query.window_rect.top;
            let x = query.cursor.x - query.window_rect.left;
            if y >= TITLEBAR_HEIGHT {
                HitRegion::Client
            } else if x >= query.window_rect.width() - CLOSE_BUTTON_WIDTH {
                HitRegion::CloseButton
            } else {
                HitRegion::Titlebar
            }
        });
        window.set_key_callback(|id, key, action| info!(%id, ?key, ?action, "key"));
        window.set_mouse_button_callback(|id, button, action| {
            info!(%id, ?button, ?action, "mouse button")
        });
        window.set_activate_callback(|id, active| info!(%id, active, "activate"));

        platform.show_window(&window);
        while !window.close_requested() {
            platform.poll_events();
            if window.key_action(Key::Escape) == KeyAction::Press {
                window.set_close_requested(true);
            }
            std::thread::sleep(FRAME_INTERVAL);
        }

        info!("close requested; shutting down");
        platform.destroy_window(window);
        platform.terminate();
        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
mod demo {
    use casement_win32::PlatformConfig;

    pub fn run(_config: PlatformConfig) -> anyhow::Result<()> {
        anyhow::bail!(
            "casement-demo needs the Win32 backend; this host has no native window system support"
        )
    }
}
