//! TOML configuration for the platform backend.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working configuration:
//!
//! ```toml
//! backend = "opengl"
//! log_level = "info"
//!
//! [chrome]
//! border_width = 8
//!
//! [probe]
//! width = 1280
//! height = 720
//! title = "casement-probe"
//!
//! [pixel_format]
//! depth_bits = 24
//! stencil_bits = 8
//! double_buffer = true
//! ```

use std::path::{Path, PathBuf};

use casement_core::DEFAULT_BORDER_WIDTH;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::native::PixelFormatDesc;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which graphics path the platform bootstraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Accelerated immediate-mode graphics through WGL.  Bootstraps the
    /// extension loader on a hidden probe window.
    #[default]
    OpenGl,
    /// An explicit low-level graphics API whose bootstrap is supplied by
    /// the application as an `ExternalBackend`.
    Explicit,
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level platform configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    #[serde(default)]
    pub backend: Backend,
    /// `tracing` level used by binaries when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub chrome: ChromeConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub pixel_format: PixelFormatDesc,
}

/// Custom chrome settings for undecorated windows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChromeConfig {
    /// Thickness of the resize band the built-in hit-test heuristic uses.
    #[serde(default = "default_border_width")]
    pub border_width: i32,
}

/// The hidden window used to bootstrap the OpenGL loader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_width")]
    pub width: i32,
    #[serde(default = "default_probe_height")]
    pub height: i32,
    #[serde(default = "default_probe_title")]
    pub title: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_border_width() -> i32 {
    DEFAULT_BORDER_WIDTH
}
fn default_probe_width() -> i32 {
    1280
}
fn default_probe_height() -> i32 {
    720
}
fn default_probe_title() -> String {
    "casement-probe".to_string()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            log_level: default_log_level(),
            chrome: ChromeConfig::default(),
            probe: ProbeConfig::default(),
            pixel_format: PixelFormatDesc::default(),
        }
    }
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            border_width: default_border_width(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            width: default_probe_width(),
            height: default_probe_height(),
            title: default_probe_title(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl PlatformConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed or a value
    /// has the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
