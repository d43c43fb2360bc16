//! Logical keys and the native key code translation tables.
//!
//! The canonical representation is [`Key`].  Platform-specific codes are
//! translated to it at the event translation boundary; each backend owns one
//! table module (only Windows exists today).

pub mod key;
pub mod windows_vk;

pub use key::Key;
