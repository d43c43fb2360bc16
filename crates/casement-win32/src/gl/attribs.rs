//! WGL extension constants and attribute list builders.
//!
//! `wglCreateContextAttribsARB` and `wglChoosePixelFormatARB` take flat,
//! zero-terminated lists of `(attribute, value)` pairs.  The builders here
//! produce those lists from typed descriptions.

use serde::{Deserialize, Serialize};

use crate::native::PixelFormatDesc;

// ── WGL_ARB_create_context / WGL_ARB_create_context_profile ──────────────────

pub const WGL_CONTEXT_DEBUG_BIT_ARB: i32 = 0x0001;
pub const WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB: i32 = 0x0002;
pub const WGL_CONTEXT_MAJOR_VERSION_ARB: i32 = 0x2091;
pub const WGL_CONTEXT_MINOR_VERSION_ARB: i32 = 0x2092;
pub const WGL_CONTEXT_LAYER_PLANE_ARB: i32 = 0x2093;
pub const WGL_CONTEXT_FLAGS_ARB: i32 = 0x2094;
pub const WGL_CONTEXT_PROFILE_MASK_ARB: i32 = 0x9126;
pub const WGL_CONTEXT_CORE_PROFILE_BIT_ARB: i32 = 0x0001;
pub const WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB: i32 = 0x0002;
pub const ERROR_INVALID_VERSION_ARB: u32 = 0x2095;
pub const ERROR_INVALID_PROFILE_ARB: u32 = 0x2096;

// ── WGL_ARB_pixel_format ──────────────────────────────────────────────────────

pub const WGL_NUMBER_PIXEL_FORMATS_ARB: i32 = 0x2000;
pub const WGL_DRAW_TO_WINDOW_ARB: i32 = 0x2001;
pub const WGL_DRAW_TO_BITMAP_ARB: i32 = 0x2002;
pub const WGL_ACCELERATION_ARB: i32 = 0x2003;
pub const WGL_NEED_PALETTE_ARB: i32 = 0x2004;
pub const WGL_NEED_SYSTEM_PALETTE_ARB: i32 = 0x2005;
pub const WGL_SWAP_LAYER_BUFFERS_ARB: i32 = 0x2006;
pub const WGL_SWAP_METHOD_ARB: i32 = 0x2007;
pub const WGL_NUMBER_OVERLAYS_ARB: i32 = 0x2008;
pub const WGL_NUMBER_UNDERLAYS_ARB: i32 = 0x2009;
pub const WGL_TRANSPARENT_ARB: i32 = 0x200A;
pub const WGL_SHARE_DEPTH_ARB: i32 = 0x200C;
pub const WGL_SHARE_STENCIL_ARB: i32 = 0x200D;
pub const WGL_SHARE_ACCUM_ARB: i32 = 0x200E;
pub const WGL_SUPPORT_GDI_ARB: i32 = 0x200F;
pub const WGL_SUPPORT_OPENGL_ARB: i32 = 0x2010;
pub const WGL_DOUBLE_BUFFER_ARB: i32 = 0x2011;
pub const WGL_STEREO_ARB: i32 = 0x2012;
pub const WGL_PIXEL_TYPE_ARB: i32 = 0x2013;
pub const WGL_COLOR_BITS_ARB: i32 = 0x2014;
pub const WGL_RED_BITS_ARB: i32 = 0x2015;
pub const WGL_RED_SHIFT_ARB: i32 = 0x2016;
pub const WGL_GREEN_BITS_ARB: i32 = 0x2017;
pub const WGL_GREEN_SHIFT_ARB: i32 = 0x2018;
pub const WGL_BLUE_BITS_ARB: i32 = 0x2019;
pub const WGL_BLUE_SHIFT_ARB: i32 = 0x201A;
pub const WGL_ALPHA_BITS_ARB: i32 = 0x201B;
pub const WGL_ALPHA_SHIFT_ARB: i32 = 0x201C;
pub const WGL_ACCUM_BITS_ARB: i32 = 0x201D;
pub const WGL_DEPTH_BITS_ARB: i32 = 0x2022;
pub const WGL_STENCIL_BITS_ARB: i32 = 0x2023;
pub const WGL_AUX_BUFFERS_ARB: i32 = 0x2024;
pub const WGL_NO_ACCELERATION_ARB: i32 = 0x2025;
pub const WGL_GENERIC_ACCELERATION_ARB: i32 = 0x2026;
pub const WGL_FULL_ACCELERATION_ARB: i32 = 0x2027;
pub const WGL_SWAP_EXCHANGE_ARB: i32 = 0x2028;
pub const WGL_SWAP_COPY_ARB: i32 = 0x2029;
pub const WGL_SWAP_UNDEFINED_ARB: i32 = 0x202A;
pub const WGL_TYPE_RGBA_ARB: i32 = 0x202B;
pub const WGL_TYPE_COLORINDEX_ARB: i32 = 0x202C;

// ── WGL_ARB_multisample / WGL_ARB_framebuffer_sRGB ────────────────────────────

pub const WGL_SAMPLE_BUFFERS_ARB: i32 = 0x2041;
pub const WGL_SAMPLES_ARB: i32 = 0x2042;
pub const WGL_FRAMEBUFFER_SRGB_CAPABLE_ARB: i32 = 0x20A9;

/// Which OpenGL profile a context exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextProfile {
    #[default]
    Core,
    Compatibility,
}

/// Parameters for `wglCreateContextAttribsARB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextAttribs {
    pub major: i32,
    pub minor: i32,
    pub profile: ContextProfile,
    pub debug: bool,
    pub forward_compatible: bool,
}

impl Default for ContextAttribs {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            profile: ContextProfile::Core,
            debug: false,
            forward_compatible: false,
        }
    }
}

impl ContextAttribs {
    /// The zero-terminated attribute list.  `WGL_CONTEXT_FLAGS_ARB` is only
    /// emitted when a flag is set.
    pub fn to_attrib_list(&self) -> Vec<i32> {
        let profile_bit = match self.profile {
            ContextProfile::Core => WGL_CONTEXT_CORE_PROFILE_BIT_ARB,
            ContextProfile::Compatibility => WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB,
        };
        let mut list = vec![
            WGL_CONTEXT_MAJOR_VERSION_ARB,
            self.major,
            WGL_CONTEXT_MINOR_VERSION_ARB,
            self.minor,
            WGL_CONTEXT_PROFILE_MASK_ARB,
            profile_bit,
        ];

        let mut flags = 0;
        if self.debug {
            flags |= WGL_CONTEXT_DEBUG_BIT_ARB;
        }
        if self.forward_compatible {
            flags |= WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB;
        }
        if flags != 0 {
            list.extend([WGL_CONTEXT_FLAGS_ARB, flags]);
        }

        list.push(0);
        list
    }
}

/// Requirements for `wglChoosePixelFormatARB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatAttribs {
    pub color_bits: i32,
    pub alpha_bits: i32,
    pub depth_bits: i32,
    pub stencil_bits: i32,
    pub double_buffer: bool,
    /// Multisample count; `0` leaves multisampling out of the request.
    pub samples: i32,
    pub srgb: bool,
}

impl PixelFormatAttribs {
    /// The zero-terminated integer attribute list for an accelerated RGBA
    /// window format.
    pub fn to_attrib_list(&self) -> Vec<i32> {
        let mut list = vec![
            WGL_DRAW_TO_WINDOW_ARB,
            1,
            WGL_SUPPORT_OPENGL_ARB,
            1,
            WGL_DOUBLE_BUFFER_ARB,
            self.double_buffer as i32,
            WGL_ACCELERATION_ARB,
            WGL_FULL_ACCELERATION_ARB,
            WGL_PIXEL_TYPE_ARB,
            WGL_TYPE_RGBA_ARB,
            WGL_COLOR_BITS_ARB,
            self.color_bits,
            WGL_ALPHA_BITS_ARB,
            self.alpha_bits,
            WGL_DEPTH_BITS_ARB,
            self.depth_bits,
            WGL_STENCIL_BITS_ARB,
            self.stencil_bits,
        ];
        if self.samples > 0 {
            list.extend([WGL_SAMPLE_BUFFERS_ARB, 1, WGL_SAMPLES_ARB, self.samples]);
        }
        if self.srgb {
            list.extend([WGL_FRAMEBUFFER_SRGB_CAPABLE_ARB, 1]);
        }
        list.push(0);
        list
    }
}

impl From<&PixelFormatDesc> for PixelFormatAttribs {
    fn from(desc: &PixelFormatDesc) -> Self {
        Self {
            color_bits: desc.color_bits as i32,
            alpha_bits: desc.alpha_bits as i32,
            depth_bits: desc.depth_bits as i32,
            stencil_bits: desc.stencil_bits as i32,
            double_buffer: desc.double_buffer,
            samples: 0,
            srgb: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_attribs_request_3_3_core_without_flags() {
        assert_eq!(
            ContextAttribs::default().to_attrib_list(),
            vec![
                WGL_CONTEXT_MAJOR_VERSION_ARB, 3,
                WGL_CONTEXT_MINOR_VERSION_ARB, 3,
                WGL_CONTEXT_PROFILE_MASK_ARB, WGL_CONTEXT_CORE_PROFILE_BIT_ARB,
                0,
            ]
        );
    }

    #[test]
    fn test_context_flags_are_combined_into_one_pair() {
        let attribs = ContextAttribs {
            debug: true,
            forward_compatible: true,
            ..ContextAttribs::default()
        };
        let list = attribs.to_attrib_list();
        let flags_at = list
            .iter()
            .position(|&value| value == WGL_CONTEXT_FLAGS_ARB)
            .expect("flags pair present");
        assert_eq!(list[flags_at + 1], 0x3);
        assert_eq!(list.last(), Some(&0));
    }

    #[test]
    fn test_pixel_format_attribs_from_descriptor() {
        let attribs = PixelFormatAttribs::from(&PixelFormatDesc::default());
        let list = attribs.to_attrib_list();

        assert_eq!(list.len() % 2, 1, "pairs plus terminator");
        assert_eq!(list.last(), Some(&0));
        let pairs: Vec<(i32, i32)> = list.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
        assert!(pairs.contains(&(WGL_DEPTH_BITS_ARB, 24)));
        assert!(pairs.contains(&(WGL_STENCIL_BITS_ARB, 8)));
        assert!(pairs.contains(&(WGL_DOUBLE_BUFFER_ARB, 1)));
        assert!(!pairs.iter().any(|&(attr, _)| attr == WGL_SAMPLES_ARB));
    }

    #[test]
    fn test_multisample_and_srgb_are_appended_when_requested() {
        let attribs = PixelFormatAttribs {
            samples: 4,
            srgb: true,
            ..PixelFormatAttribs::from(&PixelFormatDesc::default())
        };
        let list = attribs.to_attrib_list();
        let pairs: Vec<(i32, i32)> = list.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
        assert!(pairs.contains(&(WGL_SAMPLES_ARB, 4)));
        assert!(pairs.contains(&(WGL_FRAMEBUFFER_SRGB_CAPABLE_ARB, 1)));
    }
}
