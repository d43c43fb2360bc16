//! Integration tests for the content/window frame conversion.
//!
//! These exercise the public API the way a platform backend does: derive
//! insets from an OS-adjusted zero rectangle, then convert sizes and origins
//! in both directions.

use casement_core::{FrameInsets, Point, Rect, Size};

/// Frames seen on real systems: classic, Windows 10 at 100% and 150% DPI,
/// and a thin custom theme.
const ADJUSTED_ZERO_RECTS: &[Rect] = &[
    Rect::new(-4, -23, 4, 4),
    Rect::new(-8, -31, 8, 8),
    Rect::new(-11, -45, 11, 11),
    Rect::new(-1, -1, 1, 1),
];

#[test]
fn test_content_size_round_trip_is_exact_for_every_frame() {
    for &adjusted in ADJUSTED_ZERO_RECTS {
        let insets = FrameInsets::from_adjusted_zero(adjusted);
        for content in [Size::new(1, 1), Size::new(640, 480), Size::new(2560, 1440)] {
            let outer = insets.outer_size(content);
            assert_eq!(
                insets.content_size(outer),
                content,
                "round trip failed for {content:?} with {insets:?}"
            );
        }
    }
}

#[test]
fn test_content_position_round_trip_is_exact_for_every_frame() {
    for &adjusted in ADJUSTED_ZERO_RECTS {
        let insets = FrameInsets::from_adjusted_zero(adjusted);
        for content in [Point::new(0, 0), Point::new(-1920, 40), Point::new(300, 200)] {
            let outer = insets.outer_origin(content);
            assert_eq!(insets.content_origin(outer), content);
        }
    }
}

#[test]
fn test_adjusted_zero_rect_matches_outer_rect_of_empty_content() {
    for &adjusted in ADJUSTED_ZERO_RECTS {
        let insets = FrameInsets::from_adjusted_zero(adjusted);
        assert_eq!(insets.outer_rect(Rect::ZERO), adjusted);
    }
}
