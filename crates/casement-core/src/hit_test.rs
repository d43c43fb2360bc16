//! Hit-testing for undecorated windows.
//!
//! # What is hit-testing? (for beginners)
//!
//! When the OS draws a window's chrome it knows that dragging the title bar
//! moves the window and dragging a border resizes it.  An undecorated window
//! draws its own chrome, so the OS has to ask the application what lies under
//! the cursor.  The answer is a [`HitRegion`]: an edge, a corner, the title
//! bar, one of the caption buttons, the client area, or nowhere.  The backend
//! converts the region into the OS hit-test code, and the OS then performs
//! the matching move/resize/button behaviour itself.
//!
//! Applications can answer the question with a hit-test callback.  Without
//! one, [`border_hit_test`] gives undecorated windows resizable edges and
//! corners of a fixed thickness and treats everything else as client area.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Thickness in pixels of the resize band used by [`border_hit_test`].
pub const DEFAULT_BORDER_WIDTH: i32 = 8;

/// A named region of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitRegion {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// The application's content.
    Client,
    /// Drag to move; double-click to maximise.
    Titlebar,
    MinimizeButton,
    MaximizeButton,
    CloseButton,
    /// Not part of the window (clicks pass through to the OS default).
    Nowhere,
}

bitflags! {
    /// Which resize bands a point falls into.  The four comparisons are made
    /// independently, so a point can be in two bands (a corner) or, for
    /// windows narrower than two bands, in opposing ones.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RegionMask: u8 {
        const LEFT = 1;
        const RIGHT = 2;
        const TOP = 4;
        const BOTTOM = 8;
    }
}

impl RegionMask {
    /// Computes the mask of `point` against `window` with bands of
    /// `border` pixels.
    pub fn of(point: Point, window: Rect, border: i32) -> Self {
        let mut mask = RegionMask::empty();
        mask.set(RegionMask::LEFT, point.x < window.left + border);
        mask.set(RegionMask::RIGHT, point.x >= window.right - border);
        mask.set(RegionMask::TOP, point.y < window.top + border);
        mask.set(RegionMask::BOTTOM, point.y >= window.bottom - border);
        mask
    }

    /// Maps the exact mask value onto a region.  Combinations that cannot
    /// describe a single edge or corner map to [`HitRegion::Nowhere`].
    pub fn region(self) -> HitRegion {
        const LEFT: u8 = RegionMask::LEFT.bits();
        const RIGHT: u8 = RegionMask::RIGHT.bits();
        const TOP: u8 = RegionMask::TOP.bits();
        const BOTTOM: u8 = RegionMask::BOTTOM.bits();

        match self.bits() {
            0 => HitRegion::Client,
            LEFT => HitRegion::Left,
            RIGHT => HitRegion::Right,
            TOP => HitRegion::Top,
            BOTTOM => HitRegion::Bottom,
            m if m == TOP | LEFT => HitRegion::TopLeft,
            m if m == TOP | RIGHT => HitRegion::TopRight,
            m if m == BOTTOM | LEFT => HitRegion::BottomLeft,
            m if m == BOTTOM | RIGHT => HitRegion::BottomRight,
            _ => HitRegion::Nowhere,
        }
    }
}

/// Classifies `point` (screen space) against the window rectangle `window`
/// (screen space) using resize bands `border` pixels thick.
pub fn border_hit_test(point: Point, window: Rect, border: i32) -> HitRegion {
    RegionMask::of(point, window, border).region()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Rect = Rect::new(0, 0, 800, 600);

    fn hit(x: i32, y: i32) -> HitRegion {
        border_hit_test(Point::new(x, y), WINDOW, DEFAULT_BORDER_WIDTH)
    }

    #[test]
    fn test_reference_points_on_800x600() {
        assert_eq!(hit(4, 4), HitRegion::TopLeft);
        assert_eq!(hit(400, 4), HitRegion::Top);
        assert_eq!(hit(796, 300), HitRegion::Right);
        assert_eq!(hit(400, 596), HitRegion::Bottom);
        assert_eq!(hit(400, 300), HitRegion::Client);
    }

    #[test]
    fn test_remaining_edges_and_corners() {
        assert_eq!(hit(2, 300), HitRegion::Left);
        assert_eq!(hit(799, 0), HitRegion::TopRight);
        assert_eq!(hit(0, 599), HitRegion::BottomLeft);
        assert_eq!(hit(799, 599), HitRegion::BottomRight);
    }

    #[test]
    fn test_band_boundaries() {
        // left band is x < 8, right band is x >= 792
        assert_eq!(hit(7, 300), HitRegion::Left);
        assert_eq!(hit(8, 300), HitRegion::Client);
        assert_eq!(hit(791, 300), HitRegion::Client);
        assert_eq!(hit(792, 300), HitRegion::Right);
    }

    #[test]
    fn test_offset_window_uses_screen_coordinates() {
        let window = WINDOW.offset(1000, 500);
        assert_eq!(
            border_hit_test(Point::new(1004, 504), window, DEFAULT_BORDER_WIDTH),
            HitRegion::TopLeft
        );
        assert_eq!(
            border_hit_test(Point::new(4, 4), window, DEFAULT_BORDER_WIDTH),
            HitRegion::TopLeft,
            "points left of and above the window still fall in the leading bands"
        );
    }

    #[test]
    fn test_opposing_bands_map_to_nowhere() {
        // A window narrower than two bands puts every x in both LEFT and RIGHT.
        let narrow = Rect::new(0, 0, 10, 600);
        assert_eq!(
            border_hit_test(Point::new(5, 300), narrow, DEFAULT_BORDER_WIDTH),
            HitRegion::Nowhere
        );
    }

    #[test]
    fn test_zero_border_makes_everything_client() {
        assert_eq!(border_hit_test(Point::new(0, 0), WINDOW, 0), HitRegion::Client);
    }

    #[test]
    fn test_mask_of_corner_sets_two_bits() {
        let mask = RegionMask::of(Point::new(4, 4), WINDOW, DEFAULT_BORDER_WIDTH);
        assert_eq!(mask, RegionMask::TOP | RegionMask::LEFT);
    }
}
