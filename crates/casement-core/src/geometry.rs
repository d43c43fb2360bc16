//! Screen-space geometry and the whole-window / content frame conversion.
//!
//! # Two coordinate frames (for beginners)
//!
//! A top-level window has an *outer* rectangle (everything the OS moves and
//! resizes, including title bar and borders) and a *content* or *client*
//! rectangle (the part the application draws into).  For a decorated window
//! the content sits inside the outer rectangle, offset by the border and
//! title bar thickness.  For an undecorated window the two coincide.
//!
//! The thickness depends on the OS version, theme and DPI, so it is never
//! hard-coded.  The backend asks the OS "how large must the outer rectangle
//! be for this style to give a zero-sized client?" and wraps the answer in
//! [`FrameInsets`].  Every conversion then goes through that one value,
//! which keeps set-then-get round trips pixel exact.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for geometry constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Width and height must both be greater than zero.
    #[error("size {width}x{height} is not positive")]
    NonPositiveSize { width: i32, height: i32 },
}

/// A point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Creates a size, rejecting zero or negative dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonPositiveSize`] if either dimension is `<= 0`.
    pub fn positive(width: i32, height: i32) -> Result<Self, GeometryError> {
        if width > 0 && height > 0 {
            Ok(Self { width, height })
        } else {
            Err(GeometryError::NonPositiveSize { width, height })
        }
    }
}

/// An edge-based rectangle, `right` and `bottom` exclusive (Win32 `RECT`
/// convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Builds a rectangle from its origin and size.
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x.saturating_add(size.width),
            bottom: origin.y.saturating_add(size.height),
        }
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns `true` for rectangles with no area.  A minimised window can
    /// report such a rectangle.
    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Returns `true` if `point` lies inside (right/bottom exclusive).
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Returns the same rectangle moved by `(dx, dy)`, clamped to the `i32`
    /// range.
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.saturating_add(dx),
            self.top.saturating_add(dy),
            self.right.saturating_add(dx),
            self.bottom.saturating_add(dy),
        )
    }
}

/// Thickness of the non-client frame on each side of a window.
///
/// All values are non-negative distances.  [`FrameInsets::NONE`] describes
/// an undecorated window whose content fills the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameInsets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FrameInsets {
    /// No frame: outer and content rectangles coincide.
    pub const NONE: FrameInsets = FrameInsets::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Derives the insets from the rectangle the OS returns when asked to
    /// grow [`Rect::ZERO`] into a full window rectangle for a style
    /// (`AdjustWindowRectEx` on Windows).  Such a rectangle extends to
    /// negative coordinates on the left/top.
    pub const fn from_adjusted_zero(adjusted: Rect) -> Self {
        Self {
            left: adjusted.left.saturating_neg(),
            top: adjusted.top.saturating_neg(),
            right: adjusted.right,
            bottom: adjusted.bottom,
        }
    }

    /// Total horizontal frame thickness.
    pub const fn horizontal(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical frame thickness.
    pub const fn vertical(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }

    /// Outer window size that yields exactly `content` as client size.
    /// Saturates at `i32::MAX` instead of wrapping.
    pub const fn outer_size(&self, content: Size) -> Size {
        Size::new(
            content.width.saturating_add(self.horizontal()),
            content.height.saturating_add(self.vertical()),
        )
    }

    /// Client size contained in a window of `outer` size.  Never negative.
    pub fn content_size(&self, outer: Size) -> Size {
        Size::new(
            outer.width.saturating_sub(self.horizontal()).max(0),
            outer.height.saturating_sub(self.vertical()).max(0),
        )
    }

    /// Outer window origin that places the client origin at `content`.
    pub const fn outer_origin(&self, content: Point) -> Point {
        Point::new(content.x.saturating_sub(self.left), content.y.saturating_sub(self.top))
    }

    /// Client origin of a window whose outer origin is `outer`.
    pub const fn content_origin(&self, outer: Point) -> Point {
        Point::new(outer.x.saturating_add(self.left), outer.y.saturating_add(self.top))
    }

    /// Client rectangle inside the outer rectangle `outer`.
    pub fn content_rect(&self, outer: Rect) -> Rect {
        Rect::from_origin_size(
            self.content_origin(outer.origin()),
            self.content_size(outer.size()),
        )
    }

    /// Outer rectangle around the client rectangle `content`.
    pub const fn outer_rect(&self, content: Rect) -> Rect {
        Rect::new(
            content.left.saturating_sub(self.left),
            content.top.saturating_sub(self.top),
            content.right.saturating_add(self.right),
            content.bottom.saturating_add(self.bottom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Typical Windows 10 frame for the fixed style mask at 100% DPI.
    const THEMED: FrameInsets = FrameInsets::new(8, 31, 8, 8);

    #[test]
    fn test_from_adjusted_zero_negates_leading_edges() {
        let insets = FrameInsets::from_adjusted_zero(Rect::new(-8, -31, 8, 8));
        assert_eq!(insets, THEMED);
    }

    #[test]
    fn test_outer_size_adds_both_sides() {
        assert_eq!(THEMED.outer_size(Size::new(800, 600)), Size::new(816, 639));
    }

    #[test]
    fn test_content_size_inverts_outer_size() {
        let content = Size::new(1024, 768);
        assert_eq!(THEMED.content_size(THEMED.outer_size(content)), content);
    }

    #[test]
    fn test_content_size_clamps_at_zero_for_tiny_windows() {
        assert_eq!(THEMED.content_size(Size::new(4, 4)), Size::new(0, 0));
    }

    #[test]
    fn test_outer_origin_inverts_content_origin() {
        let content = Point::new(100, 200);
        let outer = THEMED.outer_origin(content);
        assert_eq!(outer, Point::new(92, 169));
        assert_eq!(THEMED.content_origin(outer), content);
    }

    #[test]
    fn test_outer_rect_and_content_rect_are_inverse() {
        let content = Rect::new(50, 60, 850, 660);
        assert_eq!(THEMED.content_rect(THEMED.outer_rect(content)), content);
    }

    #[test]
    fn test_no_insets_is_identity() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(FrameInsets::NONE.content_rect(rect), rect);
        assert_eq!(FrameInsets::NONE.outer_size(rect.size()), rect.size());
    }

    #[test]
    fn test_size_positive_rejects_zero_and_negative() {
        assert!(Size::positive(1, 1).is_ok());
        assert_eq!(
            Size::positive(0, 10),
            Err(GeometryError::NonPositiveSize { width: 0, height: 10 })
        );
        assert!(Size::positive(10, -1).is_err());
    }

    #[test]
    fn test_rect_contains_is_right_bottom_exclusive() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(9, 9)));
        assert!(!rect.contains(Point::new(10, 5)));
        assert!(!rect.contains(Point::new(5, 10)));
    }

    #[test]
    fn test_outer_size_saturates_instead_of_overflowing() {
        let huge = Size::new(i32::MAX, i32::MAX - 10);

        let outer = THEMED.outer_size(huge);

        assert_eq!(outer, Size::new(i32::MAX, i32::MAX));
    }

    #[test]
    fn test_rect_arithmetic_clamps_at_the_i32_range() {
        // Arrange
        let origin = Point::new(i32::MAX - 5, i32::MIN + 5);

        // Act
        let rect = Rect::from_origin_size(origin, Size::new(100, 100));
        let moved = Rect::new(0, 0, 10, 10).offset(i32::MIN, i32::MAX);

        // Assert
        assert_eq!(rect.right, i32::MAX);
        assert_eq!(rect.bottom, i32::MIN + 105);
        assert_eq!(moved, Rect::new(i32::MIN, i32::MAX, i32::MIN + 10, i32::MAX));
        assert_eq!(Rect::new(i32::MIN, 0, i32::MAX, 1).width(), i32::MAX);
    }

    #[test]
    fn test_degenerate_rect_is_empty() {
        assert!(Rect::ZERO.is_empty());
        assert!(Rect::new(-32000, -32000, -32000, -32000).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }
}
