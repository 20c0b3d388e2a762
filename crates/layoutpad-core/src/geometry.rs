//! Geometry rules for moving and resizing elements.
//!
//! Everything here is pure: the functions take a captured start geometry and a
//! pointer delta and return the new geometry. Nothing is clamped, so widths and
//! heights may go to zero or negative when a handle is dragged past the opposite
//! corner.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions of an element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All four corners, in handle order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Self {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Short tag used for handle class names (`tl`, `tr`, `bl`, `br`).
    pub fn tag(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }
}

/// Position and size of an element, as captured at gesture start.
///
/// Unlike [`Rect`], the size is kept signed: a negative width means the box
/// extends to the left of `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Top-left corner.
    pub position: Point,
    /// Width and height, possibly zero or negative.
    pub size: Size,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Screen-space location of a corner.
    pub fn corner_point(&self, corner: Corner) -> Point {
        let Point { x, y } = self.position;
        let Size { width, height } = self.size;
        match corner {
            Corner::TopLeft => Point::new(x, y),
            Corner::TopRight => Point::new(x + width, y),
            Corner::BottomLeft => Point::new(x, y + height),
            Corner::BottomRight => Point::new(x + width, y + height),
        }
    }

    /// Center of the box, the pivot for rotation.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Normalized bounding rectangle (positive extent even for negative sizes).
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.position, self.corner_point(Corner::BottomRight))
    }
}

/// Move an element: the new position is `origin + delta`.
pub fn apply_drag(origin: Point, delta: Vec2) -> Point {
    origin + delta
}

/// Resize from a corner handle, keeping the opposite corner fixed.
///
/// `delta` is always measured from the pointer position at gesture start, never
/// accumulated between moves.
pub fn apply_resize(corner: Corner, start: Geometry, delta: Vec2) -> Geometry {
    let Point { x, y } = start.position;
    let Size { width, height } = start.size;
    let (dx, dy) = (delta.x, delta.y);

    match corner {
        Corner::BottomRight => Geometry::new(x, y, width + dx, height + dy),
        Corner::TopRight => Geometry::new(x, y + dy, width + dx, height - dy),
        Corner::BottomLeft => Geometry::new(x + dx, y, width - dx, height + dy),
        Corner::TopLeft => Geometry::new(x + dx, y + dy, width - dx, height - dy),
    }
}

/// Visual transform of an element: rotation in degrees about its own center.
///
/// Rotation never touches the stored position or size; it only affects how the
/// box is painted and hit-tested.
pub fn visual_transform(geometry: &Geometry, rotation_degrees: f64) -> Affine {
    Affine::rotate_about(rotation_degrees.to_radians(), geometry.center())
}
