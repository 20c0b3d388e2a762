//! Corner handles for resizing the selected element.

use crate::element::Element;
use crate::geometry::Corner;
use kurbo::Point;

/// Handle size in canvas pixels (as painted by the shell).
pub const HANDLE_SIZE: f64 = 10.0;
/// Default handle hit radius in canvas pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// A resize handle with its painted position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Which corner this handle drags.
    pub corner: Corner,
    /// Position in canvas coordinates, after rotation.
    pub position: Point,
}

impl Handle {
    pub fn new(corner: Corner, position: Point) -> Self {
        Self { corner, position }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The four corner handles of an element, rotated with it.
pub fn element_handles(element: &Element) -> [Handle; 4] {
    let geometry = element.geometry();
    let transform = element.visual_transform();
    Corner::ALL.map(|corner| Handle::new(corner, transform * geometry.corner_point(corner)))
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<Corner> {
    element_handles(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.corner)
}
