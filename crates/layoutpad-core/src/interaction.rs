//! Drag/resize gesture state machine.
//!
//! A gesture is one pointer-down → move* → pointer-up sequence. The start
//! snapshot is captured once when the gesture begins; every move recomputes the
//! geometry from that snapshot, so nothing accumulates between moves.

use crate::element::{Element, ElementId};
use crate::geometry::{apply_drag, apply_resize, Corner, Geometry};
use kurbo::{Point, Vec2};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A corner handle of the selected element.
    Handle { element: ElementId, corner: Corner },
    /// The body of an element.
    Element(ElementId),
    /// Empty canvas.
    Background,
}

/// Current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving an element.
    Dragging {
        element: ElementId,
        /// Pointer position relative to the element's top-left at grab time.
        offset: Vec2,
    },
    /// Resizing an element from a corner handle.
    Resizing {
        element: ElementId,
        corner: Corner,
        /// Geometry when the handle was grabbed.
        start: Geometry,
        /// Page position of the pointer when the handle was grabbed.
        start_pointer: Point,
    },
}

/// Holds the active gesture and computes geometry updates for it.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    gesture: Gesture,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Element targeted by the active gesture.
    pub fn target(&self) -> Option<ElementId> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { element, .. } | Gesture::Resizing { element, .. } => Some(element),
        }
    }

    /// Start dragging `element`, grabbed at `pointer` (canvas coordinates).
    ///
    /// Returns false (and keeps the current snapshot) if a gesture is active.
    pub fn begin_drag(&mut self, element: &Element, pointer: Point) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.gesture = Gesture::Dragging {
            element: element.id(),
            offset: pointer - element.position,
        };
        true
    }

    /// Start resizing `element` from `corner`, grabbed at `pointer` (page coordinates).
    ///
    /// Returns false (and keeps the current snapshot) if a gesture is active.
    pub fn begin_resize(&mut self, element: &Element, corner: Corner, pointer: Point) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.gesture = Gesture::Resizing {
            element: element.id(),
            corner,
            start: element.geometry(),
            start_pointer: pointer,
        };
        true
    }

    /// Geometry the active gesture gives `element` for a pointer at `page`.
    ///
    /// `canvas_origin` is the canvas's top-left in page coordinates. Returns
    /// `None` while idle or if `element` is not the gesture's target.
    pub fn track(&self, element: &Element, page: Point, canvas_origin: Point) -> Option<Geometry> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { element: id, offset } => {
                if id != element.id() {
                    return None;
                }
                let pointer = page - canvas_origin;
                let mut geometry = element.geometry();
                geometry.position = apply_drag(Point::ZERO, pointer - offset);
                Some(geometry)
            }
            Gesture::Resizing {
                element: id,
                corner,
                start,
                start_pointer,
            } => {
                if id != element.id() {
                    return None;
                }
                Some(apply_resize(corner, start, page - start_pointer))
            }
        }
    }

    /// End the gesture, returning the element it was acting on.
    pub fn finish(&mut self) -> Option<ElementId> {
        let target = self.target();
        self.gesture = Gesture::Idle;
        target
    }
}
