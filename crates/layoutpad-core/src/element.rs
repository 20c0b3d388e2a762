//! Element definitions for the layout canvas.

use crate::geometry::{self, Geometry};
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
///
/// Time-ordered (UUID v7), so ids created later compare greater.
pub type ElementId = Uuid;

/// Fill used for new rectangles.
pub const DEFAULT_RECT_FILL: &str = "#ccc";
/// Fill used for new text elements.
pub const DEFAULT_TEXT_FILL: &str = "transparent";
/// Content of a freshly added text element.
pub const DEFAULT_TEXT_CONTENT: &str = "Text";

/// The kinds of element the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Text,
}

impl ElementKind {
    /// Prefix of generated labels (`rect 1`, `text 2`).
    pub fn label_prefix(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rect",
            ElementKind::Text => "text",
        }
    }

    pub fn default_fill(self) -> &'static str {
        match self {
            ElementKind::Rectangle => DEFAULT_RECT_FILL,
            ElementKind::Text => DEFAULT_TEXT_FILL,
        }
    }

    pub fn default_text(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "",
            ElementKind::Text => DEFAULT_TEXT_CONTENT,
        }
    }

    /// Human-readable name for menus and logs.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "Rectangle",
            ElementKind::Text => "Text",
        }
    }
}

/// A single edit coming from the property panel.
///
/// Position and kind are deliberately absent: they change only through
/// interaction or creation.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Width(f64),
    Height(f64),
    Fill(String),
    Text(String),
    /// Rotation in degrees.
    Rotation(f64),
}

/// A positioned, sized, styled box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub(crate) id: ElementId,
    /// Display label, fixed at creation.
    pub label: String,
    pub kind: ElementKind,
    /// Top-left corner, serialized as flat `x`/`y` fields.
    #[serde(flatten)]
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees about the center.
    pub rotation: f64,
    /// CSS color string.
    pub fill: String,
    /// Text content (only rendered for text elements).
    pub text: String,
    /// Stacking key. Not unique, not contiguous.
    pub z_order: i64,
}

impl Element {
    /// Create an element of `kind` with its default fill and text.
    pub fn new(kind: ElementKind, label: impl Into<String>, geometry: Geometry, z_order: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            label: label.into(),
            kind,
            position: geometry.position,
            width: geometry.size.width,
            height: geometry.size.height,
            rotation: 0.0,
            fill: kind.default_fill().to_string(),
            text: kind.default_text().to_string(),
            z_order,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn is_text(&self) -> bool {
        self.kind == ElementKind::Text
    }

    /// Current position and size.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            position: self.position,
            size: Size::new(self.width, self.height),
        }
    }

    /// Replace position and size in one step.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.position = geometry.position;
        self.width = geometry.size.width;
        self.height = geometry.size.height;
    }

    /// Unrotated bounding box.
    pub fn bounds(&self) -> Rect {
        self.geometry().bounds()
    }

    /// Paint transform (rotation about the center).
    pub fn visual_transform(&self) -> Affine {
        geometry::visual_transform(&self.geometry(), self.rotation)
    }

    /// Check if a canvas point lands on the painted (rotated) box.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.visual_transform().inverse() * point;
        self.bounds().contains(local)
    }

    /// Apply a property panel edit.
    pub fn apply_edit(&mut self, edit: PropertyEdit) {
        match edit {
            PropertyEdit::Width(width) => self.width = width,
            PropertyEdit::Height(height) => self.height = height,
            PropertyEdit::Fill(fill) => self.fill = fill,
            PropertyEdit::Text(text) => self.text = text,
            PropertyEdit::Rotation(rotation) => self.rotation = rotation,
        }
    }

    /// Text that ends up inside the painted box.
    pub fn display_text(&self) -> &str {
        match self.kind {
            ElementKind::Text => &self.text,
            ElementKind::Rectangle => "",
        }
    }
}
