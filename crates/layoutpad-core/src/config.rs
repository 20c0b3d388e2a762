//! Editor configuration.

use crate::geometry::Geometry;
use crate::widget::HANDLE_HIT_TOLERANCE;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Key under which the layout is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "layout";
/// File name offered for the JSON export.
pub const DEFAULT_JSON_EXPORT_NAME: &str = "design.json";
/// File name offered for the markup export.
pub const DEFAULT_MARKUP_EXPORT_NAME: &str = "design.html";

/// Editor settings. Missing fields fall back to their defaults when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Design size of the canvas (also the markup export container size).
    pub canvas_size: Size,
    /// Key-value key holding the persisted layout.
    pub storage_key: String,
    /// Hit radius of resize handles, in canvas pixels.
    pub handle_tolerance: f64,
    /// Geometry of newly added elements.
    pub new_element: Geometry,
    pub json_export_name: String,
    pub markup_export_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(800.0, 500.0),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            handle_tolerance: HANDLE_HIT_TOLERANCE,
            new_element: Geometry {
                position: Point::new(50.0, 50.0),
                size: Size::new(120.0, 80.0),
            },
            json_export_name: DEFAULT_JSON_EXPORT_NAME.to_string(),
            markup_export_name: DEFAULT_MARKUP_EXPORT_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
