//! Property panel and layer list models.
//!
//! The panel reads everything it shows from these structs and turns raw form
//! strings back into [`PropertyEdit`]s. Invalid input stops here and never
//! reaches the document.

use layoutpad_core::{Editor, Element, ElementId, ElementKind, KeyValueStore, PropertyEdit};
use thiserror::Error;

/// Form input that could not become a property edit.
#[derive(Debug, Error, PartialEq)]
pub enum PanelError {
    #[error("Unknown property field: {0}")]
    UnknownField(String),
    #[error("{field} needs a value")]
    Empty { field: &'static str },
    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
}

/// Values shown in the property panel for the selected element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedElementProps {
    /// Is an element selected?
    pub has_selection: bool,
    /// Is the selected element a text element? Controls the text input.
    pub is_text: bool,
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub text: String,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl SelectedElementProps {
    /// Create from the selected element, or an empty panel if none.
    pub fn from_selection(element: Option<&Element>) -> Self {
        match element {
            Some(element) => Self::from_element(element),
            None => Self::default(),
        }
    }

    pub fn from_element(element: &Element) -> Self {
        Self {
            has_selection: true,
            is_text: element.kind == ElementKind::Text,
            label: element.label.clone(),
            width: element.width,
            height: element.height,
            fill: element.fill.clone(),
            text: element.text.clone(),
            rotation: element.rotation,
        }
    }
}

/// An editable panel field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyField {
    Width,
    Height,
    Fill,
    Text,
    Rotation,
}

impl PropertyField {
    pub const ALL: [PropertyField; 5] = [
        PropertyField::Width,
        PropertyField::Height,
        PropertyField::Fill,
        PropertyField::Text,
        PropertyField::Rotation,
    ];

    /// DOM id of the input bound to this field.
    pub fn input_id(self) -> &'static str {
        match self {
            PropertyField::Width => "width",
            PropertyField::Height => "height",
            PropertyField::Fill => "bg",
            PropertyField::Text => "text",
            PropertyField::Rotation => "rotate",
        }
    }

    pub fn from_input_id(id: &str) -> Result<Self, PanelError> {
        Self::ALL
            .into_iter()
            .find(|field| field.input_id() == id)
            .ok_or_else(|| PanelError::UnknownField(id.to_string()))
    }

    /// Current value of this field as the form shows it.
    pub fn display_value(self, props: &SelectedElementProps) -> String {
        match self {
            PropertyField::Width => props.width.to_string(),
            PropertyField::Height => props.height.to_string(),
            PropertyField::Fill => props.fill.clone(),
            PropertyField::Text => props.text.clone(),
            PropertyField::Rotation => props.rotation.to_string(),
        }
    }

    /// Turn raw form input into an edit.
    ///
    /// Numeric fields accept any finite number, negative included. Text is
    /// taken as typed, empty included.
    pub fn parse(self, raw: &str) -> Result<PropertyEdit, PanelError> {
        match self {
            PropertyField::Width => parse_number("width", raw).map(PropertyEdit::Width),
            PropertyField::Height => parse_number("height", raw).map(PropertyEdit::Height),
            PropertyField::Rotation => parse_number("rotation", raw).map(PropertyEdit::Rotation),
            PropertyField::Fill => Ok(PropertyEdit::Fill(raw.trim().to_string())),
            PropertyField::Text => Ok(PropertyEdit::Text(raw.to_string())),
        }
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, PanelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PanelError::Empty { field });
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PanelError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow {
    pub id: ElementId,
    pub label: String,
    pub selected: bool,
}

/// Layer list rows, highest `z_order` first.
pub fn layer_rows<S: KeyValueStore>(editor: &Editor<S>) -> Vec<LayerRow> {
    let selected = editor.selected();
    editor
        .layer_list()
        .into_iter()
        .map(|element| LayerRow {
            id: element.id(),
            label: element.label.clone(),
            selected: selected == Some(element.id()),
        })
        .collect()
}
