//! Layout document: the ordered collection of elements.

use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::Geometry;
use kurbo::Point;
use std::collections::HashSet;
use thiserror::Error;

/// Errors while reading a persisted layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Malformed layout: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Duplicate element id: {0}")]
    DuplicateId(ElementId),
}

/// Result type for layout serialization.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// All elements of a layout, in insertion order.
///
/// Insertion order is the persisted order and the paint tie-break; stacking is
/// governed by each element's `z_order`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDocument {
    elements: Vec<Element>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from elements, rejecting duplicate ids.
    pub fn from_elements(elements: Vec<Element>) -> LayoutResult<Self> {
        let mut seen = HashSet::with_capacity(elements.len());
        for element in &elements {
            if !seen.insert(element.id) {
                return Err(LayoutError::DuplicateId(element.id));
            }
        }
        Ok(Self { elements })
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Label for the next element of `kind`: its prefix plus the ordinal among
    /// elements of the same kind.
    pub fn next_label(&self, kind: ElementKind) -> String {
        let count = self.elements.iter().filter(|e| e.kind == kind).count();
        format!("{} {}", kind.label_prefix(), count + 1)
    }

    /// Append a new element of `kind` on top of the stack.
    ///
    /// Its `z_order` is the element count before insertion.
    pub fn add_element(&mut self, kind: ElementKind, geometry: Geometry) -> ElementId {
        let label = self.next_label(kind);
        let z_order = self.elements.len() as i64;
        let element = Element::new(kind, label, geometry, z_order);
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Move an element one step up the stack.
    /// Returns false if the element does not exist.
    pub fn raise(&mut self, id: ElementId) -> bool {
        self.shift_z_order(id, 1)
    }

    /// Move an element one step down the stack.
    /// Returns false if the element does not exist.
    pub fn lower(&mut self, id: ElementId) -> bool {
        self.shift_z_order(id, -1)
    }

    fn shift_z_order(&mut self, id: ElementId, step: i64) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.z_order += step;
                true
            }
            None => false,
        }
    }

    /// Elements for the layer panel: highest `z_order` first.
    ///
    /// Equal keys keep insertion order.
    pub fn layer_list(&self) -> Vec<&Element> {
        let mut layers: Vec<&Element> = self.elements.iter().collect();
        layers.sort_by(|a, b| b.z_order.cmp(&a.z_order));
        layers
    }

    /// Elements in paint order (back to front): ascending `z_order`, equal
    /// keys in insertion order so later elements paint on top.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_order);
        ordered
    }

    /// Topmost element whose painted box contains `point` (canvas coordinates).
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|e| e.contains(point))
            .map(|e| e.id)
    }

    /// Serialize to the compact persisted form (an array in insertion order).
    pub fn to_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string(&self.elements)?)
    }

    /// Serialize to the pretty-printed export form.
    pub fn to_json_pretty(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(&self.elements)?)
    }

    /// Deserialize a persisted layout.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let elements: Vec<Element> = serde_json::from_str(json)?;
        Self::from_elements(elements)
    }
}
