//! Widget manager for tracking the selection.

use super::state::WidgetState;
use crate::element::ElementId;

/// Tracks which element (if any) is selected.
///
/// This separates UI concerns from the element data. Only one element can be
/// selected at a time; selecting another implicitly deselects the previous one.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    selected: Option<ElementId>,
}

impl WidgetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of an element.
    pub fn state(&self, id: ElementId) -> WidgetState {
        if self.is_selected(id) {
            WidgetState::Selected
        } else {
            WidgetState::Normal
        }
    }

    /// Check if an element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    /// The selected element, if any.
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Select an element, replacing any previous selection.
    /// Returns the previously selected element.
    pub fn select(&mut self, id: ElementId) -> Option<ElementId> {
        self.selected.replace(id)
    }

    /// Clear the selection. Returns the element that was selected.
    pub fn deselect(&mut self) -> Option<ElementId> {
        self.selected.take()
    }
}
