//! Editor context: document, selection, active gesture and persistence.
//!
//! The rendering shell forwards raw pointer events and panel actions here and
//! repaints from the returned [`EditorResponse`]. No state lives outside this
//! struct, so the whole editor can be driven without a rendering surface.

use crate::config::EditorConfig;
use crate::document::{LayoutDocument, LayoutResult};
use crate::element::{Element, ElementId, ElementKind, PropertyEdit};
use crate::export;
use crate::input::{MouseButton, PointerEvent};
use crate::interaction::{Gesture, HitTarget, Interaction};
use crate::storage::{KeyValueStore, LayoutPersistence};
use crate::widget::{hit_test_handles, WidgetManager, WidgetState};
use kurbo::Point;

/// What the shell has to refresh after an editor call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorResponse {
    /// Newly created element that needs a painted node.
    pub added: Option<ElementId>,
    /// Element whose painted node must be restyled.
    pub repaint: Option<ElementId>,
    /// Selection highlight and property panel need a refresh.
    pub selection_changed: bool,
    /// Layer list needs a refresh.
    pub layers_changed: bool,
    /// The layout was written to storage.
    pub persisted: bool,
}

/// The layout editor.
pub struct Editor<S: KeyValueStore> {
    document: LayoutDocument,
    widgets: WidgetManager,
    interaction: Interaction,
    persistence: LayoutPersistence<S>,
    config: EditorConfig,
    /// Canvas top-left in page coordinates.
    canvas_origin: Point,
}

impl<S: KeyValueStore> Editor<S> {
    /// Open the editor on the layout persisted in `store`.
    ///
    /// A missing or unreadable layout yields an empty document. An unreadable
    /// one is backed up before the first save replaces it.
    pub fn open(store: S, config: EditorConfig) -> Self {
        let mut persistence = LayoutPersistence::new(store, config.storage_key.clone());
        let document = persistence.load();
        Self {
            document,
            widgets: WidgetManager::new(),
            interaction: Interaction::new(),
            persistence,
            config,
            canvas_origin: Point::ZERO,
        }
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn persistence(&self) -> &LayoutPersistence<S> {
        &self.persistence
    }

    pub fn gesture(&self) -> &Gesture {
        self.interaction.gesture()
    }

    pub fn canvas_origin(&self) -> Point {
        self.canvas_origin
    }

    /// Update where the canvas sits on the page.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    // --- Selection & z-order -------------------------------------------------

    pub fn selected(&self) -> Option<ElementId> {
        self.widgets.selected()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected().and_then(|id| self.document.get(id))
    }

    pub fn widget_state(&self, id: ElementId) -> WidgetState {
        self.widgets.state(id)
    }

    /// Select an element, replacing the previous selection.
    pub fn select(&mut self, id: ElementId) -> EditorResponse {
        if self.document.get(id).is_none() {
            return EditorResponse::default();
        }
        let changed = self.widgets.select(id) != Some(id);
        EditorResponse {
            selection_changed: changed,
            layers_changed: changed,
            ..Default::default()
        }
    }

    /// Clear the selection. No-op if nothing is selected.
    pub fn deselect(&mut self) -> EditorResponse {
        let changed = self.widgets.deselect().is_some();
        EditorResponse {
            selection_changed: changed,
            layers_changed: changed,
            ..Default::default()
        }
    }

    /// Move the selected element one step up the stack.
    pub fn raise(&mut self) -> EditorResponse {
        self.shift_selected(LayoutDocument::raise)
    }

    /// Move the selected element one step down the stack.
    pub fn lower(&mut self) -> EditorResponse {
        self.shift_selected(LayoutDocument::lower)
    }

    fn shift_selected(&mut self, shift: fn(&mut LayoutDocument, ElementId) -> bool) -> EditorResponse {
        let Some(id) = self.selected() else {
            return EditorResponse::default();
        };
        if !shift(&mut self.document, id) {
            return EditorResponse::default();
        }
        EditorResponse {
            repaint: Some(id),
            layers_changed: true,
            persisted: self.persist(),
            ..Default::default()
        }
    }

    /// Elements for the layer panel, highest `z_order` first.
    pub fn layer_list(&self) -> Vec<&Element> {
        self.document.layer_list()
    }

    // --- Document edits ------------------------------------------------------

    /// Add an element of `kind` with the configured default geometry, on top of
    /// the stack, and select it.
    pub fn add_element(&mut self, kind: ElementKind) -> EditorResponse {
        let id = self.document.add_element(kind, self.config.new_element);
        self.widgets.select(id);
        log::debug!("Added {} {}", kind.name(), id);
        EditorResponse {
            added: Some(id),
            repaint: Some(id),
            selection_changed: true,
            layers_changed: true,
            persisted: self.persist(),
        }
    }

    /// Apply a property panel edit to the selected element.
    ///
    /// Values are stored as given; validating them is the panel's job.
    pub fn update_property(&mut self, edit: PropertyEdit) -> EditorResponse {
        let Some(element) = self.selected().and_then(|id| self.document.get_mut(id)) else {
            return EditorResponse::default();
        };
        element.apply_edit(edit);
        let id = element.id();
        EditorResponse {
            repaint: Some(id),
            persisted: self.persist(),
            ..Default::default()
        }
    }

    // --- Pointer interaction -------------------------------------------------

    /// Resolve what a page position lands on: a handle of the selected element,
    /// then the topmost element body, else the background.
    pub fn hit_test(&self, page: Point) -> HitTarget {
        let point = page - self.canvas_origin.to_vec2();
        if let Some(selected) = self.selected_element() {
            if let Some(corner) = hit_test_handles(selected, point, self.config.handle_tolerance) {
                return HitTarget::Handle {
                    element: selected.id(),
                    corner,
                };
            }
        }
        match self.document.element_at(point) {
            Some(id) => HitTarget::Element(id),
            None => HitTarget::Background,
        }
    }

    /// Feed one pointer event through the gesture state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EditorResponse {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
        }
    }

    fn pointer_down(&mut self, page: Point, button: MouseButton) -> EditorResponse {
        if !self.interaction.is_idle() {
            log::debug!("Ignoring pointer-down during {:?}", self.interaction.gesture());
            return EditorResponse::default();
        }
        if button != MouseButton::Left {
            return EditorResponse::default();
        }

        match self.hit_test(page) {
            HitTarget::Handle { element, corner } => {
                if let Some(target) = self.document.get(element) {
                    self.interaction.begin_resize(target, corner, page);
                    log::debug!("Resizing {} from {:?}", element, corner);
                }
                EditorResponse::default()
            }
            HitTarget::Element(id) => {
                let response = self.select(id);
                let pointer = page - self.canvas_origin.to_vec2();
                if let Some(target) = self.document.get(id) {
                    self.interaction.begin_drag(target, pointer);
                    log::debug!("Dragging {}", id);
                }
                response
            }
            HitTarget::Background => self.deselect(),
        }
    }

    fn pointer_move(&mut self, page: Point) -> EditorResponse {
        let Some(id) = self.interaction.target() else {
            return EditorResponse::default();
        };
        let Some(element) = self.document.get_mut(id) else {
            return EditorResponse::default();
        };
        let Some(geometry) = self.interaction.track(element, page, self.canvas_origin) else {
            return EditorResponse::default();
        };
        element.set_geometry(geometry);
        self.persistence.mark_dirty();
        EditorResponse {
            repaint: Some(id),
            ..Default::default()
        }
    }

    fn pointer_up(&mut self) -> EditorResponse {
        let Some(id) = self.interaction.finish() else {
            return EditorResponse::default();
        };
        log::debug!("Gesture on {} released", id);
        EditorResponse {
            persisted: self.persist_if_dirty(),
            ..Default::default()
        }
    }

    // --- Persistence & export ------------------------------------------------

    /// Write the layout now. Failures are logged, never propagated.
    pub fn persist(&mut self) -> bool {
        match self.persistence.save(&self.document) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save layout: {}", e);
                false
            }
        }
    }

    fn persist_if_dirty(&mut self) -> bool {
        match self.persistence.save_if_dirty(&self.document) {
            Ok(written) => written,
            Err(e) => {
                log::error!("Failed to save layout: {}", e);
                false
            }
        }
    }

    /// Pretty-printed JSON of the layout.
    pub fn export_json(&self) -> LayoutResult<String> {
        export::export_json(&self.document)
    }

    /// Static markup of the layout at the configured canvas size.
    pub fn export_markup(&self) -> String {
        export::export_markup(&self.document, self.config.canvas_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Corner, Geometry};
    use crate::storage::{MemoryStore, StorageError, StorageResult};

    fn editor() -> Editor<MemoryStore> {
        Editor::open(MemoryStore::new(), EditorConfig::default())
    }

    fn stored(editor: &Editor<MemoryStore>) -> Option<String> {
        editor.persistence().store().get("layout").unwrap()
    }

    fn add(editor: &mut Editor<MemoryStore>, kind: ElementKind) -> ElementId {
        editor.add_element(kind).added.unwrap()
    }

    #[test]
    fn test_add_selects_and_persists() {
        let mut editor = editor();
        let response = editor.add_element(ElementKind::Rectangle);
        let id = response.added.unwrap();

        assert!(response.persisted);
        assert_eq!(editor.selected(), Some(id));
        let element = editor.document().get(id).unwrap();
        assert_eq!(element.label, "rect 1");
        assert_eq!(element.geometry(), Geometry::new(50.0, 50.0, 120.0, 80.0));
        assert!(stored(&editor).unwrap().contains(&id.to_string()));
    }

    #[test]
    fn test_creation_labels_with_interleaving() {
        let mut editor = editor();
        for kind in [
            ElementKind::Text,
            ElementKind::Rectangle,
            ElementKind::Rectangle,
            ElementKind::Text,
            ElementKind::Rectangle,
        ] {
            editor.add_element(kind);
        }

        let mut labels: Vec<_> = editor.document().elements().iter().map(|e| e.label.clone()).collect();
        labels.sort();
        assert_eq!(labels, ["rect 1", "rect 2", "rect 3", "text 1", "text 2"]);
        assert_eq!(editor.document().elements()[1].label, "rect 1");
        assert_eq!(editor.document().elements()[3].label, "text 2");
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut editor = editor();
        let a = add(&mut editor, ElementKind::Rectangle);
        let b = add(&mut editor, ElementKind::Text);

        editor.select(a);
        let response = editor.select(b);

        assert!(response.selection_changed);
        assert_eq!(editor.widget_state(b), WidgetState::Selected);
        assert_eq!(editor.widget_state(a), WidgetState::Normal);
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let mut editor = editor();
        let a = add(&mut editor, ElementKind::Rectangle);
        let response = editor.select(uuid::Uuid::now_v7());
        assert_eq!(response, EditorResponse::default());
        assert_eq!(editor.selected(), Some(a));
    }

    #[test]
    fn test_drag_moves_and_persists_on_release() {
        let mut editor = editor();
        editor.set_canvas_origin(Point::new(100.0, 40.0));
        let id = add(&mut editor, ElementKind::Rectangle);
        let saved_before = stored(&editor);

        // Grab 10px into the element (canvas 60,60 → page 160,100).
        editor.handle_pointer(PointerEvent::down(160.0, 100.0));
        assert!(matches!(editor.gesture(), Gesture::Dragging { .. }));

        let moved = editor.handle_pointer(PointerEvent::moved(200.0, 150.0));
        assert_eq!(moved.repaint, Some(id));
        assert!(!moved.persisted);
        assert_eq!(stored(&editor), saved_before);
        assert_eq!(editor.document().get(id).unwrap().position, Point::new(90.0, 100.0));

        let released = editor.handle_pointer(PointerEvent::up(200.0, 150.0));
        assert!(released.persisted);
        assert!(matches!(editor.gesture(), Gesture::Idle));

        let reloaded = Editor::open(editor.persistence().store().clone(), EditorConfig::default());
        assert_eq!(reloaded.document().get(id).unwrap().position, Point::new(90.0, 100.0));
    }

    #[test]
    fn test_grab_and_release_without_moving() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);
        editor.deselect();

        let down = editor.handle_pointer(PointerEvent::down(75.0, 95.0));
        assert!(down.selection_changed);
        editor.handle_pointer(PointerEvent::moved(75.0, 95.0));
        let up = editor.handle_pointer(PointerEvent::up(75.0, 95.0));

        assert_eq!(editor.document().get(id).unwrap().position, Point::new(50.0, 50.0));
        assert!(up.persisted);
        assert_eq!(editor.selected(), Some(id));
    }

    #[test]
    fn test_click_without_move_does_not_write() {
        let mut editor = editor();
        add(&mut editor, ElementKind::Rectangle);

        editor.handle_pointer(PointerEvent::down(75.0, 95.0));
        let up = editor.handle_pointer(PointerEvent::up(75.0, 95.0));
        assert!(!up.persisted);
    }

    #[test]
    fn test_resize_from_handle_of_selected() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);

        // Top-left handle of the selected element at (50, 50).
        editor.handle_pointer(PointerEvent::down(51.0, 49.0));
        assert!(matches!(
            editor.gesture(),
            Gesture::Resizing { corner: Corner::TopLeft, .. }
        ));
        editor.handle_pointer(PointerEvent::moved(61.0, 29.0));
        editor.handle_pointer(PointerEvent::moved(71.0, 69.0));
        editor.handle_pointer(PointerEvent::up(71.0, 69.0));

        let element = editor.document().get(id).unwrap();
        assert_eq!(element.geometry(), Geometry::new(70.0, 70.0, 100.0, 60.0));
    }

    #[test]
    fn test_resize_past_corner_is_not_clamped() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);

        // Bottom-right handle at (170, 130), dragged far up-left.
        editor.handle_pointer(PointerEvent::down(170.0, 130.0));
        editor.handle_pointer(PointerEvent::moved(0.0, -100.0));
        editor.handle_pointer(PointerEvent::up(0.0, -100.0));

        let element = editor.document().get(id).unwrap();
        assert!((element.width + 50.0).abs() < f64::EPSILON);
        assert!((element.height + 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handles_only_on_selected_element() {
        let mut editor = editor();
        add(&mut editor, ElementKind::Rectangle);
        editor.deselect();

        // The top-left corner of an unselected element is its body.
        editor.handle_pointer(PointerEvent::down(51.0, 51.0));
        assert!(matches!(editor.gesture(), Gesture::Dragging { .. }));
    }

    #[test]
    fn test_background_click_deselects() {
        let mut editor = editor();
        add(&mut editor, ElementKind::Rectangle);

        let response = editor.handle_pointer(PointerEvent::down(600.0, 400.0));
        assert!(response.selection_changed);
        assert_eq!(editor.selected(), None);
        assert!(editor.interaction.is_idle());

        let again = editor.handle_pointer(PointerEvent::down(600.0, 400.0));
        assert!(!again.selection_changed);
    }

    #[test]
    fn test_pointer_down_mid_gesture_is_ignored() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);

        editor.handle_pointer(PointerEvent::down(60.0, 60.0));
        editor.handle_pointer(PointerEvent::down(600.0, 400.0));
        assert_eq!(editor.selected(), Some(id));

        editor.handle_pointer(PointerEvent::moved(70.0, 70.0));
        assert_eq!(editor.document().get(id).unwrap().position, Point::new(60.0, 60.0));
    }

    #[test]
    fn test_release_off_canvas_ends_gesture() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);

        editor.handle_pointer(PointerEvent::down(60.0, 60.0));
        editor.handle_pointer(PointerEvent::moved(-500.0, 2000.0));
        editor.handle_pointer(PointerEvent::up(-500.0, 2000.0));

        assert!(editor.interaction.is_idle());
        assert_eq!(editor.document().get(id).unwrap().position, Point::new(-510.0, 1990.0));
        // Later moves no longer affect the element.
        editor.handle_pointer(PointerEvent::moved(0.0, 0.0));
        assert_eq!(editor.document().get(id).unwrap().position, Point::new(-510.0, 1990.0));
    }

    #[test]
    fn test_right_button_does_not_start_gesture() {
        let mut editor = editor();
        add(&mut editor, ElementKind::Rectangle);
        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(60.0, 60.0),
            button: MouseButton::Right,
        });
        assert!(editor.interaction.is_idle());
    }

    #[test]
    fn test_back_and_forward_buttons_do_not_start_gesture() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);
        editor.deselect();

        for code in [3, 4] {
            let response = editor.handle_pointer(PointerEvent::Down {
                position: Point::new(60.0, 60.0),
                button: MouseButton::from_dom(code),
            });
            assert_eq!(response, EditorResponse::default());
            assert!(editor.interaction.is_idle());
            editor.handle_pointer(PointerEvent::moved(200.0, 200.0));
        }
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.document().get(id).unwrap().position, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_raise_lower_round_trip() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);
        add(&mut editor, ElementKind::Text);
        editor.select(id);

        let raised = editor.raise();
        assert!(raised.layers_changed && raised.persisted);
        assert_eq!(editor.document().get(id).unwrap().z_order, 1);
        editor.lower();
        assert_eq!(editor.document().get(id).unwrap().z_order, 0);

        let layers = editor.layer_list();
        assert!(layers.windows(2).all(|w| w[0].z_order >= w[1].z_order));
    }

    #[test]
    fn test_operations_without_selection_are_noops() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Rectangle);
        editor.deselect();
        let before = editor.document().clone();

        assert_eq!(editor.raise(), EditorResponse::default());
        assert_eq!(editor.lower(), EditorResponse::default());
        assert_eq!(editor.update_property(PropertyEdit::Width(1.0)), EditorResponse::default());
        assert_eq!(editor.deselect(), EditorResponse::default());
        assert_eq!(editor.document(), &before);
        assert!((editor.document().get(id).unwrap().width - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_property_persists() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Text);

        let response = editor.update_property(PropertyEdit::Fill("#f00".to_string()));
        assert_eq!(response.repaint, Some(id));
        assert!(response.persisted);
        editor.update_property(PropertyEdit::Rotation(30.0));

        let reloaded = Editor::open(editor.persistence().store().clone(), EditorConfig::default());
        let element = reloaded.document().get(id).unwrap();
        assert_eq!(element.fill, "#f00");
        assert!((element.rotation - 30.0).abs() < f64::EPSILON);
        assert_eq!(reloaded.selected(), None);
    }

    #[test]
    fn test_malformed_layout_starts_empty_and_is_kept() {
        let store = MemoryStore::with_entry("layout", "definitely not json");
        let mut editor = Editor::open(store, EditorConfig::default());
        assert!(editor.document().is_empty());

        // The session keeps working; the bad layout moves aside.
        add(&mut editor, ElementKind::Rectangle);
        let store = editor.persistence().store().clone();
        assert_eq!(store.get("layout.bak").unwrap().as_deref(), Some("definitely not json"));
        let reloaded = Editor::open(store, EditorConfig::default());
        assert_eq!(reloaded.document().len(), 1);
    }

    #[test]
    fn test_duplicate_id_layout_survives_first_edit() {
        let mut original = editor();
        add(&mut original, ElementKind::Rectangle);
        let element = original.document().elements()[0].clone();
        let payload = serde_json::to_string(&vec![element.clone(), element]).unwrap();

        let mut editor = Editor::open(MemoryStore::with_entry("layout", &payload), EditorConfig::default());
        assert!(editor.document().is_empty());
        assert!(editor.add_element(ElementKind::Text).persisted);

        let backup = editor.persistence().store().get("layout.bak").unwrap().unwrap();
        assert_eq!(backup, payload);
        let kept: Vec<Element> = serde_json::from_str(&backup).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].label, "rect 1");
    }

    #[test]
    fn test_custom_storage_key() {
        let config = EditorConfig {
            storage_key: "draft".to_string(),
            ..Default::default()
        };
        let mut editor = Editor::open(MemoryStore::new(), config);
        add(&mut editor, ElementKind::Rectangle);
        assert!(editor.persistence().store().get("draft").unwrap().is_some());
        assert!(editor.persistence().store().get("layout").unwrap().is_none());
    }

    #[test]
    fn test_failed_writes_do_not_interrupt() {
        struct ReadOnly;
        impl KeyValueStore for ReadOnly {
            fn get(&self, _key: &str) -> StorageResult<Option<String>> {
                Ok(None)
            }
            fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
                Err(StorageError::Io("read-only".to_string()))
            }
        }

        let mut editor = Editor::open(ReadOnly, EditorConfig::default());
        let response = editor.add_element(ElementKind::Rectangle);
        assert!(!response.persisted);
        assert_eq!(editor.document().len(), 1);
    }

    #[test]
    fn test_export_markup_uses_canvas_size() {
        let mut editor = editor();
        add(&mut editor, ElementKind::Rectangle);
        let html = editor.export_markup();
        assert!(html.starts_with("<div style=\"position:relative;width:800px;height:500px;\">"));
        assert!(html.contains("left:50px;top:50px;width:120px;height:80px;background:#ccc;transform:rotate(0deg)"));
        assert!(editor.export_json().unwrap().contains("\"zOrder\": 0"));
    }
}
