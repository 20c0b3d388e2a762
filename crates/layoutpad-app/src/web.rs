//! WebAssembly entry point and DOM shell.
//!
//! The page provides the canvas (`#main-area`), the layer list (`#layers`),
//! the property inputs and the toolbar buttons. The shell keeps one absolutely
//! positioned `div` per element and restyles it from the editor's responses.

use crate::file_sink::{BrowserDownload, FileSink, HTML_MIME, JSON_MIME};
use crate::panel::{layer_rows, PropertyField, SelectedElementProps};
use kurbo::Point;
use layoutpad_core::export::element_style;
use layoutpad_core::storage::{create_default_store, KeyValueStore, MemoryStore};
use layoutpad_core::widget::HANDLE_SIZE;
use layoutpad_core::{
    Corner, Editor, EditorConfig, EditorResponse, ElementId, ElementKind, MouseButton, PointerEvent,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement, HtmlInputElement, MouseEvent};

type SharedShell = Rc<RefCell<Shell>>;

/// Look up a page element by id and cast it.
fn page_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has an unexpected type", id)))
}

fn page_position(event: &MouseEvent) -> Point {
    Point::new(event.page_x() as f64, event.page_y() as f64)
}

struct Shell {
    editor: Editor<Box<dyn KeyValueStore>>,
    document: Document,
    canvas: HtmlElement,
    layers: HtmlElement,
    nodes: HashMap<ElementId, HtmlElement>,
}

impl Shell {
    fn new(document: Document) -> Result<Self, JsValue> {
        let store: Box<dyn KeyValueStore> = match create_default_store() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("Layout will not be kept between visits: {}", e);
                Box::new(MemoryStore::new())
            }
        };
        let canvas = page_element::<HtmlElement>(&document, "main-area")?;
        let layers = page_element::<HtmlElement>(&document, "layers")?;

        Ok(Self {
            editor: Editor::open(store, EditorConfig::default()),
            document,
            canvas,
            layers,
            nodes: HashMap::new(),
        })
    }

    fn sync_canvas_origin(&mut self) {
        let origin = Point::new(self.canvas.offset_left() as f64, self.canvas.offset_top() as f64);
        self.editor.set_canvas_origin(origin);
    }

    /// Paint every element and both panels.
    fn render_all(&mut self) -> Result<(), JsValue> {
        let ids: Vec<ElementId> = self.editor.document().elements().iter().map(|e| e.id()).collect();
        for id in ids {
            self.paint(id)?;
        }
        self.render_layers()?;
        self.refresh_panel()
    }

    fn apply(&mut self, response: EditorResponse) -> Result<(), JsValue> {
        if let Some(id) = response.added.or(response.repaint) {
            self.paint(id)?;
        }
        if response.selection_changed {
            let ids: Vec<ElementId> = self.nodes.keys().copied().collect();
            for id in ids {
                self.paint(id)?;
            }
            self.refresh_panel()?;
        }
        if response.layers_changed {
            self.render_layers()?;
        }
        Ok(())
    }

    /// Create or restyle the node of one element.
    fn paint(&mut self, id: ElementId) -> Result<(), JsValue> {
        let Some(element) = self.editor.document().get(id) else {
            return Ok(());
        };
        let node = match self.nodes.get(&id) {
            Some(node) => node.clone(),
            None => {
                let node = self.document.create_element("div")?.dyn_into::<HtmlElement>()?;
                node.set_class_name("element");
                node.set_attribute("data-id", &id.to_string())?;
                self.canvas.append_child(&node)?;
                self.nodes.insert(id, node.clone());
                node
            }
        };

        node.style().set_css_text(&element_style(element));
        node.set_text_content(Some(element.display_text()));

        let selected = self.editor.widget_state(id).is_selected();
        node.class_list().toggle_with_force("selected", selected)?;
        if selected {
            // Handles live inside the node so they rotate with it.
            let geometry = element.geometry();
            let half = HANDLE_SIZE / 2.0;
            for corner in Corner::ALL {
                let local = geometry.corner_point(corner) - geometry.position;
                let handle = self.document.create_element("div")?;
                handle.set_class_name(&format!("resize-handle handle-{}", corner.tag()));
                handle.set_attribute(
                    "style",
                    &format!(
                        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;",
                        local.x - half,
                        local.y - half,
                        HANDLE_SIZE,
                        HANDLE_SIZE
                    ),
                )?;
                node.append_child(&handle)?;
            }
        }
        Ok(())
    }

    fn render_layers(&self) -> Result<(), JsValue> {
        self.layers.set_inner_html("");
        for row in layer_rows(&self.editor) {
            let item = self.document.create_element("div")?;
            item.set_class_name(if row.selected { "layer-item active" } else { "layer-item" });
            item.set_text_content(Some(&row.label));
            item.set_attribute("data-id", &row.id.to_string())?;
            self.layers.append_child(&item)?;
        }
        Ok(())
    }

    fn refresh_panel(&self) -> Result<(), JsValue> {
        let props = SelectedElementProps::from_selection(self.editor.selected_element());
        if !props.has_selection {
            return Ok(());
        }
        for field in PropertyField::ALL {
            let input = page_element::<HtmlInputElement>(&self.document, field.input_id())?;
            input.set_value(&field.display_value(&props));
        }
        let wrapper = page_element::<HtmlElement>(&self.document, "text-wrapper")?;
        wrapper
            .style()
            .set_property("display", if props.is_text { "block" } else { "none" })
    }

    fn export(&self, json: bool) -> Result<(), JsValue> {
        let config = self.editor.config();
        let (name, contents, mime) = if json {
            let contents = self
                .editor
                .export_json()
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            (&config.json_export_name, contents, JSON_MIME)
        } else {
            (&config.markup_export_name, self.editor.export_markup(), HTML_MIME)
        };
        if let Err(e) = BrowserDownload.save(name, &contents, mime) {
            log::error!("Export failed: {}", e);
        }
        Ok(())
    }
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
fn listen<E, F>(target: &EventTarget, event: &str, shell: &SharedShell, mut handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(&mut Shell, E) -> Result<(), JsValue> + 'static,
{
    let shell = shell.clone();
    let name = event.to_string();
    let closure = Closure::<dyn FnMut(E)>::new(move |event: E| match shell.try_borrow_mut() {
        Ok(mut shell) => {
            if let Err(e) = handler(&mut shell, event) {
                log::error!("{} handler failed: {:?}", name, e);
            }
        }
        Err(_) => log::warn!("Dropped re-entrant {} event", name),
    });
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_click<F>(document: &Document, id: &str, shell: &SharedShell, mut action: F) -> Result<(), JsValue>
where
    F: FnMut(&mut Shell) -> Result<(), JsValue> + 'static,
{
    let button = page_element::<EventTarget>(document, id)?;
    listen(&button, "click", shell, move |shell, _: Event| action(shell))
}

fn wire(shell: &SharedShell, document: &Document) -> Result<(), JsValue> {
    let canvas: EventTarget = shell.borrow().canvas.clone().into();
    listen(&canvas, "mousedown", shell, |shell, event: MouseEvent| {
        event.prevent_default();
        shell.sync_canvas_origin();
        let response = shell.editor.handle_pointer(PointerEvent::Down {
            position: page_position(&event),
            button: MouseButton::from_dom(event.button()),
        });
        shell.apply(response)
    })?;

    // Moves and releases are tracked page-wide so gestures survive leaving the canvas.
    listen(document, "mousemove", shell, |shell, event: MouseEvent| {
        let response = shell.editor.handle_pointer(PointerEvent::Move {
            position: page_position(&event),
        });
        shell.apply(response)?;
        if response.repaint.is_some() {
            shell.refresh_panel()?;
        }
        Ok(())
    })?;
    listen(document, "mouseup", shell, |shell, event: MouseEvent| {
        let response = shell.editor.handle_pointer(PointerEvent::Up {
            position: page_position(&event),
            button: MouseButton::from_dom(event.button()),
        });
        shell.apply(response)
    })?;

    for field in PropertyField::ALL {
        let input = page_element::<HtmlInputElement>(document, field.input_id())?;
        let target: EventTarget = input.clone().into();
        listen(&target, "input", shell, move |shell, _: Event| {
            match field.parse(&input.value()) {
                Ok(edit) => {
                    let response = shell.editor.update_property(edit);
                    shell.apply(response)?;
                }
                Err(e) => log::warn!("Ignoring input: {}", e),
            }
            Ok(())
        })?;
    }

    let layers: EventTarget = shell.borrow().layers.clone().into();
    listen(&layers, "click", shell, |shell, event: MouseEvent| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
            return Ok(());
        };
        let Some(item) = target.closest(".layer-item")? else {
            return Ok(());
        };
        let Some(id) = item.get_attribute("data-id").and_then(|id| ElementId::parse_str(&id).ok()) else {
            return Ok(());
        };
        let response = shell.editor.select(id);
        shell.apply(response)
    })?;

    on_click(document, "add-rect", shell, |shell| {
        let response = shell.editor.add_element(ElementKind::Rectangle);
        shell.apply(response)
    })?;
    on_click(document, "add-text", shell, |shell| {
        let response = shell.editor.add_element(ElementKind::Text);
        shell.apply(response)
    })?;
    on_click(document, "layer-up", shell, |shell| {
        let response = shell.editor.raise();
        shell.apply(response)
    })?;
    on_click(document, "layer-down", shell, |shell| {
        let response = shell.editor.lower();
        shell.apply(response)
    })?;
    on_click(document, "export-json", shell, |shell| shell.export(true))?;
    on_click(document, "export-html", shell, |shell| shell.export(false))?;

    Ok(())
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger unavailable: {}", e)));
    }
    log::info!("Starting LayoutPad (WASM)");

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("No document"))?;

    let shell = Rc::new(RefCell::new(Shell::new(document.clone())?));
    shell.borrow_mut().render_all()?;
    wire(&shell, &document)?;
    log::info!("Editor ready with {} elements", shell.borrow().editor.document().len());
    Ok(())
}
