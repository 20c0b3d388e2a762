//! Export of a layout to JSON and static markup.
//!
//! The markup export is one-way: it carries no element identity and cannot be
//! loaded back into the editor.

use crate::document::{LayoutDocument, LayoutResult};
use crate::element::Element;
use kurbo::Size;
use std::fmt::Write;

/// Pretty-printed JSON in the persisted shape.
pub fn export_json(document: &LayoutDocument) -> LayoutResult<String> {
    document.to_json_pretty()
}

/// Inline style of one exported element box.
pub fn element_style(element: &Element) -> String {
    format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;background:{};transform:rotate({}deg);z-index:{};",
        element.position.x,
        element.position.y,
        element.width,
        element.height,
        element.fill,
        element.rotation,
        element.z_order,
    )
}

/// Self-contained markup: a fixed-size container with one absolutely
/// positioned box per element, in document order. Text is inserted verbatim.
pub fn export_markup(document: &LayoutDocument, canvas_size: Size) -> String {
    let mut html = format!(
        "<div style=\"position:relative;width:{}px;height:{}px;\">",
        canvas_size.width, canvas_size.height
    );
    for element in document.elements() {
        // Writing into a String cannot fail.
        let _ = write!(
            html,
            "<div style=\"{}\">{}</div>",
            element_style(element),
            element.display_text()
        );
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, PropertyEdit};
    use crate::geometry::Geometry;

    fn canvas() -> Size {
        Size::new(800.0, 500.0)
    }

    #[test]
    fn test_single_rectangle() {
        let mut doc = LayoutDocument::new();
        doc.add_element(ElementKind::Rectangle, Geometry::new(50.0, 50.0, 120.0, 80.0));

        let html = export_markup(&doc, canvas());
        assert!(html.starts_with("<div style=\"position:relative;width:800px;height:500px;\">"));
        assert!(html.contains(
            "left:50px;top:50px;width:120px;height:80px;background:#ccc;transform:rotate(0deg)"
        ));
        assert!(html.contains("z-index:0;"));
        assert!(html.ends_with("</div></div>"));
    }

    #[test]
    fn test_text_is_verbatim_and_fractions_kept() {
        let mut doc = LayoutDocument::new();
        let id = doc.add_element(ElementKind::Text, Geometry::new(-12.5, 0.0, 10.0, 10.0));
        let text = doc.get_mut(id).unwrap();
        text.apply_edit(PropertyEdit::Text("<b>Hello</b> & bye".to_string()));
        text.apply_edit(PropertyEdit::Rotation(-45.5));

        let html = export_markup(&doc, canvas());
        assert!(!html.contains("&lt;"));
        assert!(html.contains("\"><b>Hello</b> & bye</div>"));
        assert!(html.contains("left:-12.5px;"));
        assert!(html.contains("background:transparent;transform:rotate(-45.5deg);"));
    }

    #[test]
    fn test_one_box_per_element_in_document_order() {
        let mut doc = LayoutDocument::new();
        let first = doc.add_element(ElementKind::Rectangle, Geometry::new(1.0, 1.0, 1.0, 1.0));
        doc.add_element(ElementKind::Rectangle, Geometry::new(2.0, 2.0, 2.0, 2.0));
        doc.raise(first);
        doc.raise(first);

        let html = export_markup(&doc, canvas());
        assert_eq!(html.matches("position:absolute").count(), 2);
        let first_box = html.find("left:1px").unwrap();
        let second_box = html.find("left:2px").unwrap();
        assert!(first_box < second_box);
    }

    #[test]
    fn test_empty_document() {
        let html = export_markup(&LayoutDocument::new(), Size::new(320.0, 200.0));
        assert_eq!(html, "<div style=\"position:relative;width:320px;height:200px;\"></div>");
    }

    #[test]
    fn test_json_export_round_trips() {
        let mut doc = LayoutDocument::new();
        doc.add_element(ElementKind::Text, Geometry::new(0.0, 0.0, 5.0, 5.0));
        let json = export_json(&doc).unwrap();
        assert!(json.contains('\n'));
        assert_eq!(LayoutDocument::from_json(&json).unwrap(), doc);
    }
}
