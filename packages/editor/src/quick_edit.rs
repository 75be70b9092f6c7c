//! Quick-edit panel state for one element.

use indexmap::IndexMap;
use lander_parser::{Element, ElementId};

/// Panel opened by clicking a rendered element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickEditPanel {
    pub element_id: ElementId,
    pub tag: String,
    /// Plain text of the element
    pub text: String,
    pub attributes: IndexMap<String, String>,
}

impl QuickEditPanel {
    /// Open the panel on an element, giving it an id if it has none
    pub fn open(element: &mut Element) -> Self {
        let element_id = element.ensure_id().clone();
        Self {
            element_id,
            tag: element.tag.clone(),
            text: element.text(),
            attributes: element.props.clone(),
        }
    }

    /// Replace the element's content with escaped text
    pub fn set_text(&mut self, element: &mut Element, text: &str) {
        element.set_text(text);
        self.refresh(element);
    }

    pub fn set_attribute(&mut self, element: &mut Element, name: &str, value: &str) {
        element.props.insert(name.to_ascii_lowercase(), value.to_string());
        self.refresh(element);
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, element: &mut Element, name: &str) -> bool {
        let removed = element.props.shift_remove(&name.to_ascii_lowercase()).is_some();
        self.refresh(element);
        removed
    }

    /// Re-read panel state from the element
    pub fn refresh(&mut self, element: &Element) {
        self.tag = element.tag.clone();
        self.text = element.text();
        self.attributes = element.props.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_assigns_id() {
        let mut element = Element::new("p").with_content("a &amp; b");
        let panel = QuickEditPanel::open(&mut element);
        assert_eq!(Some(&panel.element_id), element.id.as_ref());
        assert_eq!(panel.text, "a & b");
    }

    #[test]
    fn test_edits_write_through() {
        let mut element = Element::new("p").with_prop("class", "x");
        let mut panel = QuickEditPanel::open(&mut element);

        panel.set_text(&mut element, "<b>not bold</b>");
        assert_eq!(element.content, "&lt;b&gt;not bold&lt;/b&gt;");
        assert_eq!(panel.text, "<b>not bold</b>");

        panel.set_attribute(&mut element, "ID", "hero");
        assert_eq!(element.props["id"], "hero");

        assert!(panel.remove_attribute(&mut element, "class"));
        assert!(!panel.remove_attribute(&mut element, "class"));
        assert_eq!(panel.attributes.keys().collect::<Vec<_>>(), vec!["id"]);
    }
}
