//! Canvas rendering with a node id → element id map for click resolution.

use lander_parser::{Element, ElementId, IDGenerator, SerializeOptions, Serializer};
use std::collections::HashMap;

/// Attribute carrying the render node id of each top-level element
pub const NODE_ATTRIBUTE: &str = "data-lander-node";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanvasRender {
    pub html: String,
    pub nodes: HashMap<String, ElementId>,
}

impl CanvasRender {
    /// Element rendered as `node_id`
    pub fn resolve(&self, node_id: &str) -> Option<&ElementId> {
        self.nodes.get(node_id)
    }
}

/// Render the elements for the visual canvas, assigning element ids to any
/// element that has none
pub fn render_canvas(elements: &mut [Element], options: &SerializeOptions) -> CanvasRender {
    let serializer = Serializer::with_options(options.clone());
    let mut ids = IDGenerator::new("node");
    let mut render = CanvasRender::default();

    for element in elements.iter_mut() {
        let element_id = element.ensure_id().clone();
        let node_id = ids.new_id();
        serializer.serialize_element_with(element, &[(NODE_ATTRIBUTE, node_id.as_str())], &mut render.html);
        render.nodes.insert(node_id, element_id);
    }

    tracing::trace!(nodes = render.nodes.len(), "rendered canvas");
    render
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_map_to_elements() {
        let mut elements = vec![
            Element::new("h1").with_content("Title"),
            Element::new("img"),
        ];
        let render = render_canvas(&mut elements, &SerializeOptions::default());

        assert_eq!(
            render.html,
            r#"<h1 data-lander-node="node-1">Title</h1><img src="/noimage.png" data-lander-node="node-2" />"#
        );
        assert_eq!(render.resolve("node-1"), elements[0].id.as_ref());
        assert_eq!(render.resolve("node-2"), elements[1].id.as_ref());
        assert_eq!(render.resolve("node-3"), None);
    }

    #[test]
    fn test_rerender_keeps_element_ids() {
        let mut elements = vec![Element::new("p").with_content("x")];
        let first = render_canvas(&mut elements, &SerializeOptions::default());
        let second = render_canvas(&mut elements, &SerializeOptions::default());
        assert_eq!(first.resolve("node-1"), second.resolve("node-1"));
    }
}
