use crate::entities::escape_text;
use crate::id_generator::new_element_id;
use crate::parser::{parse_with_options, text_content, ParseOptions};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text given to elements dropped from the palette
pub const DEFAULT_ELEMENT_TEXT: &str = "ここにテキスト";

/// Elements that never have content and serialize as `<tag />`
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Stable identity of an element across edits
///
/// Assigned lazily and never written into the page HTML.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One authored unit of page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Lower-cased tag name. Open set: anything parsed from HTML round-trips.
    #[serde(rename = "type")]
    pub tag: String,

    /// Attributes in source order
    #[serde(default)]
    pub props: IndexMap<String, String>,

    /// Inner HTML in normalized form. Unused for void elements.
    #[serde(default)]
    pub content: String,

    /// Structural view of nested elements, filled by nested parsing only.
    /// `content` stays authoritative for serialization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ElementId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            props: IndexMap::new(),
            content: String::new(),
            children: Vec::new(),
            id: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }

    pub fn is_image(&self) -> bool {
        self.tag == "img"
    }

    /// Identifier of this element, generating one on first use
    pub fn ensure_id(&mut self) -> &ElementId {
        self.id.get_or_insert_with(new_element_id)
    }

    /// Decoded plain text of the content, markup stripped
    pub fn text(&self) -> String {
        text_content(&self.content)
    }

    /// Replace the content with plain text, escaping markup characters
    pub fn set_text(&mut self, text: &str) {
        self.set_content(escape_text(text));
    }

    /// Replace the inner HTML, refreshing the nested view if this element has one
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        if !self.children.is_empty() {
            self.children = parse_with_options(&self.content, &ParseOptions { nested: true });
        }
    }

    /// Tag and attributes match, ignoring content and identity
    pub fn same_shape(&self, other: &Element) -> bool {
        self.tag == other.tag
            && self.props.len() == other.props.len()
            && self.props.iter().all(|(k, v)| other.props.get(k) == Some(v))
    }
}

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}
