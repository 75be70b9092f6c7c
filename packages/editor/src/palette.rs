//! Items that can be dropped onto the canvas.

use lander_parser::{Element, DEFAULT_ELEMENT_TEXT};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteItem {
    Heading,
    Paragraph,
    Image,
}

impl PaletteItem {
    pub const ALL: [PaletteItem; 3] = [PaletteItem::Heading, PaletteItem::Paragraph, PaletteItem::Image];

    pub fn tag(&self) -> &'static str {
        match self {
            PaletteItem::Heading => "h1",
            PaletteItem::Paragraph => "p",
            PaletteItem::Image => "img",
        }
    }

    pub fn label(&self) -> &'static str {
        label_for_tag(self.tag())
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.tag().eq_ignore_ascii_case(tag))
    }

    /// New element for this item. Images get no `src`, so they serialize
    /// with the placeholder.
    pub fn create_element(&self) -> Element {
        let element = Element::new(self.tag());
        match self {
            PaletteItem::Image => element,
            _ => element.with_content(DEFAULT_ELEMENT_TEXT),
        }
    }
}

impl fmt::Display for PaletteItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Palette label for a tag name
pub fn label_for_tag(tag: &str) -> &'static str {
    match tag.to_ascii_lowercase().as_str() {
        "h1" => "H1",
        "p" => "P",
        "img" => "IMG",
        _ => "UNKNOWN",
    }
}
