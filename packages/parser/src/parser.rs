//! Tolerant HTML parsing into top-level [`Element`]s.
//!
//! Never fails on malformed markup: unclosed elements are closed at end of
//! input, stray end tags are ignored, and text or comments outside any element
//! are dropped.

use crate::ast::{is_void_element, Element};
use crate::entities::{escape_attribute, escape_text};
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Fill [`Element::children`] with the nested element structure
    pub nested: bool,
}

/// Parse a serialized document into its top-level elements
pub fn parse(html: &str) -> Vec<Element> {
    parse_with_options(html, &ParseOptions::default())
}

pub fn parse_with_options(html: &str, options: &ParseOptions) -> Vec<Element> {
    let nodes = TreeBuilder::default().build(tokenize(html));
    let elements: Vec<Element> = nodes
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(el) => Some(el.into_element(options.nested)),
            _ => None,
        })
        .collect();

    tracing::trace!(bytes = html.len(), elements = elements.len(), "parsed document");
    elements
}

/// Like [`parse`], but non-blank input that yields no elements is an error
pub fn try_parse(html: &str) -> ParseResult<Vec<Element>> {
    let elements = parse(html);
    if elements.is_empty() && !html.trim().is_empty() {
        return Err(ParseError::no_elements(html.len()));
    }
    Ok(elements)
}

/// Decoded text of a markup fragment, tags and comments stripped
pub fn text_content(html: &str) -> String {
    tokenize(html)
        .into_iter()
        .filter_map(|token| match token {
            Token::Text { text, raw: false, .. } => Some(text),
            _ => None,
        })
        .collect()
}

/// Normalize a markup fragment the way it would read back as inner HTML
pub fn normalize_fragment(html: &str) -> String {
    let nodes = TreeBuilder::default().build(tokenize(html));
    let mut out = String::with_capacity(html.len());
    write_nodes(&nodes, &mut out);
    out
}

#[derive(Debug, Clone)]
enum Node {
    Element(NodeElement),
    Text { text: String, raw: bool },
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeElement {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
}

impl NodeElement {
    fn into_element(self, nested: bool) -> Element {
        let mut content = String::new();
        write_nodes(&self.children, &mut content);

        let children = if nested {
            self.children
                .into_iter()
                .filter_map(|node| match node {
                    Node::Element(el) => Some(el.into_element(true)),
                    _ => None,
                })
                .collect()
        } else {
            Vec::new()
        };

        Element {
            tag: self.tag,
            props: self.attributes,
            content,
            children,
            id: None,
        }
    }
}

/// Tags that are dropped while their children are kept
const UNWRAPPED: &[&str] = &["html", "head", "body"];

/// Start tags that implicitly close an open `<p>`
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<NodeElement>,
}

impl TreeBuilder {
    fn build(mut self, tokens: Vec<Token>) -> Vec<Node> {
        for token in tokens {
            match token {
                Token::StartTag { name, attributes, .. } => {
                    if UNWRAPPED.contains(&name.as_str()) {
                        continue;
                    }
                    self.close_implied_by(&name);

                    let element = NodeElement {
                        attributes: attributes.into_iter().map(|a| (a.name, a.value)).collect(),
                        tag: name,
                        children: Vec::new(),
                    };
                    if is_void_element(&element.tag) {
                        self.append(Node::Element(element));
                    } else {
                        self.stack.push(element);
                    }
                }
                Token::EndTag { name, .. } => {
                    if let Some(depth) = self.stack.iter().rposition(|el| el.tag == name) {
                        while self.stack.len() > depth {
                            self.close_top();
                        }
                    }
                }
                Token::Text { text, raw, .. } => self.append_text(text, raw),
                Token::Comment { body, .. } => self.append(Node::Comment(body)),
                Token::Doctype { .. } => {}
            }
        }

        while !self.stack.is_empty() {
            self.close_top();
        }
        self.root
    }

    fn close_implied_by(&mut self, tag: &str) {
        let Some(top) = self.stack.last() else {
            return;
        };
        let implied = match top.tag.as_str() {
            "p" => CLOSES_P.contains(&tag),
            "li" => tag == "li",
            "dt" | "dd" => tag == "dt" || tag == "dd",
            "option" => tag == "option",
            _ => false,
        };
        if implied {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.append(Node::Element(element));
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        }
    }

    fn append(&mut self, node: Node) {
        self.children_mut().push(node);
    }

    fn append_text(&mut self, text: String, raw: bool) {
        let children = self.children_mut();
        if let Some(Node::Text { text: prev, raw: prev_raw }) = children.last_mut() {
            if *prev_raw == raw {
                prev.push_str(&text);
                return;
            }
        }
        children.push(Node::Text { text, raw });
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { text, raw: true } => out.push_str(text),
            Node::Text { text, raw: false } => out.push_str(&escape_text(text)),
            Node::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if !is_void_element(&el.tag) {
                    write_nodes(&el.children, out);
                    out.push_str("</");
                    out.push_str(&el.tag);
                    out.push('>');
                }
            }
        }
    }
}
