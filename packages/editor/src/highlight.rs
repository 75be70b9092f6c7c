//! Syntax highlighting for the code surface.

use crate::cursor::{byte_index, RenderedBuffer, Selection};
use lander_parser::entities::escape_text;
use lander_parser::{tokenize, Token};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightClass {
    /// Angle brackets, `=`, and whitespace inside a tag
    Tag,
    /// Tag name
    Name,
    /// Attribute name
    Attr,
    /// Attribute value
    String,
    Comment,
    Text,
}

impl HighlightClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            HighlightClass::Tag => "hljs-tag",
            HighlightClass::Name => "hljs-name",
            HighlightClass::Attr => "hljs-attr",
            HighlightClass::String => "hljs-string",
            HighlightClass::Comment => "hljs-comment",
            HighlightClass::Text => "hljs-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub class: HighlightClass,
    pub text: String,
}

/// Split `code` into classed spans. Concatenating the span texts gives back
/// `code` exactly.
pub fn highlight(code: &str) -> Vec<HighlightSpan> {
    let mut builder = SpanBuilder { code, spans: Vec::new(), pos: 0 };

    for token in tokenize(code) {
        match token {
            Token::StartTag { attributes, name_span, span, .. } => {
                builder.push(HighlightClass::Tag, span.start..name_span.start);
                builder.push(HighlightClass::Name, name_span);
                for attribute in attributes {
                    builder.push(HighlightClass::Tag, builder.pos..attribute.name_span.start);
                    let name_end = attribute.name_span.end;
                    builder.push(HighlightClass::Attr, attribute.name_span);
                    if let Some(value_span) = attribute.value_span {
                        builder.push(HighlightClass::Tag, name_end..value_span.start);
                        builder.push(HighlightClass::String, value_span);
                    }
                }
                builder.push(HighlightClass::Tag, builder.pos..span.end);
            }
            Token::EndTag { name, span } => {
                let name_start = span.start + 2;
                builder.push(HighlightClass::Tag, span.start..name_start);
                builder.push(HighlightClass::Name, name_start..name_start + name.len());
                builder.push(HighlightClass::Tag, builder.pos..span.end);
            }
            Token::Comment { span, .. } | Token::Doctype { span } => {
                builder.push(HighlightClass::Comment, span)
            }
            Token::Text { span, .. } => builder.push(HighlightClass::Text, span),
        }
    }
    builder.push(HighlightClass::Text, builder.pos..code.len());

    builder.spans
}

struct SpanBuilder<'a> {
    code: &'a str,
    spans: Vec<HighlightSpan>,
    pos: usize,
}

impl SpanBuilder<'_> {
    fn push(&mut self, class: HighlightClass, range: Range<usize>) {
        // Anything the tokenizer skipped is plain text
        if range.start > self.pos {
            self.push_raw(HighlightClass::Text, self.pos..range.start);
        }
        let start = range.start.max(self.pos);
        if range.end > start {
            self.push_raw(class, start..range.end);
        }
    }

    fn push_raw(&mut self, class: HighlightClass, range: Range<usize>) {
        let text = &self.code[range.clone()];
        self.pos = range.end;
        if let Some(last) = self.spans.last_mut() {
            if last.class == class {
                last.text.push_str(text);
                return;
            }
        }
        self.spans.push(HighlightSpan {
            class,
            text: text.to_string(),
        });
    }
}

/// Render spans as `<span class="hljs-…">` markup, text escaped
pub fn render_spans(spans: &[HighlightSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        match span.class {
            HighlightClass::Text => out.push_str(&escape_text(&span.text)),
            class => {
                out.push_str("<span class=\"");
                out.push_str(class.css_class());
                out.push_str("\">");
                out.push_str(&escape_text(&span.text));
                out.push_str("</span>");
            }
        }
    }
    out
}

pub fn highlight_html(code: &str) -> String {
    render_spans(&highlight(code))
}

/// The segments the highlighted surface shows, for cursor restoration
pub fn rendered_buffer(code: &str) -> RenderedBuffer {
    RenderedBuffer::new(highlight(code).into_iter().map(|span| span.text).collect())
}

/// Highlighted code with the selection wrapped in `hljs-selected` and a
/// `cursor-blink` caret after it. Each part is highlighted on its own.
pub fn highlight_with_selection(code: &str, selection: Selection) -> String {
    let selection = selection.clamp(code.chars().count());
    let start = byte_index(code, selection.start);
    let end = byte_index(code, selection.end);

    let mut out = highlight_html(&code[..start]);
    out.push_str("<span class=\"hljs-selected\">");
    out.push_str(&highlight_html(&code[start..end]));
    out.push_str("</span><span class=\"cursor-blink\"></span>");
    out.push_str(&highlight_html(&code[end..]));
    out
}
