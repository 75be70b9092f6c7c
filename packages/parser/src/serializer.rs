use crate::ast::Element;
use crate::entities::escape_attribute;
use std::fmt::Write;

/// Image shown for `img` elements without a source
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/noimage.png";

#[derive(Debug, Clone)]
pub struct SerializeOptions {
    pub placeholder_image: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Serializer converts the element model back to HTML
///
/// Elements are concatenated in order with no separators. `content` is
/// written verbatim, so whitespace inside it survives; whitespace between
/// top-level elements does not.
pub struct Serializer {
    options: SerializeOptions,
}

impl Serializer {
    pub fn new() -> Self {
        Self::with_options(SerializeOptions::default())
    }

    pub fn with_options(options: SerializeOptions) -> Self {
        Self { options }
    }

    pub fn serialize(&self, elements: &[Element]) -> String {
        let mut output = String::new();
        for element in elements {
            self.serialize_element(element, &mut output);
        }
        output
    }

    /// Serialize one element, optionally with extra attributes appended
    pub fn serialize_element_with(&self, element: &Element, extra: &[(&str, &str)], output: &mut String) {
        output.push('<');
        output.push_str(&element.tag);

        if element.is_image() && element.props.get("src").map_or(true, |src| src.is_empty()) {
            write_attribute(output, "src", &self.options.placeholder_image);
        }
        for (name, value) in &element.props {
            if element.is_image() && name == "src" && value.is_empty() {
                continue;
            }
            write_attribute(output, name, value);
        }
        for (name, value) in extra {
            write_attribute(output, name, value);
        }

        if element.is_void() {
            output.push_str(" />");
        } else {
            let _ = write!(output, ">{}</{}>", element.content, element.tag);
        }
    }

    fn serialize_element(&self, element: &Element, output: &mut String) {
        self.serialize_element_with(element, &[], output);
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_attribute(output: &mut String, name: &str, value: &str) {
    let _ = write!(output, " {}=\"{}\"", name, escape_attribute(value));
}

/// Serialize elements to an HTML string
pub fn serialize(elements: &[Element]) -> String {
    Serializer::new().serialize(elements)
}

pub fn serialize_with_options(elements: &[Element], options: &SerializeOptions) -> String {
    Serializer::with_options(options.clone()).serialize(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DEFAULT_ELEMENT_TEXT;
    use crate::parser::parse;

    #[test]
    fn test_serialize_elements() {
        let elements = vec![
            Element::new("h1").with_content(DEFAULT_ELEMENT_TEXT),
            Element::new("p").with_prop("class", "lead").with_content("a &amp; b"),
        ];
        assert_eq!(
            serialize(&elements),
            r#"<h1>ここにテキスト</h1><p class="lead">a &amp; b</p>"#
        );
    }

    #[test]
    fn test_void_elements_self_close() {
        let elements = vec![
            Element::new("img").with_prop("src", "/a.png").with_prop("alt", "say \"hi\""),
            Element::new("hr"),
        ];
        assert_eq!(
            serialize(&elements),
            r#"<img src="/a.png" alt="say &quot;hi&quot;" /><hr />"#
        );
    }

    #[test]
    fn test_image_placeholder() {
        let elements = vec![Element::new("img"), Element::new("img").with_prop("src", "")];
        assert_eq!(
            serialize(&elements),
            r#"<img src="/noimage.png" /><img src="/noimage.png" />"#
        );

        let options = SerializeOptions {
            placeholder_image: "/blank.svg".to_string(),
        };
        assert_eq!(
            serialize_with_options(&[Element::new("img")], &options),
            r#"<img src="/blank.svg" />"#
        );
    }

    #[test]
    fn test_empty_model() {
        assert_eq!(serialize(&[]), "");
    }

    #[test]
    fn test_roundtrip_preserves_structure() {
        let source = r#"<h1 id="top">Hi &amp; welcome</h1>
            <section><p>one</p><ul><li>a</li></ul></section>
            <img src="/hero.png" alt="hero">"#;
        let first = parse(source);
        let second = parse(&serialize(&first));

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.tag, b.tag);
            assert_eq!(a.content, b.content);
            assert!(a.same_shape(b));
        }
    }
}
