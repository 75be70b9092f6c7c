//! Markup tokenizer.
//!
//! A byte scanner splits the input into tags, text and comments; the interior
//! of each start tag is lexed with [`AttrToken`]. Nothing here fails: input
//! that cannot be a tag is emitted as text, and an unterminated tag at end of
//! input is dropped.

use crate::entities::decode_entities;
use logos::Logos;
use std::ops::Range;

/// Tokens inside a start tag, after the tag name
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum AttrToken<'src> {
    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| trim_quotes(lex.slice()))]
    #[regex(r#"'[^']*'"#, |lex| trim_quotes(lex.slice()))]
    Quoted(&'src str),

    /// Attribute name, unquoted value, or a lone `/`
    #[regex(r#"[^ \t\n\r\f"'=<>`]+"#, |lex| lex.slice())]
    Word(&'src str),
}

fn trim_quotes(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

/// Attribute of a start tag
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Lower-cased name
    pub name: String,
    /// Entity-decoded value, empty for bare attributes
    pub value: String,
    pub name_span: Range<usize>,
    pub value_span: Option<Range<usize>>,
}

/// Markup token with its byte span in the input
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
        name_span: Range<usize>,
        span: Range<usize>,
    },
    EndTag {
        name: String,
        span: Range<usize>,
    },
    /// Character data. `raw` is set for script/style bodies, which are not decoded.
    Text {
        text: String,
        raw: bool,
        span: Range<usize>,
    },
    Comment {
        body: String,
        span: Range<usize>,
    },
    Doctype {
        span: Range<usize>,
    },
}

impl Token {
    pub fn span(&self) -> Range<usize> {
        match self {
            Token::StartTag { span, .. }
            | Token::EndTag { span, .. }
            | Token::Text { span, .. }
            | Token::Comment { span, .. }
            | Token::Doctype { span } => span.clone(),
        }
    }
}

/// Elements whose body is raw text up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose body is text (entities decoded) up to the matching end tag
const RCDATA_ELEMENTS: &[&str] = &["textarea", "title"];

/// Tokenize markup
pub fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut idx = 0;

    while idx < bytes.len() {
        if bytes[idx] != b'<' {
            let next = find_byte(bytes, idx, b'<').unwrap_or(bytes.len());
            push_text(&mut tokens, &input[idx..next], idx..next);
            idx = next;
            continue;
        }

        if starts_with(bytes, idx, b"<!--") {
            let body_start = idx + 4;
            let (body_end, next) = match find_seq(bytes, body_start, b"-->") {
                Some(end) => (end, end + 3),
                None => (bytes.len(), bytes.len()),
            };
            tokens.push(Token::Comment {
                body: input[body_start..body_end].to_string(),
                span: idx..next,
            });
            idx = next;
            continue;
        }

        if starts_with_ignore_case(bytes, idx, b"<!doctype") {
            let next = skip_past_gt(bytes, idx);
            tokens.push(Token::Doctype { span: idx..next });
            idx = next;
            continue;
        }

        if starts_with(bytes, idx, b"<!") || starts_with(bytes, idx, b"<?") {
            // Bogus comment
            let next = skip_past_gt(bytes, idx);
            let body_end = if next > idx + 2 && bytes[next - 1] == b'>' { next - 1 } else { next };
            tokens.push(Token::Comment {
                body: input[idx + 2..body_end].to_string(),
                span: idx..next,
            });
            idx = next;
            continue;
        }

        if starts_with(bytes, idx, b"</") {
            match bytes.get(idx + 2) {
                Some(b) if b.is_ascii_alphabetic() => {
                    let name_end = scan_tag_name(bytes, idx + 2);
                    let name = input[idx + 2..name_end].to_ascii_lowercase();
                    match find_tag_end(bytes, name_end) {
                        Some(gt) => {
                            tokens.push(Token::EndTag { name, span: idx..gt + 1 });
                            idx = gt + 1;
                        }
                        None => idx = bytes.len(),
                    }
                }
                Some(b'>') => idx += 3,
                Some(_) => {
                    let next = skip_past_gt(bytes, idx);
                    let body_end = if bytes[next - 1] == b'>' { next - 1 } else { next };
                    tokens.push(Token::Comment {
                        body: input[idx + 2..body_end].to_string(),
                        span: idx..next,
                    });
                    idx = next;
                }
                None => {
                    push_text(&mut tokens, "</", idx..idx + 2);
                    idx += 2;
                }
            }
            continue;
        }

        match bytes.get(idx + 1) {
            Some(b) if b.is_ascii_alphabetic() => {}
            _ => {
                push_text(&mut tokens, "<", idx..idx + 1);
                idx += 1;
                continue;
            }
        }

        let name_end = scan_tag_name(bytes, idx + 1);
        let Some(gt) = find_tag_end(bytes, name_end) else {
            // Unterminated tag at end of input
            break;
        };

        let name = input[idx + 1..name_end].to_ascii_lowercase();
        let (attributes, self_closing) = lex_attributes(&input[name_end..gt], name_end);
        let after = gt + 1;

        tokens.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
            name_span: idx + 1..name_end,
            span: idx..after,
        });
        idx = after;

        let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str());
        if !self_closing && (raw || RCDATA_ELEMENTS.contains(&name.as_str())) {
            let body_end = find_end_tag(bytes, idx, name.as_bytes()).unwrap_or(bytes.len());
            if body_end > idx {
                let body = &input[idx..body_end];
                tokens.push(Token::Text {
                    text: if raw { body.to_string() } else { decode_entities(body) },
                    raw,
                    span: idx..body_end,
                });
            }
            idx = body_end;
        }
    }

    tokens
}

fn push_text(tokens: &mut Vec<Token>, raw: &str, span: Range<usize>) {
    let decoded = decode_entities(raw);
    if let Some(Token::Text { text, raw: false, span: prev }) = tokens.last_mut() {
        if prev.end == span.start {
            text.push_str(&decoded);
            prev.end = span.end;
            return;
        }
    }
    tokens.push(Token::Text { text: decoded, raw: false, span });
}

/// Lex the part of a start tag after its name. `base` is the byte offset of
/// `interior` in the full input.
fn lex_attributes(interior: &str, base: usize) -> (Vec<Attribute>, bool) {
    let mut lexed = Vec::new();
    let mut lexer = AttrToken::lexer(interior);
    while let Some(token) = lexer.next() {
        // Stray quotes and angle brackets are skipped
        if let Ok(token) = token {
            let span = lexer.span();
            lexed.push((token, base + span.start..base + span.end));
        }
    }

    let mut attributes: Vec<Attribute> = Vec::new();
    let mut self_closing = false;
    let mut iter = lexed.into_iter().peekable();

    while let Some((token, span)) = iter.next() {
        self_closing = false;
        match token {
            AttrToken::Word("/") => self_closing = true,
            AttrToken::Word(name) => {
                let name = name.trim_start_matches('/').to_ascii_lowercase();
                let mut value = String::new();
                let mut value_span = None;

                if matches!(iter.peek(), Some((AttrToken::Equals, _))) {
                    iter.next();
                    match iter.peek() {
                        Some((AttrToken::Quoted(v), s)) | Some((AttrToken::Word(v), s)) => {
                            value = decode_entities(v);
                            value_span = Some(s.clone());
                            iter.next();
                        }
                        _ => {}
                    }
                }

                if name.is_empty() || attributes.iter().any(|a| a.name == name) {
                    continue;
                }
                attributes.push(Attribute {
                    name,
                    value,
                    name_span: span,
                    value_span,
                });
            }
            AttrToken::Equals | AttrToken::Quoted(_) => {}
        }
    }

    (attributes, self_closing)
}

fn scan_tag_name(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() && bytes[idx] != b'/' && bytes[idx] != b'>' {
        idx += 1;
    }
    idx
}

/// Position of the `>` closing a tag, skipping quoted attribute values
fn find_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut idx = start;
    let mut quote: Option<u8> = None;

    while idx < bytes.len() {
        let byte = bytes[idx];
        match quote {
            Some(q) if byte == q => quote = None,
            Some(_) => {}
            None => match byte {
                b'"' | b'\'' if idx > start && is_value_start(bytes, idx) => quote = Some(byte),
                b'>' => return Some(idx),
                _ => {}
            },
        }
        idx += 1;
    }

    None
}

/// A quote only opens a value when it directly follows `=` (ignoring spaces)
fn is_value_start(bytes: &[u8], quote_idx: usize) -> bool {
    let mut idx = quote_idx;
    while idx > 0 {
        idx -= 1;
        match bytes[idx] {
            b if b.is_ascii_whitespace() => continue,
            b'=' => return true,
            _ => return false,
        }
    }
    false
}

/// Start of `</name` (case-insensitive) at or after `start`
fn find_end_tag(bytes: &[u8], start: usize, name: &[u8]) -> Option<usize> {
    let mut idx = start;
    while let Some(lt) = find_byte(bytes, idx, b'<') {
        if bytes.get(lt + 1) == Some(&b'/')
            && starts_with_ignore_case(bytes, lt + 2, name)
            && matches!(bytes.get(lt + 2 + name.len()), None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c'))
        {
            return Some(lt);
        }
        idx = lt + 1;
    }
    None
}

fn skip_past_gt(bytes: &[u8], start: usize) -> usize {
    find_byte(bytes, start, b'>').map(|gt| gt + 1).unwrap_or(bytes.len())
}

fn find_byte(bytes: &[u8], start: usize, needle: u8) -> Option<usize> {
    bytes[start..].iter().position(|&b| b == needle).map(|pos| start + pos)
}

fn find_seq(bytes: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    if start >= bytes.len() {
        return None;
    }
    bytes[start..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| start + pos)
}

fn starts_with(bytes: &[u8], idx: usize, prefix: &[u8]) -> bool {
    bytes.get(idx..idx + prefix.len()) == Some(prefix)
}

fn starts_with_ignore_case(bytes: &[u8], idx: usize, prefix: &[u8]) -> bool {
    bytes
        .get(idx..idx + prefix.len())
        .is_some_and(|slice| slice.eq_ignore_ascii_case(prefix))
}
