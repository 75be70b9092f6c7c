//! HTML element model for landing pages.
//!
//! `parse` turns a stored document into its top-level [`Element`]s and
//! `serialize` turns them back into HTML. Parsing is tolerant and never
//! fails; text and comments outside of any element are dropped.

pub mod ast;
pub mod entities;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::{is_void_element, Element, ElementId, DEFAULT_ELEMENT_TEXT, VOID_ELEMENTS};
pub use error::{ParseError, ParseResult};
pub use id_generator::{new_element_id, IDGenerator};
pub use parser::{normalize_fragment, parse, parse_with_options, text_content, try_parse, ParseOptions};
pub use serializer::{serialize, serialize_with_options, SerializeOptions, Serializer, DEFAULT_PLACEHOLDER_IMAGE};
pub use tokenizer::{tokenize, Token};
