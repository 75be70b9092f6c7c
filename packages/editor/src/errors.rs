//! Error types for the editor

use crate::auth::AuthError;
use crate::persistence::StoreError;
use crate::session::Mode;
use lander_parser::{ElementId, ParseError};
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Operation requires {expected} mode, editor is in {actual} mode")]
    WrongMode { expected: Mode, actual: Mode },

    #[error("No element is rendered as node {0}")]
    UnknownNode(String),

    #[error("Element {0} is no longer on the page")]
    UnknownElement(ElementId),

    #[error("Quick edit panel is not open")]
    QuickEditClosed,
}
