//! Shared domain and wire types for Lander.
//!
//! Everything exchanged between the editor, the persistence server and the
//! CLI lives here so both ends of the HTTP API agree on one shape.

pub mod api;
pub mod error;
pub mod language;
pub mod website;

pub use api::*;
pub use error::*;
pub use language::Language;
pub use website::{LocalizedHtml, Website, WebsiteId, DEFAULT_TITLE};
