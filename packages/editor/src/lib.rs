//! # Lander Editor
//!
//! Editing engine for landing pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: stored HTML ↔ element model         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorSession                        │
//! │  - Visual / Code state machine              │
//! │  - Cursor tracking across re-highlights     │
//! │  - Quick edit, palette, per-language docs   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ persistence: debounced SaveClient           │
//! │  - PageStore over HTTP or in memory         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lander_editor::{EditorSession, HttpPageStore, PaletteItem, SaveClient, SessionOptions};
//!
//! let store = Arc::new(HttpPageStore::new(&config.api_base_url));
//! let website = store.create().await?;
//!
//! let save = SaveClient::spawn(store.clone(), website.id, config.save_config());
//! let mut session = EditorSession::open(&website, Language::JP, SessionOptions::from(&config))
//!     .with_save_client(save);
//!
//! session.drop_palette_item(PaletteItem::Heading)?;
//! // `<h1>ここにテキスト</h1>` is written once the page has been idle for 2s
//! ```

pub mod auth;
pub mod config;
pub mod cursor;
mod errors;
pub mod export;
pub mod highlight;
pub mod localization;
pub mod palette;
pub mod persistence;
pub mod quick_edit;
pub mod render;
mod session;

pub use auth::{AuthError, AuthSession, Credentials, FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use config::EditorConfig;
pub use cursor::{CursorTracker, RenderedBuffer, Selection};
pub use errors::{EditorError, EditorResult};
pub use export::{export_download, Download};
pub use localization::LocalizedDocuments;
pub use palette::{label_for_tag, PaletteItem};
pub use persistence::{
    DelayedTask, HttpPageStore, MemoryPageStore, PageStore, RetryPolicy, SaveClient, SaveConfig, SaveStatus,
    StoreCall, StoreError,
};
pub use quick_edit::QuickEditPanel;
pub use render::CanvasRender;
pub use session::{EditorSession, Mode, SessionOptions};

// Re-export common types for convenience
pub use lander_common::{Language, Website, WebsiteId};
pub use lander_parser::{Element, ElementId};
