//! HTTP JSON persistence API for Lander pages.
//!
//! ```text
//! client ──JSON──▶ axum Router (routes) ──▶ Store ──▶ MemoryStore (Arc<RwLock<…>>)
//!                        │
//!                        └── ServerError ──▶ (StatusCode, {error})
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod store;
pub mod users;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use routes::{app, AppState};
pub use store::{MemoryStore, Store};
pub use users::{User, UserDirectory};
