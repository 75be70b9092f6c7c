use async_trait::async_trait;
use lander_common::{Language, LoginResponse, Website, WebsiteId};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Website {0} not found")]
    NotFound(WebsiteId),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Transport(e.to_string())
        }
    }
}

/// Persistence backend for pages
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn fetch(&self, id: WebsiteId) -> StoreResult<Website>;

    async fn list(&self) -> StoreResult<Vec<Website>>;

    /// Create a page with the default title and an empty document per language
    async fn create(&self) -> StoreResult<Website>;

    /// Upsert the document of one language. Never touches the title.
    async fn update_content(&self, id: WebsiteId, language: Language, content: &str) -> StoreResult<Website>;

    /// Rename a page. Never carries content.
    async fn update_title(&self, id: WebsiteId, title: &str) -> StoreResult<Website>;

    /// Delete a page, returning the removed record
    async fn delete(&self, id: WebsiteId) -> StoreResult<Website>;

    async fn login(&self, email: &str, password: &str) -> StoreResult<LoginResponse>;
}
