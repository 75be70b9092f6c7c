//! Request and response bodies of the persistence HTTP API.

use crate::error::{CommonError, CommonResult};
use crate::language::Language;
use crate::website::{Website, WebsiteId};
use serde::{Deserialize, Serialize};

pub const DELETE_FAILED: &str = "削除に失敗しました";
pub const TITLE_UNDEFINED: &str = "Title is undefined";
pub const TITLE_UPDATE_FAILED: &str = "Failed to update the website title";
pub const INVALID_CREDENTIALS: &str = "ユーザーIDまたはパスワードが間違っています";
pub const CONTENT_FIELDS_MISSING: &str = "language and content are required";
pub const NOT_FOUND: &str = "Website not found";

/// Body of `POST /website/update/{id}`
///
/// Either a title, a `{language, content}` pair, or both. The server rejects
/// a body that carries neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWebsiteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdateWebsiteRequest {
    pub fn content(language: Language, content: impl Into<String>) -> Self {
        Self {
            title: None,
            language: Some(language),
            content: Some(content.into()),
        }
    }
}

/// Body of `POST /website/updateTitle/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTitleRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTitleResponse {
    pub website: Website,
}

/// Website id as sent by forms: either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(WebsiteId),
    Text(String),
}

impl IdInput {
    pub fn resolve(&self) -> CommonResult<WebsiteId> {
        match self {
            IdInput::Number(id) => Ok(*id),
            IdInput::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| CommonError::InvalidId(text.clone())),
        }
    }
}

/// Body of `POST /website/delete`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: IdInput,
}

impl DeleteRequest {
    pub fn new(id: WebsiteId) -> Self {
        Self {
            id: IdInput::Number(id),
        }
    }
}

/// Body of `POST /login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "userId")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_email: String,
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
