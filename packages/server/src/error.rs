use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lander_common::{
    ApiError, WebsiteId, CONTENT_FIELDS_MISSING, DELETE_FAILED, INVALID_CREDENTIALS, NOT_FOUND,
    TITLE_UNDEFINED, TITLE_UPDATE_FAILED,
};
use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("Website not found: {0}")]
    NotFound(WebsiteId),

    #[error("{}", CONTENT_FIELDS_MISSING)]
    ContentFieldsMissing,

    #[error("{}", TITLE_UNDEFINED)]
    TitleUndefined,

    #[error("{}", TITLE_UPDATE_FAILED)]
    TitleUpdateFailed,

    #[error("{}", DELETE_FAILED)]
    DeleteFailed,

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::ContentFieldsMissing | ServerError::TitleUndefined => StatusCode::BAD_REQUEST,
            ServerError::TitleUpdateFailed | ServerError::DeleteFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message placed in the `{error}` body
    pub fn message(&self) -> &'static str {
        match self {
            ServerError::NotFound(_) => NOT_FOUND,
            ServerError::ContentFieldsMissing => CONTENT_FIELDS_MISSING,
            ServerError::TitleUndefined => TITLE_UNDEFINED,
            ServerError::TitleUpdateFailed => TITLE_UPDATE_FAILED,
            ServerError::DeleteFailed => DELETE_FAILED,
            ServerError::InvalidCredentials => INVALID_CREDENTIALS,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(ApiError::new(self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServerError::NotFound(1).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::TitleUndefined.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::DeleteFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ServerError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServerError::DeleteFailed.message(), "削除に失敗しました");
    }
}
