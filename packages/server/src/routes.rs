use crate::error::{ServerError, ServerResult};
use crate::store::Store;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use lander_common::{
    DeleteRequest, LoginRequest, LoginResponse, UpdateTitleRequest, UpdateTitleResponse,
    UpdateWebsiteRequest, Website, WebsiteId,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// The full HTTP API
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/website/getAll", get(list_websites))
        .route("/website/create", post(create_website))
        .route("/website/update/:id", post(update_website))
        .route("/website/updateTitle/:id", post(update_title))
        .route("/website/delete", post(delete_website))
        .route("/website/:id", get(get_website))
        .route("/login", post(login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_website(
    State(state): State<AppState>,
    Path(id): Path<WebsiteId>,
) -> ServerResult<Json<Website>> {
    state.store.get(id).map(Json)
}

async fn list_websites(State(state): State<AppState>) -> Json<Vec<Website>> {
    Json(state.store.list())
}

async fn create_website(State(state): State<AppState>) -> Json<Website> {
    Json(state.store.create())
}

/// Upserts one language's document and/or renames. Nothing is written unless
/// the body is complete; a half-filled language/content pair is rejected even
/// when a title is present.
async fn update_website(
    State(state): State<AppState>,
    Path(id): Path<WebsiteId>,
    Json(request): Json<UpdateWebsiteRequest>,
) -> ServerResult<Json<Website>> {
    let content = match (request.language, request.content) {
        (Some(language), Some(content)) => Some((language, content)),
        (None, None) if request.title.is_some() => None,
        _ => return Err(ServerError::ContentFieldsMissing),
    };

    let mut website = state.store.get(id)?;
    if let Some(title) = request.title {
        website = state.store.update_title(id, title)?;
    }
    if let Some((language, content)) = content {
        website = state.store.update_content(id, language, content)?;
    }
    Ok(Json(website))
}

async fn update_title(
    State(state): State<AppState>,
    Path(id): Path<WebsiteId>,
    Json(request): Json<UpdateTitleRequest>,
) -> ServerResult<Json<UpdateTitleResponse>> {
    let title = request.title.ok_or(ServerError::TitleUndefined)?;
    let website = state.store.update_title(id, title).map_err(|e| {
        tracing::warn!(id, error = %e, "title update failed");
        ServerError::TitleUpdateFailed
    })?;
    Ok(Json(UpdateTitleResponse { website }))
}

async fn delete_website(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> ServerResult<Json<Website>> {
    let id = request.id.resolve().map_err(|e| {
        tracing::warn!(error = %e, "delete with unusable id");
        ServerError::DeleteFailed
    })?;
    let website = state.store.delete(id).map_err(|e| {
        tracing::warn!(id, error = %e, "delete failed");
        ServerError::DeleteFailed
    })?;
    Ok(Json(website))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<LoginResponse>> {
    let user_email = state.store.login(&request.email, &request.password)?;
    tracing::info!(email = %user_email, "login");
    Ok(Json(LoginResponse { user_email }))
}
