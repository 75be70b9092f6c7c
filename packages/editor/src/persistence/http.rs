use super::store::{PageStore, StoreError, StoreResult};
use async_trait::async_trait;
use lander_common::{
    ApiError, DeleteRequest, Language, LoginRequest, LoginResponse, UpdateTitleRequest,
    UpdateTitleResponse, UpdateWebsiteRequest, Website, WebsiteId,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// [`PageStore`] backed by the persistence HTTP API
#[derive(Debug, Clone)]
pub struct HttpPageStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPageStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, id: Option<WebsiteId>) -> StoreResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ApiError>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        tracing::debug!(%status, %message, "store request rejected");

        Err(match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound(id),
            (StatusCode::UNAUTHORIZED, _) => StoreError::Unauthorized(message),
            _ => StoreError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl PageStore for HttpPageStore {
    async fn fetch(&self, id: WebsiteId) -> StoreResult<Website> {
        let request = self.client.get(self.url(&format!("website/{}", id)));
        self.send(request, Some(id)).await
    }

    async fn list(&self) -> StoreResult<Vec<Website>> {
        self.send(self.client.get(self.url("website/getAll")), None).await
    }

    async fn create(&self) -> StoreResult<Website> {
        self.send(self.client.post(self.url("website/create")), None).await
    }

    async fn update_content(&self, id: WebsiteId, language: Language, content: &str) -> StoreResult<Website> {
        let request = self
            .client
            .post(self.url(&format!("website/update/{}", id)))
            .json(&UpdateWebsiteRequest::content(language, content));
        self.send(request, Some(id)).await
    }

    async fn update_title(&self, id: WebsiteId, title: &str) -> StoreResult<Website> {
        let request = self
            .client
            .post(self.url(&format!("website/updateTitle/{}", id)))
            .json(&UpdateTitleRequest {
                title: Some(title.to_string()),
            });
        let response: UpdateTitleResponse = self.send(request, Some(id)).await?;
        Ok(response.website)
    }

    async fn delete(&self, id: WebsiteId) -> StoreResult<Website> {
        let request = self
            .client
            .post(self.url("website/delete"))
            .json(&DeleteRequest::new(id));
        self.send(request, Some(id)).await
    }

    async fn login(&self, email: &str, password: &str) -> StoreResult<LoginResponse> {
        let request = self.client.post(self.url("login")).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        self.send(request, None).await
    }
}
