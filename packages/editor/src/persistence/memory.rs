use super::store::{PageStore, StoreError, StoreResult};
use async_trait::async_trait;
use lander_common::{Language, LoginResponse, Website, WebsiteId, INVALID_CREDENTIALS};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Call received by a [`MemoryPageStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch(WebsiteId),
    List,
    Create,
    UpdateContent {
        id: WebsiteId,
        language: Language,
        content: String,
    },
    UpdateTitle {
        id: WebsiteId,
        title: String,
    },
    Delete(WebsiteId),
    Login {
        email: String,
    },
}

#[derive(Default)]
struct MemoryState {
    websites: BTreeMap<WebsiteId, Website>,
    users: Vec<(String, String)>,
    next_id: i64,
    next_document_id: i64,
    calls: Vec<StoreCall>,
    failures: VecDeque<StoreError>,
    latencies: VecDeque<Duration>,
}

impl MemoryState {
    fn create(&mut self) -> Website {
        self.next_id += 1;
        let id = self.next_id;
        let next_document_id = &mut self.next_document_id;
        let website = Website::with_default_documents(
            id,
            || {
                *next_document_id += 1;
                *next_document_id
            },
            chrono::Utc::now(),
        );
        self.websites.insert(id, website.clone());
        website
    }

    fn website_mut(&mut self, id: WebsiteId) -> StoreResult<&mut Website> {
        self.websites.get_mut(&id).ok_or(StoreError::NotFound(id))
    }
}

/// In-process [`PageStore`] that records every call
///
/// Clones share the same pages. Failures and per-call latency can be queued to
/// exercise error and reordering paths.
#[derive(Clone, Default)]
pub struct MemoryPageStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.lock().users.push((email.into(), password.into()));
        self
    }

    /// Seed a page directly, bypassing call recording
    pub fn insert(&self, website: Website) {
        let mut state = self.lock();
        state.next_id = state.next_id.max(website.id);
        state.websites.insert(website.id, website);
    }

    pub fn get(&self, id: WebsiteId) -> Option<Website> {
        self.lock().websites.get(&id).cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Content writes received so far
    pub fn content_writes(&self) -> Vec<(Language, String)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::UpdateContent { language, content, .. } => Some((*language, content.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn title_writes(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::UpdateTitle { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    /// Make the next write (content, title or delete) fail
    pub fn fail_next(&self, error: StoreError) {
        self.lock().failures.push_back(error);
    }

    /// Delay the next write by `latency`
    pub fn delay_next(&self, latency: Duration) {
        self.lock().latencies.push_back(latency);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves the maps consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: StoreCall) {
        self.lock().calls.push(call);
    }

    /// Queued latency and failure for the next write
    async fn write_hooks(&self) -> StoreResult<()> {
        let latency = self.lock().latencies.pop_front();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.lock().failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn fetch(&self, id: WebsiteId) -> StoreResult<Website> {
        self.record(StoreCall::Fetch(id));
        self.get(id).ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> StoreResult<Vec<Website>> {
        self.record(StoreCall::List);
        Ok(self.lock().websites.values().cloned().collect())
    }

    async fn create(&self) -> StoreResult<Website> {
        self.record(StoreCall::Create);
        Ok(self.lock().create())
    }

    async fn update_content(&self, id: WebsiteId, language: Language, content: &str) -> StoreResult<Website> {
        self.record(StoreCall::UpdateContent {
            id,
            language,
            content: content.to_string(),
        });
        self.write_hooks().await?;

        let mut state = self.lock();
        state.next_document_id += 1;
        let document_id = state.next_document_id;
        let website = state.website_mut(id)?;
        website.upsert_content(language, content, || document_id);
        website.updated_at = chrono::Utc::now();
        Ok(website.clone())
    }

    async fn update_title(&self, id: WebsiteId, title: &str) -> StoreResult<Website> {
        self.record(StoreCall::UpdateTitle {
            id,
            title: title.to_string(),
        });
        self.write_hooks().await?;

        let mut state = self.lock();
        let website = state.website_mut(id)?;
        website.title = title.to_string();
        website.updated_at = chrono::Utc::now();
        Ok(website.clone())
    }

    async fn delete(&self, id: WebsiteId) -> StoreResult<Website> {
        self.record(StoreCall::Delete(id));
        self.write_hooks().await?;
        self.lock().websites.remove(&id).ok_or(StoreError::NotFound(id))
    }

    async fn login(&self, email: &str, password: &str) -> StoreResult<LoginResponse> {
        self.record(StoreCall::Login {
            email: email.to_string(),
        });
        let known = self
            .lock()
            .users
            .iter()
            .any(|(user, secret)| user == email && secret == password);
        if known {
            Ok(LoginResponse {
                user_email: email.to_string(),
            })
        } else {
            Err(StoreError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}
