//! Page storage behind the HTTP API.

use crate::error::{ServerError, ServerResult};
use crate::users::{User, UserDirectory};
use chrono::Utc;
use lander_common::{Language, Website, WebsiteId};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage operations the routes need. Implementations must be shareable
/// across request tasks.
pub trait Store: Send + Sync {
    fn get(&self, id: WebsiteId) -> ServerResult<Website>;

    fn list(&self) -> Vec<Website>;

    /// New page with the default title and an empty document per language
    fn create(&self) -> Website;

    /// Upsert the document of `(id, language)`
    fn update_content(&self, id: WebsiteId, language: Language, content: String) -> ServerResult<Website>;

    fn update_title(&self, id: WebsiteId, title: String) -> ServerResult<Website>;

    fn delete(&self, id: WebsiteId) -> ServerResult<Website>;

    /// Email of the user matching both fields
    fn login(&self, email: &str, password: &str) -> ServerResult<String>;
}

#[derive(Debug, Default)]
struct Tables {
    websites: BTreeMap<WebsiteId, Website>,
    users: UserDirectory,
    next_website_id: WebsiteId,
    next_document_id: i64,
}

impl Tables {
    fn allocate_document_id(next: &mut i64) -> i64 {
        *next += 1;
        *next
    }

    fn website_mut(&mut self, id: WebsiteId) -> ServerResult<&mut Website> {
        self.websites.get_mut(&id).ok_or(ServerError::NotFound(id))
    }
}

/// In-memory store. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        store.write().users = users.into_iter().collect();
        store
    }

    pub fn add_user(&self, user: User) {
        self.write().users.insert(user);
    }

    pub fn len(&self) -> usize {
        self.read().websites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for MemoryStore {
    fn get(&self, id: WebsiteId) -> ServerResult<Website> {
        self.read()
            .websites
            .get(&id)
            .cloned()
            .ok_or(ServerError::NotFound(id))
    }

    fn list(&self) -> Vec<Website> {
        self.read().websites.values().cloned().collect()
    }

    fn create(&self) -> Website {
        let mut tables = self.write();
        tables.next_website_id += 1;
        let id = tables.next_website_id;

        let next_document_id = &mut tables.next_document_id;
        let website = Website::with_default_documents(
            id,
            || Tables::allocate_document_id(next_document_id),
            Utc::now(),
        );
        tables.websites.insert(id, website.clone());
        tracing::info!(id, "website created");
        website
    }

    fn update_content(&self, id: WebsiteId, language: Language, content: String) -> ServerResult<Website> {
        let mut tables = self.write();
        let Tables {
            websites,
            next_document_id,
            ..
        } = &mut *tables;

        let website = websites.get_mut(&id).ok_or(ServerError::NotFound(id))?;
        let created = website.upsert_content(language, content, || {
            Tables::allocate_document_id(next_document_id)
        });
        website.updated_at = Utc::now();
        tracing::debug!(id, %language, created, "content updated");
        Ok(website.clone())
    }

    fn update_title(&self, id: WebsiteId, title: String) -> ServerResult<Website> {
        let mut tables = self.write();
        let website = tables.website_mut(id)?;
        website.title = title;
        website.updated_at = Utc::now();
        tracing::debug!(id, title = %website.title, "title updated");
        Ok(website.clone())
    }

    fn delete(&self, id: WebsiteId) -> ServerResult<Website> {
        let removed = self.write().websites.remove(&id);
        match removed {
            Some(website) => {
                tracing::info!(id, "website deleted");
                Ok(website)
            }
            None => Err(ServerError::NotFound(id)),
        }
    }

    fn login(&self, email: &str, password: &str) -> ServerResult<String> {
        self.read()
            .users
            .verify(email, password)
            .map(|user| user.email.clone())
            .ok_or(ServerError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.create();
        let b = store.create();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.languages(), Language::ALL.to_vec());

        let doc_ids: Vec<i64> = a
            .localized_html
            .iter()
            .chain(&b.localized_html)
            .map(|doc| doc.id)
            .collect();
        assert_eq!(doc_ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_update_content_isolates_languages() {
        let store = MemoryStore::new();
        let id = store.create().id;

        store.update_content(id, Language::EN, "<p>en</p>".into()).unwrap();
        let website = store.get(id).unwrap();
        assert_eq!(website.content(Language::EN), "<p>en</p>");
        assert_eq!(website.content(Language::JP), "");
        assert_eq!(website.localized_html.len(), 4);
    }

    #[test]
    fn test_missing_records() {
        let store = MemoryStore::new();
        assert_eq!(store.get(9), Err(ServerError::NotFound(9)));
        assert_eq!(store.update_title(9, "t".into()), Err(ServerError::NotFound(9)));

        let id = store.create().id;
        assert!(store.delete(id).is_ok());
        assert_eq!(store.delete(id), Err(ServerError::NotFound(id)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_login() {
        let store = MemoryStore::with_users([User::new("owner@example.com", "pw")]);
        assert_eq!(store.login("owner@example.com", "pw").unwrap(), "owner@example.com");
        assert_eq!(store.login("owner@example.com", "no"), Err(ServerError::InvalidCredentials));
    }
}
