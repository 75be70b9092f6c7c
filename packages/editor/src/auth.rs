//! Login state, persisted between runs.

use crate::persistence::{PageStore, StoreError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("ユーザーIDまたはパスワードが間違っています")]
    InvalidCredentials,

    #[error("Login request failed: {0}")]
    Store(StoreError),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unauthorized(_) => AuthError::InvalidCredentials,
            other => AuthError::Store(other),
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(e: std::io::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Persisted login record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub is_logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, AuthError>;
    fn save(&self, session: &StoredSession) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<StoredSession>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, AuthError> {
        Ok(self.slot().clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), AuthError> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.slot() = None;
        Ok(())
    }
}

/// Session stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, session: &StoredSession) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Explicit login context, created once and passed to whoever needs it
pub struct AuthSession<S: SessionStorage> {
    storage: S,
    state: StoredSession,
}

impl<S: SessionStorage> AuthSession<S> {
    /// Restore the persisted session, logged out if there is none
    pub fn initialize(storage: S) -> Result<Self, AuthError> {
        let state = storage.load()?.unwrap_or_default();
        Ok(Self { storage, state })
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in
    }

    pub fn user_email(&self) -> Option<&str> {
        self.state.user_email.as_deref()
    }

    pub async fn login(&mut self, store: &dyn PageStore, credentials: &Credentials) -> Result<(), AuthError> {
        match store.login(&credentials.email, &credentials.password).await {
            Ok(response) => {
                self.state = StoredSession {
                    is_logged_in: true,
                    user_email: Some(response.user_email),
                };
                self.storage.save(&self.state)?;
                tracing::info!(email = %credentials.email, "logged in");
                Ok(())
            }
            Err(e) => {
                let error = AuthError::from(e);
                tracing::warn!(email = %credentials.email, %error, "login failed");
                Err(error)
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.state = StoredSession::default();
        self.storage.clear()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPageStore;
    use lander_common::INVALID_CREDENTIALS;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: "owner@example.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let store = MemoryPageStore::new().with_user("owner@example.com", "pw");
        let mut auth = AuthSession::initialize(MemorySessionStorage::new()).unwrap();
        assert!(!auth.is_logged_in());

        auth.login(&store, &credentials("pw")).await.unwrap();
        assert!(auth.is_logged_in());
        assert_eq!(auth.user_email(), Some("owner@example.com"));
        assert!(auth.storage().load().unwrap().unwrap().is_logged_in);

        auth.logout().unwrap();
        assert!(!auth.is_logged_in());
        assert_eq!(auth.storage().load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_credentials_distinct_from_transport() {
        let store = MemoryPageStore::new().with_user("owner@example.com", "pw");
        let mut auth = AuthSession::initialize(MemorySessionStorage::new()).unwrap();

        let error = auth.login(&store, &credentials("nope")).await.unwrap_err();
        assert_eq!(error, AuthError::InvalidCredentials);
        assert_eq!(error.to_string(), INVALID_CREDENTIALS);
        assert!(!auth.is_logged_in());

        let transport = AuthError::from(StoreError::Transport("connection refused".into()));
        assert!(matches!(transport, AuthError::Store(_)));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested").join("session.json"));
        assert_eq!(storage.load().unwrap(), None);

        let session = StoredSession {
            is_logged_in: true,
            user_email: Some("a@b.c".into()),
        };
        storage.save(&session).unwrap();

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\"isLoggedIn\": true"));
        assert!(raw.contains("\"userEmail\": \"a@b.c\""));

        let auth = AuthSession::initialize(storage).unwrap();
        assert_eq!(auth.user_email(), Some("a@b.c"));

        auth.storage().clear().unwrap();
        auth.storage().clear().unwrap();
        assert_eq!(auth.storage().load().unwrap(), None);
    }
}
