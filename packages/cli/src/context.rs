use anyhow::Result;
use lander_common::{Language, WebsiteId};
use lander_editor::{
    EditorConfig, EditorSession, FileSessionStorage, HttpPageStore, MemoryPageStore, PageStore, SaveClient,
    SessionOptions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory holding per-project CLI state
pub const STATE_DIR: &str = ".lander";
pub const SESSION_FILE: &str = "session.json";

/// Everything a command needs: project directory, config and the store
pub struct Context {
    pub cwd: PathBuf,
    pub config: EditorConfig,
    pub store: Arc<dyn PageStore>,
}

impl Context {
    /// Load `lander.config.json` from `cwd` and connect to the configured API.
    /// `api` overrides the configured base url. Offline contexts use a
    /// throwaway in-process store.
    pub fn load(cwd: impl Into<PathBuf>, api: Option<String>, offline: bool) -> Result<Self> {
        let cwd = cwd.into();
        let mut config = EditorConfig::load(&cwd)?;
        if let Some(api) = api {
            config.api_base_url = api;
        }

        let store: Arc<dyn PageStore> = if offline {
            tracing::debug!("using in-memory store");
            Arc::new(MemoryPageStore::new())
        } else {
            tracing::debug!(api = %config.api_base_url, "using store");
            Arc::new(HttpPageStore::new(config.api_base_url.clone()))
        };
        Ok(Self::with_store(cwd, config, store))
    }

    pub fn with_store(cwd: impl Into<PathBuf>, config: EditorConfig, store: Arc<dyn PageStore>) -> Self {
        Self {
            cwd: cwd.into(),
            config,
            store,
        }
    }

    pub fn language(&self, language: Option<Language>) -> Language {
        language.unwrap_or(self.config.default_language)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }

    pub fn session_storage(&self) -> FileSessionStorage {
        FileSessionStorage::new(self.cwd.join(STATE_DIR).join(SESSION_FILE))
    }

    /// Fetch a page and open it in an editor session wired to a save client
    pub async fn open_session(&self, id: WebsiteId, language: Language) -> Result<EditorSession> {
        let website = self.store.fetch(id).await?;
        let save = SaveClient::spawn(self.store.clone(), website.id, self.config.save_config());
        Ok(EditorSession::open(&website, language, SessionOptions::from(&self.config)).with_save_client(save))
    }
}

/// Write out everything the session has scheduled and report the outcome
pub async fn finish(session: &EditorSession) -> Result<()> {
    if let Some(save) = session.save_client() {
        save.flush().await;
    }
    match session.save_status().last_error {
        Some(error) => Err(anyhow::anyhow!("Save failed: {}", error)),
        None => Ok(()),
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Context over an in-memory store rooted in `cwd`
    pub fn memory_context_in(cwd: &Path) -> (MemoryPageStore, Context) {
        let store = MemoryPageStore::new().with_user("owner@example.com", "secret");
        let ctx = Context::with_store(cwd, EditorConfig::default(), Arc::new(store.clone()));
        (store, ctx)
    }

    pub fn memory_context() -> (MemoryPageStore, Context) {
        memory_context_in(&std::env::temp_dir())
    }

    #[test]
    fn test_language_falls_back_to_config() {
        let (_, mut ctx) = memory_context();
        ctx.config.default_language = Language::TW;
        assert_eq!(ctx.language(None), Language::TW);
        assert_eq!(ctx.language(Some(Language::EN)), Language::EN);
        assert!(ctx.session_storage().path().ends_with(".lander/session.json"));
    }

    #[tokio::test]
    async fn test_offline_context_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::load(dir.path(), None, true).unwrap();
        assert!(ctx.store.list().await.unwrap().is_empty());
        assert_eq!(ctx.store.create().await.unwrap().id, 1);
    }
}
