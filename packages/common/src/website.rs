use crate::language::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to freshly created pages
pub const DEFAULT_TITLE: &str = "新しいLP";

/// Identifier assigned by the store at creation time
pub type WebsiteId = i64;

/// A persisted landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: WebsiteId,

    pub title: String,

    /// One serialized HTML document per language
    #[serde(default)]
    pub localized_html: Vec<LocalizedHtml>,

    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// The authoritative HTML of one (page, language) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedHtml {
    pub id: i64,
    pub language: Language,
    pub content: String,
}

impl Website {
    /// New page with the default title and one empty document per language,
    /// in [`Language::ALL`] order
    pub fn with_default_documents(
        id: WebsiteId,
        mut next_document_id: impl FnMut() -> i64,
        now: DateTime<Utc>,
    ) -> Self {
        let localized_html = Language::ALL
            .iter()
            .map(|&language| LocalizedHtml {
                id: next_document_id(),
                language,
                content: String::new(),
            })
            .collect();

        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            localized_html,
            created_at: now,
            updated_at: now,
        }
    }

    /// Insert or replace the document of one language. Returns `true` when a
    /// new document was created.
    pub fn upsert_content(
        &mut self,
        language: Language,
        content: impl Into<String>,
        next_document_id: impl FnOnce() -> i64,
    ) -> bool {
        let content = content.into();
        match self.localized_html.iter_mut().find(|doc| doc.language == language) {
            Some(doc) => {
                doc.content = content;
                false
            }
            None => {
                self.localized_html.push(LocalizedHtml {
                    id: next_document_id(),
                    language,
                    content,
                });
                true
            }
        }
    }

    pub fn localized(&self, language: Language) -> Option<&LocalizedHtml> {
        self.localized_html.iter().find(|doc| doc.language == language)
    }

    /// Stored content for a language, empty when the language was never touched
    pub fn content(&self, language: Language) -> &str {
        self.localized(language)
            .map(|doc| doc.content.as_str())
            .unwrap_or("")
    }

    pub fn languages(&self) -> Vec<Language> {
        self.localized_html.iter().map(|doc| doc.language).collect()
    }
}
