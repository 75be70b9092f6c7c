//! Per-language documents of one page.

use lander_common::{Language, LocalizedHtml, Website};

/// Ordered set of localized documents, at most one per language
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalizedDocuments {
    documents: Vec<LocalizedHtml>,
}

impl LocalizedDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents of a stored page. Later duplicates of a language are ignored.
    pub fn from_website(website: &Website) -> Self {
        let mut docs = Self::new();
        for doc in &website.localized_html {
            if !docs.contains(doc.language) {
                docs.documents.push(doc.clone());
            }
        }
        docs
    }

    /// Content for a language, creating an empty entry on first touch
    pub fn select(&mut self, language: Language) -> &str {
        let index = match self.position(language) {
            Some(index) => index,
            None => {
                self.documents.push(LocalizedHtml {
                    id: 0,
                    language,
                    content: String::new(),
                });
                self.documents.len() - 1
            }
        };
        &self.documents[index].content
    }

    pub fn content(&self, language: Language) -> Option<&str> {
        self.position(language).map(|index| self.documents[index].content.as_str())
    }

    /// Replace one language's content. Other entries are left untouched.
    pub fn set_content(&mut self, language: Language, content: impl Into<String>) {
        let content = content.into();
        match self.position(language) {
            Some(index) => self.documents[index].content = content,
            None => self.documents.push(LocalizedHtml {
                id: 0,
                language,
                content,
            }),
        }
    }

    pub fn languages(&self) -> Vec<Language> {
        self.documents.iter().map(|doc| doc.language).collect()
    }

    pub fn contains(&self, language: Language) -> bool {
        self.position(language).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalizedHtml> {
        self.documents.iter()
    }

    pub fn into_vec(self) -> Vec<LocalizedHtml> {
        self.documents
    }

    fn position(&self, language: Language) -> Option<usize> {
        self.documents.iter().position(|doc| doc.language == language)
    }
}
