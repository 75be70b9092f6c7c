//! Download of a page's stored HTML.

use lander_common::{Language, Website};
use std::io;
use std::path::{Path, PathBuf};

pub const EXPORT_FILENAME: &str = "index.html";
pub const EXPORT_MIME: &str = "text/html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Write the file into `dir`, returning its path
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Stored content of one language as `index.html`. Empty when the language
/// has never been edited.
pub fn export_download(website: &Website, language: Language) -> Download {
    Download {
        filename: EXPORT_FILENAME.to_string(),
        mime: EXPORT_MIME.to_string(),
        bytes: website.content(language).as_bytes().to_vec(),
    }
}
