use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content language of a landing page variant.
///
/// The set is closed: a page carries at most one document per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    JP,
    EN,
    TW,
    CN,
}

impl Language {
    /// Every supported language, in the order new pages are seeded.
    pub const ALL: [Language; 4] = [Language::JP, Language::EN, Language::TW, Language::CN];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JP => "JP",
            Language::EN => "EN",
            Language::TW => "TW",
            Language::CN => "CN",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::JP
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JP" | "JA" => Ok(Language::JP),
            "EN" => Ok(Language::EN),
            "TW" => Ok(Language::TW),
            "CN" | "ZH" => Ok(Language::CN),
            _ => Err(CommonError::UnknownLanguage(s.to_string())),
        }
    }
}
