use crate::errors::EditorResult;
use crate::persistence::{RetryPolicy, SaveConfig};
use lander_common::Language;
use lander_parser::{SerializeOptions, DEFAULT_PLACEHOLDER_IMAGE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "lander.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Base URL of the persistence API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    #[serde(default = "default_saved_flash_ms")]
    pub saved_flash_ms: u64,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    #[serde(default)]
    pub default_language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_save_debounce_ms() -> u64 {
    2000
}

fn default_saved_flash_ms() -> u64 {
    2000
}

fn default_placeholder_image() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            save_debounce_ms: default_save_debounce_ms(),
            saved_flash_ms: default_saved_flash_ms(),
            retry: RetryConfig::default(),
            placeholder_image: default_placeholder_image(),
            default_language: Language::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when the file
    /// does not exist
    pub fn load(cwd: impl AsRef<Path>) -> EditorResult<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn save_config(&self) -> SaveConfig {
        SaveConfig {
            debounce: Duration::from_millis(self.save_debounce_ms),
            saved_flash: Duration::from_millis(self.saved_flash_ms),
            retry: RetryPolicy {
                max_attempts: self.retry.max_attempts.max(1),
                backoff: Duration::from_millis(self.retry.backoff_ms),
            },
        }
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            placeholder_image: self.placeholder_image.clone(),
        }
    }
}
