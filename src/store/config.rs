use serde::{Deserialize, Serialize};

use crate::storage::json::DEFAULT_KEY;

pub const STORAGE_KEY_ENV: &str = "DOC_VERSIONS_STORAGE_KEY";
pub const AUTHOR_ENV: &str = "DOC_VERSIONS_AUTHOR";

/// Store settings. Every field has an explicit default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the document mapping is persisted under.
    pub storage_key: String,
    /// Attribution recorded when the caller names no author.
    pub default_author: String,
    /// Comment attached to the first version of every document.
    pub initial_comment: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_KEY.into(),
            default_author: "Sistema".into(),
            initial_comment: "Versão inicial".into(),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `DOC_VERSIONS_STORAGE_KEY` and `DOC_VERSIONS_AUTHOR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(key) = non_empty_var(STORAGE_KEY_ENV) {
            config.storage_key = key;
        }
        if let Some(author) = non_empty_var(AUTHOR_ENV) {
            config.default_author = author;
        }
        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
