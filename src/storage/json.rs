use tracing::warn;

use super::{DocumentMap, KeyValueStore, StorageError, StoragePort};
use crate::store::StoreConfig;

/// Default key the mapping is stored under.
pub const DEFAULT_KEY: &str = "documents";

/// Persists the whole mapping as one JSON object under a single key.
#[derive(Debug, Clone)]
pub struct JsonStorage<K> {
    backend: K,
    key: String,
}

impl<K: KeyValueStore> JsonStorage<K> {
    pub fn new(backend: K) -> Self {
        Self::with_key(backend, DEFAULT_KEY)
    }

    /// Stores under `config.storage_key`.
    pub fn from_config(backend: K, config: &StoreConfig) -> Self {
        Self::with_key(backend, config.storage_key.clone())
    }

    pub fn with_key(backend: K, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }
}

fn decode(raw: &str) -> Result<DocumentMap, String> {
    let documents: DocumentMap = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    for (id, doc) in &documents {
        if id != doc.id() {
            return Err(format!(
                "entry {} holds document {}",
                id.as_str(),
                doc.id().as_str()
            ));
        }
        doc.check_invariants().map_err(|e| e.to_string())?;
    }

    Ok(documents)
}

impl<K: KeyValueStore> StoragePort for JsonStorage<K> {
    fn load(&self) -> Result<DocumentMap, StorageError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(DocumentMap::new());
        };

        match decode(&raw) {
            Ok(documents) => Ok(documents),
            Err(reason) => {
                warn!(key = %self.key, %reason, "discarding unreadable document mapping");
                Ok(DocumentMap::new())
            }
        }
    }

    fn save(&mut self, documents: &DocumentMap) -> Result<(), StorageError> {
        let payload = serde_json::to_string(documents)?;
        self.backend.set(&self.key, &payload)
    }
}
