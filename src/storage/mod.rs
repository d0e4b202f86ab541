pub mod file;
pub mod json;
pub mod memory;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::document::Document;
use crate::types::identifiers::DocumentId;

pub use file::FileStore;
pub use json::JsonStorage;
pub use memory::MemoryStore;

/// The full persisted state: every document keyed by its id.
pub type DocumentMap = BTreeMap<DocumentId, Document>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Write rejected by backing store: {0}")]
    WriteRejected(String),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Local persistent key-value medium holding string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Loads and saves the whole document mapping at once.
pub trait StoragePort {
    /// Missing or invalid data yields an empty mapping, not an error.
    fn load(&self) -> Result<DocumentMap, StorageError>;
    fn save(&mut self, documents: &DocumentMap) -> Result<(), StorageError>;
}
