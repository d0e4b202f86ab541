//! Append-only document version store.
//!
//! `doc-versions` keeps, per logical document, a chain of immutable content
//! snapshots and a pointer to the current one. Restoring an older snapshot
//! moves the pointer; history is never rewritten or renumbered.
//!
//! The whole `document id → document` mapping is persisted as one JSON value
//! through a [`storage::StoragePort`], so the backing medium can be swapped
//! without touching [`store::DocumentVersionStore`].

pub mod document;
pub mod storage;
pub mod store;
pub mod types;

pub use document::{Document, DocumentUpdate, DocumentVersion, Tags};
pub use storage::{FileStore, JsonStorage, MemoryStore};
pub use store::{DocumentVersionStore, StoreConfig, StoreError, VersionChange};
pub use types::{DocumentId, VersionId};
