// All mutations follow the same shape:
// snapshot the touched entry
// mutate in memory
// save the full mapping, or put the snapshot back and fail

use thiserror::Error;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::config::StoreConfig;
use crate::document::{Document, DocumentUpdate, DocumentVersion, Tags};
use crate::storage::{DocumentMap, StorageError, StoragePort};
use crate::types::identifiers::{ContentHash, DocumentId, VersionId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Persistence failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Document {0} has used every version number")]
    VersionsExhausted(DocumentId),
}

/// Result of a content-aware version request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChange {
    /// Content differed from the current version; this is the new one.
    Created(DocumentVersion),
    /// Content matched the current version; nothing was appended.
    Unchanged(DocumentVersion),
}

impl VersionChange {
    pub fn version(&self) -> &DocumentVersion {
        match self {
            VersionChange::Created(v) | VersionChange::Unchanged(v) => v,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, VersionChange::Created(_))
    }
}

/// Outcome of [`DocumentVersionStore::save_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    pub document: Document,
    pub change: VersionChange,
}

/// Sole owner of the document/version mapping.
///
/// Not-found is reported as `None`, `false` or an empty list. Errors are a
/// failed write to the backing store or a document out of version numbers;
/// either way in-memory state is left as it was before the call.
pub struct DocumentVersionStore<P, C = SystemClock> {
    port: P,
    clock: C,
    config: StoreConfig,
    documents: DocumentMap,
}

impl<P: StoragePort> DocumentVersionStore<P, SystemClock> {
    pub fn open(port: P, config: StoreConfig) -> Result<Self, StoreError> {
        Self::with_clock(port, config, SystemClock)
    }
}

impl<P, C> DocumentVersionStore<P, C>
where
    P: StoragePort,
    C: Clock,
{
    pub fn with_clock(port: P, config: StoreConfig, clock: C) -> Result<Self, StoreError> {
        let documents = port.load()?;
        info!(documents = documents.len(), "document store opened");

        Ok(Self {
            port,
            clock,
            config,
            documents,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &P {
        &self.port
    }

    pub fn storage_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Create a document and its first version in one commit.
    pub fn create_document<S: AsRef<str>>(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        pillar_id: Option<&str>,
        tags: impl IntoIterator<Item = S>,
    ) -> Result<Document, StoreError> {
        let document = Document::create(
            title.into(),
            content.into(),
            pillar_id.map(str::to_string),
            tags.into_iter().collect::<Tags>(),
            &self.config.default_author,
            &self.config.initial_comment,
            self.clock.now(),
        );
        let id = document.id().clone();

        self.documents.insert(id.clone(), document.clone());
        self.commit(&id, None)?;

        debug!(document = %id, version = %document.current_version_id(), "document created");
        Ok(document)
    }

    pub fn get_document(&self, document_id: &DocumentId) -> Option<Document> {
        self.documents.get(document_id).cloned()
    }

    /// All documents, ordered by id.
    pub fn get_all_documents(&self) -> Vec<Document> {
        self.documents.values().cloned().collect()
    }

    pub fn get_documents_by_pillar(&self, pillar_id: &str) -> Vec<Document> {
        self.documents
            .values()
            .filter(|doc| doc.pillar_id() == Some(pillar_id))
            .cloned()
            .collect()
    }

    /// Append a version attributed to the configured default author.
    ///
    /// Always appends, even when `content` equals the current version; use
    /// [`create_version_if_changed`](Self::create_version_if_changed) to skip
    /// no-op snapshots.
    pub fn create_version(
        &mut self,
        document_id: &DocumentId,
        content: impl Into<String>,
        comment: Option<&str>,
    ) -> Result<Option<DocumentVersion>, StoreError> {
        let author = self.config.default_author.clone();
        self.create_version_by(document_id, &author, content, comment)
    }

    pub fn create_version_by(
        &mut self,
        document_id: &DocumentId,
        author: &str,
        content: impl Into<String>,
        comment: Option<&str>,
    ) -> Result<Option<DocumentVersion>, StoreError> {
        let now = self.clock.now();
        let Some(doc) = self.documents.get_mut(document_id) else {
            return Ok(None);
        };

        let previous = doc.clone();
        let Some(version) = doc.append_version(content.into(), comment, author, now).cloned()
        else {
            return Err(StoreError::VersionsExhausted(document_id.clone()));
        };
        self.commit(document_id, Some(previous))?;

        debug!(document = %document_id, version = version.version(), "version created");
        Ok(Some(version))
    }

    /// Append a version only if `content` differs from the current one.
    pub fn create_version_if_changed(
        &mut self,
        document_id: &DocumentId,
        content: impl Into<String>,
        comment: Option<&str>,
    ) -> Result<Option<VersionChange>, StoreError> {
        let content = content.into();
        let Some(doc) = self.documents.get(document_id) else {
            return Ok(None);
        };

        if let Some(current) = unchanged_current(doc, &content) {
            debug!(document = %document_id, "content unchanged, no version created");
            return Ok(Some(VersionChange::Unchanged(current)));
        }

        Ok(self
            .create_version(document_id, content, comment)?
            .map(VersionChange::Created))
    }

    /// Editor save: apply a metadata update and, if the content changed,
    /// append a version. Both land in a single write.
    pub fn save_document(
        &mut self,
        document_id: &DocumentId,
        update: DocumentUpdate,
        content: impl Into<String>,
        comment: Option<&str>,
    ) -> Result<Option<SavedDocument>, StoreError> {
        let content = content.into();
        let now = self.clock.now();
        let Some(doc) = self.documents.get_mut(document_id) else {
            return Ok(None);
        };

        let previous = doc.clone();
        doc.apply(update, now);
        let change = match unchanged_current(doc, &content) {
            Some(current) => VersionChange::Unchanged(current),
            None => {
                let appended = doc
                    .append_version(content, comment, &self.config.default_author, now)
                    .cloned();
                match appended {
                    Some(version) => VersionChange::Created(version),
                    None => {
                        *doc = previous;
                        return Err(StoreError::VersionsExhausted(document_id.clone()));
                    }
                }
            }
        };
        let document = doc.clone();
        self.commit(document_id, Some(previous))?;

        debug!(
            document = %document_id,
            created = change.is_created(),
            version = change.version().version(),
            "document saved"
        );
        Ok(Some(SavedDocument { document, change }))
    }

    pub fn get_version(
        &self,
        document_id: &DocumentId,
        version_id: &VersionId,
    ) -> Option<DocumentVersion> {
        self.documents
            .get(document_id)
            .and_then(|doc| doc.version(version_id))
            .cloned()
    }

    /// Versions of a document, most recent first. Empty for unknown documents.
    pub fn get_versions(&self, document_id: &DocumentId) -> Vec<DocumentVersion> {
        self.documents
            .get(document_id)
            .map(Document::versions_desc)
            .unwrap_or_default()
    }

    pub fn current_version(&self, document_id: &DocumentId) -> Option<DocumentVersion> {
        self.documents
            .get(document_id)
            .and_then(Document::current_version)
            .cloned()
    }

    /// Make an existing version current again. History is not touched.
    ///
    /// Returns `false` if the document is unknown or the version does not
    /// belong to it.
    pub fn restore_version(
        &mut self,
        document_id: &DocumentId,
        version_id: &VersionId,
    ) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let Some(doc) = self.documents.get_mut(document_id) else {
            return Ok(false);
        };

        let previous = doc.clone();
        if !doc.repoint(version_id, now) {
            debug!(document = %document_id, version = %version_id, "restore target not found");
            return Ok(false);
        }
        self.commit(document_id, Some(previous))?;

        debug!(document = %document_id, version = %version_id, "version restored");
        Ok(true)
    }

    /// Merge metadata changes. Versions and the current version are untouched.
    pub fn update_document(
        &mut self,
        document_id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<Option<Document>, StoreError> {
        let now = self.clock.now();
        let Some(doc) = self.documents.get_mut(document_id) else {
            return Ok(None);
        };

        let previous = doc.clone();
        doc.apply(update, now);
        let document = doc.clone();
        self.commit(document_id, Some(previous))?;

        debug!(document = %document_id, "document updated");
        Ok(Some(document))
    }

    /// Remove a document together with all of its versions.
    pub fn delete_document(&mut self, document_id: &DocumentId) -> Result<bool, StoreError> {
        let Some(previous) = self.documents.remove(document_id) else {
            return Ok(false);
        };
        self.commit(document_id, Some(previous))?;

        debug!(document = %document_id, "document deleted");
        Ok(true)
    }

    fn commit(
        &mut self,
        document_id: &DocumentId,
        previous: Option<Document>,
    ) -> Result<(), StoreError> {
        if let Err(e) = self.port.save(&self.documents) {
            match previous {
                Some(doc) => {
                    self.documents.insert(document_id.clone(), doc);
                }
                None => {
                    self.documents.remove(document_id);
                }
            }
            warn!(document = %document_id, error = %e, "write failed, change rolled back");
            return Err(e.into());
        }
        Ok(())
    }
}

fn unchanged_current(doc: &Document, content: &str) -> Option<DocumentVersion> {
    let current = doc.current_version()?;
    let hash = ContentHash::from_content(content.as_bytes());
    (current.content_hash() == &hash).then(|| current.clone())
}
