use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tags::Tags;
use super::update::DocumentUpdate;
use crate::types::identifiers::{ContentHash, DocumentId, VersionId};

/// Structural rule broken by a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Document {0} has no versions")]
    NoVersions(DocumentId),
    #[error("Current version {current} of document {document} does not exist")]
    CurrentVersionMissing {
        document: DocumentId,
        current: VersionId,
    },
    #[error("Version {version} belongs to document {owner}, not {document}")]
    ForeignVersion {
        document: DocumentId,
        version: VersionId,
        owner: DocumentId,
    },
    #[error("Version {version} of document {document} is numbered 0")]
    ZeroVersionNumber {
        document: DocumentId,
        version: VersionId,
    },
    #[error("Version numbers of document {0} are not strictly increasing")]
    NonMonotonicNumbers(DocumentId),
    #[error("Version id {version} appears twice in document {document}")]
    DuplicateVersionId {
        document: DocumentId,
        version: VersionId,
    },
}

/// Immutable snapshot of a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PersistedVersion")]
pub struct DocumentVersion {
    id: VersionId,
    document_id: DocumentId,
    version: u32,
    content: String,
    content_hash: ContentHash,
    created_at: DateTime<Utc>,
    created_by: String,
    comment: String,
}

impl DocumentVersion {
    fn snapshot(
        document_id: DocumentId,
        version: u32,
        content: String,
        created_by: String,
        comment: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        let content_hash = ContentHash::from_content(content.as_bytes());
        DocumentVersion {
            id: VersionId::generate(),
            document_id,
            version,
            content,
            content_hash,
            created_at,
            created_by,
            comment,
        }
    }

    pub fn id(&self) -> &VersionId {
        &self.id
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// Sequence number within the owning document, starting at 1.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

// Wire shape. Older payloads carry no hash; present hashes must match.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedVersion {
    id: VersionId,
    document_id: DocumentId,
    version: u32,
    content: String,
    #[serde(default)]
    content_hash: Option<ContentHash>,
    created_at: DateTime<Utc>,
    created_by: String,
    #[serde(default)]
    comment: String,
}

impl TryFrom<PersistedVersion> for DocumentVersion {
    type Error = String;

    fn try_from(raw: PersistedVersion) -> Result<Self, Self::Error> {
        let computed = ContentHash::from_content(raw.content.as_bytes());
        if let Some(recorded) = raw.content_hash {
            if recorded != computed {
                return Err(format!(
                    "content hash mismatch for version {}: recorded {}, content hashes to {}",
                    raw.id,
                    recorded.as_str(),
                    computed.as_str(),
                ));
            }
        }

        Ok(DocumentVersion {
            id: raw.id,
            document_id: raw.document_id,
            version: raw.version,
            content: raw.content,
            content_hash: computed,
            created_at: raw.created_at,
            created_by: raw.created_by,
            comment: raw.comment,
        })
    }
}

/// A named unit of versioned content. Owns its versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    title: String,
    current_version_id: VersionId,
    versions: Vec<DocumentVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pillar_id: Option<String>,
    #[serde(default)]
    tags: Tags,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    /// Build a document together with its first version.
    pub(crate) fn create(
        title: String,
        content: String,
        pillar_id: Option<String>,
        tags: Tags,
        author: &str,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let id = DocumentId::generate();
        let first = DocumentVersion::snapshot(
            id.clone(),
            1,
            content,
            author.to_string(),
            comment.to_string(),
            now,
        );

        Document {
            id,
            title,
            current_version_id: first.id.clone(),
            versions: vec![first],
            pillar_id,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn current_version_id(&self) -> &VersionId {
        &self.current_version_id
    }

    pub fn pillar_id(&self) -> Option<&str> {
        self.pillar_id.as_deref()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Versions in the order they were appended.
    pub fn versions(&self) -> &[DocumentVersion] {
        &self.versions
    }

    /// Versions ordered most recent first.
    pub fn versions_desc(&self) -> Vec<DocumentVersion> {
        let mut versions = self.versions.clone();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        versions
    }

    pub fn version(&self, version_id: &VersionId) -> Option<&DocumentVersion> {
        self.versions.iter().find(|v| &v.id == version_id)
    }

    pub fn current_version(&self) -> Option<&DocumentVersion> {
        self.version(&self.current_version_id)
    }

    /// Highest version number assigned so far, 0 for an empty history.
    pub fn latest_version_number(&self) -> u32 {
        self.versions.iter().map(|v| v.version).max().unwrap_or(0)
    }

    /// Append a new snapshot and make it current.
    /// Returns `None`, leaving the document untouched, once numbers run out.
    pub(crate) fn append_version(
        &mut self,
        content: String,
        comment: Option<&str>,
        author: &str,
        now: DateTime<Utc>,
    ) -> Option<&DocumentVersion> {
        let next = self.latest_version_number().checked_add(1)?;
        let comment = match comment {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => format!("Versão {next}"),
        };

        let version = DocumentVersion::snapshot(
            self.id.clone(),
            next,
            content,
            author.to_string(),
            comment,
            now,
        );
        self.current_version_id = version.id.clone();
        self.versions.push(version);
        self.touch(now);

        self.versions.last()
    }

    /// Point the document at one of its existing versions.
    /// Returns `false` and leaves the document untouched if the version is unknown.
    pub(crate) fn repoint(&mut self, version_id: &VersionId, now: DateTime<Utc>) -> bool {
        if self.version(version_id).is_none() {
            return false;
        }
        self.current_version_id = version_id.clone();
        self.touch(now);
        true
    }

    pub(crate) fn apply(&mut self, update: DocumentUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(pillar_id) = update.pillar_id {
            self.pillar_id = pillar_id;
        }
        self.touch(now);
    }

    // updated_at must move forward even when the clock does not.
    fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = if now > self.updated_at { now } else { floor };
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.versions.is_empty() {
            return Err(InvariantViolation::NoVersions(self.id.clone()));
        }

        for (i, v) in self.versions.iter().enumerate() {
            if v.document_id != self.id {
                return Err(InvariantViolation::ForeignVersion {
                    document: self.id.clone(),
                    version: v.id.clone(),
                    owner: v.document_id.clone(),
                });
            }
            if v.version == 0 {
                return Err(InvariantViolation::ZeroVersionNumber {
                    document: self.id.clone(),
                    version: v.id.clone(),
                });
            }
            if self.versions[..i].iter().any(|earlier| earlier.id == v.id) {
                return Err(InvariantViolation::DuplicateVersionId {
                    document: self.id.clone(),
                    version: v.id.clone(),
                });
            }
        }

        if !self.versions.windows(2).all(|w| w[0].version < w[1].version) {
            return Err(InvariantViolation::NonMonotonicNumbers(self.id.clone()));
        }

        if self.current_version().is_none() {
            return Err(InvariantViolation::CurrentVersionMissing {
                document: self.id.clone(),
                current: self.current_version_id.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(now: DateTime<Utc>) -> Document {
        Document::create(
            "Policy".into(),
            "body".into(),
            None,
            Tags::new(),
            "Sistema",
            "Versão inicial",
            now,
        )
    }

    #[test]
    fn touch_advances_even_with_a_frozen_clock() {
        let now = Utc::now();
        let mut doc = fixture(now);
        doc.apply(DocumentUpdate::new(), now);
        assert!(doc.updated_at() > now);
        let after_first = doc.updated_at();
        doc.apply(DocumentUpdate::new(), now);
        assert!(doc.updated_at() > after_first);
    }

    #[test]
    fn empty_comment_falls_back_to_numbered_default() {
        let now = Utc::now();
        let mut doc = fixture(now);
        let v = doc
            .append_version("b2".into(), Some(""), "Sistema", now)
            .unwrap();
        assert_eq!(v.comment(), "Versão 2");
    }

    #[test]
    fn repoint_rejects_unknown_version() {
        let now = Utc::now();
        let mut doc = fixture(now);
        let before = doc.clone();
        assert!(!doc.repoint(&VersionId::from("missing"), now));
        assert_eq!(doc, before);
    }

    #[test]
    fn tampered_content_fails_deserialization() {
        let doc = fixture(Utc::now());
        let mut value = serde_json::to_value(&doc).unwrap();
        value["versions"][0]["content"] = serde_json::Value::String("tampered".into());
        assert!(serde_json::from_value::<Document>(value).is_err());
    }

    #[test]
    fn missing_hash_is_recomputed() {
        let doc = fixture(Utc::now());
        let mut value = serde_json::to_value(&doc).unwrap();
        value["versions"][0]
            .as_object_mut()
            .unwrap()
            .remove("contentHash");
        let restored: Document = serde_json::from_value(value).unwrap();
        assert_eq!(restored, doc);
    }
}
