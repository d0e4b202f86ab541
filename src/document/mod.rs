pub mod document;
pub mod tags;
pub mod update;

pub use crate::types::identifiers::{ContentHash, DocumentId, VersionId};
pub use document::{Document, DocumentVersion, InvariantViolation};
pub use tags::Tags;
pub use update::DocumentUpdate;
