use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Free-form labels attached to a document.
///
/// Labels are trimmed, blank labels are dropped and duplicates collapse.
/// Order carries no meaning; iteration is lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Tags {
    inner: BTreeSet<String>,
}

impl Tags {
    pub fn new() -> Self {
        Tags {
            inner: BTreeSet::new(),
        }
    }

    /// Returns `true` if the label was not already present.
    pub fn insert(&mut self, tag: impl AsRef<str>) -> bool {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            return false;
        }
        self.inner.insert(tag.to_string())
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.inner.remove(tag.trim())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.inner.contains(tag.trim())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

// Persisted arrays may carry duplicates or blanks written by older callers.
impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}
