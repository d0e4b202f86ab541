use super::tags::Tags;

/// Partial change to a document's metadata.
///
/// Unset fields are left as they are. `pillar_id` distinguishes "leave alone"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub tags: Option<Tags>,
    pub pillar_id: Option<Option<String>>,
}

impl DocumentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn tags<S: AsRef<str>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    pub fn pillar(mut self, pillar_id: impl Into<String>) -> Self {
        self.pillar_id = Some(Some(pillar_id.into()));
        self
    }

    pub fn clear_pillar(mut self) -> Self {
        self.pillar_id = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.tags.is_none() && self.pillar_id.is_none()
    }
}
