//! Pending items waiting to be placed on the timeline.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Something the user wants to do but has not scheduled yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxItem {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub text: String,
}

impl InboxItem {
    /// Trimmed item with a fresh id; blank text yields `None`.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
        })
    }
}

/// Ids were once epoch-millisecond numbers; read either form as text.
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Ordered collection of pending items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inbox {
    items: Vec<InboxItem>,
}

impl From<Vec<InboxItem>> for Inbox {
    fn from(items: Vec<InboxItem>) -> Self {
        Self { items }
    }
}

impl Inbox {
    pub fn items(&self) -> &[InboxItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&InboxItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Append an item; blank text is ignored.
    pub fn add(&mut self, text: &str) -> Option<&InboxItem> {
        let item = InboxItem::new(text)?;
        self.items.push(item);
        self.items.last()
    }

    pub fn remove(&mut self, id: &str) -> Result<InboxItem, ValidationError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| ValidationError::UnknownInboxItem(id.to_string()))?;
        Ok(self.items.remove(pos))
    }
}
