//! Item Entity
//!
//! A bookmark: a titled URL with a symbolic icon. Items live in one ordered
//! list that is persisted as a whole.

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

/// Icon used when the host does not supply one
pub const DEFAULT_ICON: &str = "globe";

/// A single bookmark record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, generated at creation and never changed
    pub id: String,
    pub title: String,
    pub url: String,
    /// Name from the host's icon set; stored as-is
    pub icon: String,
}

/// The editable fields of an item, as carried by the editor form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub title: String,
    pub url: String,
    pub icon: String,
}

impl ItemFields {
    pub fn new(title: impl Into<String>, url: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }

    /// Title and url must be non-empty after trimming. Nothing else is checked:
    /// the url need not parse and the icon is opaque.
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("title must not be empty".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(DomainError::InvalidInput("url must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Item {
    pub fn new(id: String, fields: ItemFields) -> Self {
        Self {
            id,
            title: fields.title,
            url: fields.url,
            icon: fields.icon,
        }
    }

    /// Copy of this item with `fields` laid over it; the id is kept
    pub fn overlay(&self, fields: ItemFields) -> Self {
        Self::new(self.id.clone(), fields)
    }

    pub fn fields(&self) -> ItemFields {
        ItemFields::new(self.title.clone(), self.url.clone(), self.icon.clone())
    }
}

impl Entity for Item {
    type Id = String;
    type Fields = ItemFields;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Ordered bookmark list; insertion order is display order.
///
/// Serialized as a bare JSON array of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemList(Vec<Item>);

impl ItemList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.0.iter().find(|item| item.id == id)
    }

    /// Append at the end (newest last)
    pub fn push(&mut self, item: Item) {
        self.0.push(item);
    }

    /// Overlay `fields` onto the item with `id`. Returns the updated item, or
    /// `None` (list untouched) when no item has that id.
    pub fn replace(&mut self, id: &str, fields: ItemFields) -> Option<Item> {
        let slot = self.0.iter_mut().find(|item| item.id == id)?;
        *slot = slot.overlay(fields);
        Some(slot.clone())
    }

    /// Remove the item with `id`, keeping the relative order of the rest.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|item| item.id != id);
        self.0.len() != before
    }

    pub fn into_vec(self) -> Vec<Item> {
        self.0
    }
}

impl From<Vec<Item>> for ItemList {
    fn from(items: Vec<Item>) -> Self {
        Self(items)
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
