//! Item Store
//!
//! Owns the persisted bookmark list: one JSON array under one key.
//! Every read goes through `load`, every mutation through `mutate`
//! (fresh load, pure edit, full save). There is no version check, so two
//! overlapping mutations resolve as last-writer-wins.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, ItemList};
use super::kv::KeyValueStore;

/// Key the list is stored under
pub const STORAGE_KEY: &str = "items";

#[derive(Clone)]
pub struct ItemStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl ItemStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, STORAGE_KEY)
    }

    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    /// Read the current list.
    ///
    /// A missing entry or one that does not deserialize into a list of items
    /// reads as empty. Only a backend failure is returned as an error.
    pub async fn load(&self) -> DomainResult<ItemList> {
        let Some(blob) = self.kv.get(&self.key).await? else {
            return Ok(ItemList::new());
        };

        match serde_json::from_str::<ItemList>(&blob) {
            Ok(list) => Ok(list),
            Err(e) => {
                log::warn!("Ignoring unreadable '{}' entry: {}", self.key, e);
                Ok(ItemList::new())
            }
        }
    }

    /// Write the whole list as one value
    pub async fn save(&self, list: &ItemList) -> DomainResult<()> {
        let blob = serde_json::to_string(list)
            .map_err(|e| DomainError::Storage(format!("Failed to serialize items: {}", e)))?;
        self.kv.set(&self.key, &blob).await
    }

    /// Fresh identifier for a new item
    pub fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Load, apply `f`, save. Returns what `f` produced alongside the saved list.
    ///
    /// The save happens even when `f` leaves the list unchanged.
    pub async fn mutate<F, R>(&self, f: F) -> DomainResult<(ItemList, R)>
    where
        F: FnOnce(&mut ItemList) -> R + Send,
        R: Send,
    {
        let mut list = self.load().await?;
        let result = f(&mut list);
        self.save(&list).await?;
        Ok((list, result))
    }
}
