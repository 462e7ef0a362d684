//! Item Repository Implementation
//!
//! `Repository<Item>` over the single-blob `ItemStore`. Each call is one
//! load -> compute -> save sequence against freshly loaded state.

use async_trait::async_trait;

use crate::domain::{DomainResult, Item, ItemFields};
use super::item_store::ItemStore;
use super::traits::Repository;

#[derive(Clone)]
pub struct ItemRepository {
    store: ItemStore,
}

impl ItemRepository {
    pub fn new(store: ItemStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    async fn list(&self) -> DomainResult<Vec<Item>> {
        Ok(self.store.load().await?.into_vec())
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Item>> {
        let list = self.store.load().await?;
        Ok(list.get(id).cloned())
    }

    async fn create(&self, fields: ItemFields) -> DomainResult<Item> {
        let item = Item::new(self.store.generate_id(), fields);
        let created = item.clone();
        self.store.mutate(move |list| list.push(item)).await?;
        log::info!("Created item {}", created.id);
        Ok(created)
    }

    async fn update(&self, id: &String, fields: ItemFields) -> DomainResult<Option<Item>> {
        let (_, updated) = self.store.mutate(|list| list.replace(id, fields)).await?;
        match &updated {
            Some(item) => log::info!("Updated item {}", item.id),
            None => log::warn!("Item {} vanished before update; list saved unchanged", id),
        }
        Ok(updated)
    }

    async fn delete(&self, id: &String) -> DomainResult<bool> {
        let (_, removed) = self.store.mutate(|list| list.remove(id)).await?;
        if removed {
            log::info!("Deleted item {}", id);
        } else {
            log::debug!("Delete of unknown item {} was a no-op", id);
        }
        Ok(removed)
    }
}
