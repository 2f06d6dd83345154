use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ItemStorage;
use crate::error::{StoreError, StoreResult};
use crate::item::{Item, ItemStats};

/// Process-local storage. Items live in a `Vec` so scans come back in
/// insertion order; lookups are linear by id.
#[derive(Debug, Default)]
pub struct MemoryItemStorage {
    items: RwLock<Vec<Item>>,
}

impl MemoryItemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStorage for MemoryItemStorage {
    async fn init(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, item: &Item) -> StoreResult<()> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(StoreError::DuplicateId(item.id.clone()));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items.read().await.clone())
    }

    async fn find(&self, id: &str) -> StoreResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn replace(&self, item: &Item) -> StoreResult<bool> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut items = self.items.write().await;
        match items.iter().position(|item| item.id == id) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self) -> StoreResult<u64> {
        let mut items = self.items.write().await;
        let removed = items.len() as u64;
        items.clear();
        Ok(removed)
    }

    async fn set_all_complete(&self, complete: bool) -> StoreResult<u64> {
        let mut items = self.items.write().await;
        for item in items.iter_mut() {
            item.complete = complete;
        }
        Ok(items.len() as u64)
    }

    async fn remove_completed(&self) -> StoreResult<u64> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| !item.complete);
        Ok((before - items.len()) as u64)
    }

    async fn stats(&self) -> StoreResult<ItemStats> {
        Ok(ItemStats::of(&self.items.read().await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scan_preserves_insertion_order_after_removal() {
        let storage = MemoryItemStorage::new();
        let items: Vec<Item> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|title| Item::new(title).unwrap())
            .collect();
        for item in &items {
            storage.insert(item).await.unwrap();
        }

        assert!(storage.remove(&items[1].id).await.unwrap());

        let titles: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn duplicate_ids_are_refused() {
        let storage = MemoryItemStorage::new();
        let item = Item::new("once").unwrap();
        storage.insert(&item).await.unwrap();

        let err = storage.insert(&item).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == item.id));
        assert_eq!(storage.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replace_reports_missing_rows() {
        let storage = MemoryItemStorage::new();
        let item = Item::new("ghost").unwrap();
        assert!(!storage.replace(&item).await.unwrap());
        assert!(storage.list().await.unwrap().is_empty());
    }
}
