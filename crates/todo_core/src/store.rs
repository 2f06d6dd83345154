use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::item::{validate_title, Item, ItemStats, ItemUpdate};
use crate::storage::{ItemStorage, MemoryItemStorage, SqliteItemStorage};

/// Snapshot returned by [`TodoStore::list`]. The stats are computed from the
/// same scan as the items, so the two always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoList {
    pub items: Vec<Item>,
    pub stats: ItemStats,
}

/// Owner of the item collection and its invariants.
///
/// Cloning is cheap; all clones share the same storage.
#[derive(Clone)]
pub struct TodoStore {
    storage: Arc<dyn ItemStorage>,
}

impl TodoStore {
    pub fn new(storage: Arc<dyn ItemStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryItemStorage::new()))
    }

    /// Opens (and migrates) the database at `db_path`.
    pub async fn sqlite(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let storage = SqliteItemStorage::new(db_path);
        storage.init().await?;
        Ok(Self::new(Arc::new(storage)))
    }

    pub async fn add(&self, title: &str) -> StoreResult<Item> {
        let item = Item::new(title)?;
        self.storage.insert(&item).await?;
        log::debug!("Added todo {}", item.id);
        Ok(item)
    }

    pub async fn list(&self) -> StoreResult<TodoList> {
        let items = self.storage.list().await?;
        let stats = ItemStats::of(&items);
        Ok(TodoList { items, stats })
    }

    pub async fn get(&self, id: &str) -> StoreResult<Item> {
        self.storage
            .find(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Replaces title, edit and complete on an existing item. Empty titles are
    /// rejected here exactly as they are on [`TodoStore::add`].
    pub async fn update(&self, id: &str, update: ItemUpdate) -> StoreResult<Item> {
        validate_title(&update.title)?;

        let item = update.into_item(id);
        if !self.storage.replace(&item).await? {
            return Err(StoreError::NotFound(id.to_string()));
        }
        log::debug!("Updated todo {}", id);
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if !self.storage.remove(id).await? {
            return Err(StoreError::NotFound(id.to_string()));
        }
        log::debug!("Deleted todo {}", id);
        Ok(())
    }

    pub async fn delete_all(&self) -> StoreResult<u64> {
        let removed = self.storage.clear().await?;
        log::info!("Deleted all todos ({} removed)", removed);
        Ok(removed)
    }

    pub async fn set_all_complete(&self, complete: bool) -> StoreResult<u64> {
        let touched = self.storage.set_all_complete(complete).await?;
        log::info!("Marked {} todos complete={}", touched, complete);
        Ok(touched)
    }

    pub async fn delete_completed(&self) -> StoreResult<u64> {
        let removed = self.storage.remove_completed().await?;
        log::info!("Deleted {} completed todos", removed);
        Ok(removed)
    }

    pub async fn stats(&self) -> StoreResult<ItemStats> {
        self.storage.stats().await
    }
}
