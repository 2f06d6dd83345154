//! Persistence adapters behind a single async contract.
//!
//! Adapters only move rows around. Title validation, id generation and the
//! not-found policy live in [`crate::store::TodoStore`].

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::item::{Item, ItemStats};

pub use memory::MemoryItemStorage;
pub use sqlite::SqliteItemStorage;

/// Every method must be atomic with respect to the whole collection.
#[async_trait]
pub trait ItemStorage: Send + Sync {
    async fn init(&self) -> StoreResult<()>;

    async fn insert(&self, item: &Item) -> StoreResult<()>;

    /// All items in insertion order.
    async fn list(&self) -> StoreResult<Vec<Item>>;

    async fn find(&self, id: &str) -> StoreResult<Option<Item>>;

    /// Overwrites the stored item with the same id. Returns `false` when no
    /// such item exists.
    async fn replace(&self, item: &Item) -> StoreResult<bool>;

    async fn remove(&self, id: &str) -> StoreResult<bool>;

    async fn clear(&self) -> StoreResult<u64>;

    async fn set_all_complete(&self, complete: bool) -> StoreResult<u64>;

    async fn remove_completed(&self) -> StoreResult<u64>;

    async fn stats(&self) -> StoreResult<ItemStats>;
}
