pub mod error;
pub mod item;
pub mod storage;
pub mod store;

pub use error::{ErrorKind, StoreError, StoreResult};
pub use item::{validate_title, Item, ItemStats, ItemUpdate};
pub use storage::{ItemStorage, MemoryItemStorage, SqliteItemStorage};
pub use store::{TodoList, TodoStore};
