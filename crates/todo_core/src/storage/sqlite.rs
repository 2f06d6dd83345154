use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::ItemStorage;
use crate::error::{StoreError, StoreResult};
use crate::item::{Item, ItemStats};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage.
///
/// Each call opens its own connection on a blocking thread, so the handle is
/// cheap to clone and share between request handlers. Every mutation is a
/// single statement, which gives per-operation atomicity without explicit
/// transactions.
#[derive(Debug, Clone)]
pub struct SqliteItemStorage {
    db_path: PathBuf,
}

impl SqliteItemStorage {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<T, F>(&self, func: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| StoreError::Task(error.to_string()))?
    }
}

#[async_trait]
impl ItemStorage for SqliteItemStorage {
    async fn init(&self) -> StoreResult<()> {
        log::info!("Initializing todo database at {:?}", self.db_path);
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS todos (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    edit INTEGER NOT NULL DEFAULT 0,
                    complete INTEGER NOT NULL DEFAULT 0
                );

                CREATE INDEX IF NOT EXISTS idx_todos_complete ON todos(complete);
                "#,
            )?;
            Ok(())
        })
        .await
    }

    async fn insert(&self, item: &Item) -> StoreResult<()> {
        let item = item.clone();
        self.with_connection(move |connection| {
            let result = connection.execute(
                "INSERT INTO todos (id, title, edit, complete) VALUES (?1, ?2, ?3, ?4)",
                params![item.id, item.title, item.edit, item.complete],
            );
            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(failure, _))
                    if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
                {
                    Err(StoreError::DuplicateId(item.id))
                }
                Err(error) => Err(error.into()),
            }
        })
        .await
    }

    async fn list(&self) -> StoreResult<Vec<Item>> {
        self.with_connection(|connection| {
            let mut statement = connection
                .prepare("SELECT id, title, edit, complete FROM todos ORDER BY rowid ASC")?;
            let items = statement
                .query_map([], read_item)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
    }

    async fn find(&self, id: &str) -> StoreResult<Option<Item>> {
        let id = id.to_string();
        self.with_connection(move |connection| {
            let item = connection
                .query_row(
                    "SELECT id, title, edit, complete FROM todos WHERE id = ?1",
                    params![id],
                    read_item,
                )
                .optional()?;
            Ok(item)
        })
        .await
    }

    async fn replace(&self, item: &Item) -> StoreResult<bool> {
        let item = item.clone();
        self.with_connection(move |connection| {
            let updated = connection.execute(
                "UPDATE todos SET title = ?1, edit = ?2, complete = ?3 WHERE id = ?4",
                params![item.title, item.edit, item.complete, item.id],
            )?;
            Ok(updated > 0)
        })
        .await
    }

    async fn remove(&self, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        self.with_connection(move |connection| {
            let deleted = connection.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn clear(&self) -> StoreResult<u64> {
        self.with_connection(|connection| {
            let deleted = connection.execute("DELETE FROM todos", [])?;
            Ok(deleted as u64)
        })
        .await
    }

    async fn set_all_complete(&self, complete: bool) -> StoreResult<u64> {
        self.with_connection(move |connection| {
            let updated = connection.execute("UPDATE todos SET complete = ?1", params![complete])?;
            Ok(updated as u64)
        })
        .await
    }

    async fn remove_completed(&self) -> StoreResult<u64> {
        self.with_connection(|connection| {
            let deleted = connection.execute("DELETE FROM todos WHERE complete = 1", [])?;
            Ok(deleted as u64)
        })
        .await
    }

    async fn stats(&self) -> StoreResult<ItemStats> {
        self.with_connection(|connection| {
            let (total, completed): (i64, i64) = connection.query_row(
                "SELECT COUNT(*), COALESCE(SUM(complete), 0) FROM todos",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            Ok(ItemStats::from_counts(
                total.max(0) as u64,
                completed.max(0) as u64,
            ))
        })
        .await
    }
}

fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let connection = Connection::open(path)?;
    connection.busy_timeout(BUSY_TIMEOUT)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

fn read_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        title: row.get(1)?,
        edit: row.get(2)?,
        complete: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn init_is_idempotent_and_creates_parent_directories() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteItemStorage::new(dir.path().join("nested/data/todolist.db"));

        storage.init().await.expect("first init");
        storage.init().await.expect("second init");

        assert!(storage.db_path().exists());
        assert!(storage.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn rows_round_trip_with_flags() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteItemStorage::new(dir.path().join("todolist.db"));
        storage.init().await.expect("init");

        let mut item = Item::new("Write report").unwrap();
        item.edit = true;
        storage.insert(&item).await.expect("insert");

        let found = storage.find(&item.id).await.expect("find");
        assert_eq!(found, Some(item.clone()));
        assert_eq!(storage.find("missing").await.expect("find"), None);
    }

    #[tokio::test]
    async fn duplicate_primary_key_maps_to_duplicate_id() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteItemStorage::new(dir.path().join("todolist.db"));
        storage.init().await.expect("init");

        let item = Item::new("only once").unwrap();
        storage.insert(&item).await.expect("insert");
        let err = storage.insert(&item).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateId(id) if id == item.id));
    }

    #[tokio::test]
    async fn data_survives_reopening_the_database() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("todolist.db");

        let first = SqliteItemStorage::new(&path);
        first.init().await.expect("init");
        let a = Item::new("first").unwrap();
        let b = Item::new("second").unwrap();
        first.insert(&a).await.expect("insert a");
        first.insert(&b).await.expect("insert b");
        first.set_all_complete(true).await.expect("complete");
        drop(first);

        let reopened = SqliteItemStorage::new(&path);
        reopened.init().await.expect("reinit");
        let items = reopened.list().await.expect("list");

        assert_eq!(
            items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>(),
            vec![a.id.as_str(), b.id.as_str()]
        );
        assert!(items.iter().all(|item| item.complete));
        assert_eq!(
            reopened.stats().await.expect("stats"),
            ItemStats::from_counts(2, 2)
        );
    }
}
