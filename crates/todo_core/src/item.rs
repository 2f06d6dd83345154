use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub edit: bool,
    /// The web client reads and writes this flag as `Complete`.
    #[serde(rename = "Complete", alias = "complete", default)]
    pub complete: bool,
}

impl Item {
    /// Builds a fresh item with a newly generated id and both flags cleared.
    pub fn new(title: impl Into<String>) -> StoreResult<Self> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            edit: false,
            complete: false,
        })
    }
}

/// Replacement values for every mutable field of an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub title: String,
    pub edit: bool,
    pub complete: bool,
}

impl ItemUpdate {
    pub fn new(title: impl Into<String>, edit: bool, complete: bool) -> Self {
        Self {
            title: title.into(),
            edit,
            complete,
        }
    }

    /// The item as it looks once this update is applied to `id`.
    pub fn into_item(self, id: impl Into<String>) -> Item {
        Item {
            id: id.into(),
            title: self.title,
            edit: self.edit,
            complete: self.complete,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

impl ItemStats {
    pub fn from_counts(total: u64, completed: u64) -> Self {
        Self {
            total,
            completed,
            pending: total.saturating_sub(completed),
        }
    }

    pub fn of(items: &[Item]) -> Self {
        let completed = items.iter().filter(|item| item.complete).count() as u64;
        Self::from_counts(items.len() as u64, completed)
    }
}

/// Titles must be non-empty. Whitespace counts as content.
pub fn validate_title(title: &str) -> StoreResult<()> {
    if title.is_empty() {
        return Err(StoreError::InvalidInput(
            "todo title must not be empty".to_string(),
        ));
    }
    Ok(())
}
