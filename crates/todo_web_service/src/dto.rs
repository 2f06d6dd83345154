use serde::{Deserialize, Serialize};
use todo_core::{Item, ItemStats, ItemUpdate};

#[derive(Debug, Deserialize)]
pub struct AddTodoRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub edit: bool,
    #[serde(rename = "Complete", alias = "complete", default)]
    pub complete: bool,
}

impl UpdateTodoRequest {
    pub fn into_parts(self) -> (String, ItemUpdate) {
        (
            self.id,
            ItemUpdate::new(self.title, self.edit, self.complete),
        )
    }
}

/// The client sends the whole item on delete; only the id matters.
#[derive(Debug, Deserialize)]
pub struct DeleteTodoRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub todo: Item,
}

#[derive(Debug, Serialize)]
pub struct TodosData {
    pub todos: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub data: TodosData,
    pub stats: ItemStats,
}

/// Returned by the bulk endpoints, which echo the collection after the change.
#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub message: String,
    pub data: TodosData,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}
