use actix_web::{web, HttpResponse};

use crate::dto::{
    AddTodoRequest, BulkResponse, DeleteTodoRequest, MessageResponse, TodoListResponse,
    TodoResponse, TodosData, UpdateTodoRequest,
};
use crate::error::Result;
use crate::server::AppState;

async fn add_todo(
    state: web::Data<AppState>,
    payload: web::Json<AddTodoRequest>,
) -> Result<HttpResponse> {
    let todo = state.store.add(&payload.title).await?;
    tracing::info!("Todo added: {}", todo.id);
    Ok(HttpResponse::Ok().json(TodoResponse {
        message: Some("Todo added".to_string()),
        todo,
    }))
}

async fn list_todos(state: web::Data<AppState>) -> Result<HttpResponse> {
    let list = state.store.list().await?;
    Ok(HttpResponse::Ok().json(TodoListResponse {
        data: TodosData { todos: list.items },
        stats: list.stats,
    }))
}

async fn get_todo(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let todo = state.store.get(&id).await?;
    Ok(HttpResponse::Ok().json(TodoResponse {
        message: None,
        todo,
    }))
}

async fn update_todo(
    state: web::Data<AppState>,
    payload: web::Json<UpdateTodoRequest>,
) -> Result<HttpResponse> {
    let (id, update) = payload.into_inner().into_parts();
    let todo = state.store.update(&id, update).await?;
    tracing::info!("Todo updated: {}", todo.id);
    Ok(HttpResponse::Ok().json(TodoResponse {
        message: Some("Todo updated".to_string()),
        todo,
    }))
}

async fn delete_todo(
    state: web::Data<AppState>,
    payload: web::Json<DeleteTodoRequest>,
) -> Result<HttpResponse> {
    state.store.delete(&payload.id).await?;
    tracing::info!("Todo deleted: {}", payload.id);
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Todo deleted".to_string(),
    }))
}

async fn delete_all_todos(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.store.delete_all().await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "All todos deleted".to_string(),
    }))
}

async fn select_all(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.store.set_all_complete(true).await?;
    bulk_response(&state, "All todos marked complete").await
}

async fn cancel_select_all(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.store.set_all_complete(false).await?;
    bulk_response(&state, "All todos marked incomplete").await
}

async fn delete_completed(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.store.delete_completed().await?;
    bulk_response(&state, "Completed todos deleted").await
}

async fn bulk_response(state: &AppState, message: &str) -> Result<HttpResponse> {
    let list = state.store.list().await?;
    Ok(HttpResponse::Ok().json(BulkResponse {
        message: message.to_string(),
        data: TodosData { todos: list.items },
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/add", web::post().to(add_todo))
        .route("/get", web::get().to(list_todos))
        .route("/get/{id}", web::get().to(get_todo))
        .route("/update", web::put().to(update_todo))
        .route("/delete", web::delete().to(delete_todo))
        .route("/deleteAll", web::delete().to(delete_all_todos))
        .route("/selectAll", web::put().to(select_all))
        .route("/cancelSelectAll", web::put().to(cancel_select_all))
        .route("/deleteCompleted", web::delete().to(delete_completed));
}
