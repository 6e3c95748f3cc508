//! To-do CRUD handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::{ListFilter, TodoBody, TodoPath};
use crate::response::{success_many, success_ok, success_with_message};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

pub async fn list(
    State(state): State<AppState>,
    ListFilter(filter): ListFilter,
) -> Result<impl IntoResponse, AppError> {
    let todos = state.todos.list(&filter).await?;
    Ok(success_many(todos))
}

pub async fn read(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
) -> Result<impl IntoResponse, AppError> {
    let todo = state.todos.get(&id).await?;
    Ok(success_ok(todo))
}

pub async fn create(
    State(state): State<AppState>,
    TodoBody(body): TodoBody,
) -> Result<impl IntoResponse, AppError> {
    let todo = state.todos.create(&body).await?;
    Ok(success_with_message(
        StatusCode::CREATED,
        "Todo created successfully.",
        todo,
    ))
}

/// The body is only inspected once the record is known to exist.
pub async fn update(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
    body: Result<TodoBody, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.todos.get(&id).await?;
    let TodoBody(body) = body?;
    let todo = state.todos.update(existing, &body).await?;
    Ok(success_with_message(
        StatusCode::OK,
        "Todo updated successfully.",
        todo,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
) -> Result<impl IntoResponse, AppError> {
    let todo = state.todos.delete(&id).await?;
    Ok(success_with_message(
        StatusCode::OK,
        "Todo deleted successfully.",
        todo,
    ))
}
