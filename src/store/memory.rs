//! In-process store, used as a test double and for running without a database.

use super::{TodoFilter, TodoStore};
use crate::error::AppError;
use crate::model::{Todo, TodoId};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Records kept in insertion order.
#[derive(Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        let todos = self.todos.read().await;
        // Newest insert first so records created in the same millisecond keep a stable order.
        let mut out: Vec<Todo> = todos
            .iter()
            .rev()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn find(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| &t.id == id).cloned())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), AppError> {
        self.todos.write().await.push(todo.clone());
        Ok(())
    }

    async fn replace(&self, todo: &Todo) -> Result<Option<Todo>, AppError> {
        let mut todos = self.todos.write().await;
        match todos.iter_mut().find(|t| t.id == todo.id) {
            Some(slot) => {
                *slot = todo.clone();
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter()
            .position(|t| &t.id == id)
            .map(|idx| todos.remove(idx)))
    }
}
