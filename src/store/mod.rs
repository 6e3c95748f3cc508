//! Persistence seam. Handlers reach the database only through [`TodoStore`].

mod memory;
mod pg;

pub use memory::MemoryTodoStore;
pub use pg::{ensure_database_exists, ensure_todo_table, PgTodoStore};

use crate::error::AppError;
use crate::model::{Todo, TodoId};
use async_trait::async_trait;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        match self.completed {
            Some(completed) => todo.completed == completed,
            None => true,
        }
    }
}

/// Record storage. Implementations persist what they are given; validation and
/// timestamping happen before a record reaches them.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Matching records, newest `created_at` first.
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError>;

    async fn find(&self, id: &TodoId) -> Result<Option<Todo>, AppError>;

    async fn insert(&self, todo: &Todo) -> Result<(), AppError>;

    /// Overwrite the stored record with the same id. `None` if it no longer exists.
    async fn replace(&self, todo: &Todo) -> Result<Option<Todo>, AppError>;

    /// Remove and return the record's last state.
    async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, AppError>;
}
