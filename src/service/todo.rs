//! TodoService: validation, timestamping, and store calls for each operation.

use crate::error::AppError;
use crate::model::{decode_changes, decode_new, timestamp_now, Todo, TodoId};
use crate::store::{TodoFilter, TodoStore};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        self.store.list(filter).await
    }

    pub async fn get(&self, id: &TodoId) -> Result<Todo, AppError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    pub async fn create(&self, body: &Map<String, Value>) -> Result<Todo, AppError> {
        let draft = decode_new(body)?;
        let mut todo = Todo::new(draft, timestamp_now());
        touch(&mut todo);
        self.store.insert(&todo).await?;
        tracing::debug!(id = %todo.id, "todo created");
        Ok(todo)
    }

    /// Sparse merge onto a record fetched with [`TodoService::get`]. Fails with
    /// `NotFound` if the record was deleted in between.
    pub async fn update(&self, mut todo: Todo, body: &Map<String, Value>) -> Result<Todo, AppError> {
        let changes = decode_changes(body)?;
        changes.apply(&mut todo);
        touch(&mut todo);
        let saved = self
            .store
            .replace(&todo)
            .await?
            .ok_or_else(|| AppError::NotFound(todo.id.to_string()))?;
        tracing::debug!(id = %saved.id, "todo updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: &TodoId) -> Result<Todo, AppError> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tracing::debug!(id = %removed.id, "todo deleted");
        Ok(removed)
    }
}

/// Every write resets `updated_at`, whatever fields changed.
fn touch(todo: &mut Todo) {
    todo.touch(timestamp_now());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTodoStore;
    use serde_json::json;

    fn service() -> TodoService {
        TodoService::new(Arc::new(MemoryTodoStore::new()))
    }

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn update_touches_even_without_changes() {
        let svc = service();
        let created = svc.create(&obj(json!({ "title": "t" }))).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = svc.update(created.clone(), &Map::new()).await.unwrap();
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, created.title);
    }

    #[tokio::test]
    async fn get_of_missing_record_is_not_found() {
        let svc = service();
        let id = TodoId::generate(timestamp_now());
        assert!(matches!(svc.get(&id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_of_record_deleted_meanwhile_is_not_found() {
        let svc = service();
        let created = svc.create(&obj(json!({ "title": "t" }))).await.unwrap();
        let fetched = svc.get(&created.id).await.unwrap();
        svc.delete(&created.id).await.unwrap();
        let err = svc
            .update(fetched, &obj(json!({ "completed": true })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_alone() {
        let svc = service();
        let created = svc.create(&obj(json!({ "title": "keep" }))).await.unwrap();
        let err = svc
            .update(created.clone(), &obj(json!({ "title": "  ", "completed": true })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(svc.get(&created.id).await.unwrap(), created);
    }
}
