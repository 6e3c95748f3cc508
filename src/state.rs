//! Shared application state for all routes.

use crate::service::TodoService;
use crate::store::TodoStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
}

impl AppState {
    /// The store is created once at startup and shared by every request.
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            todos: TodoService::new(store),
        }
    }
}
