//! todo-api: REST backend for a to-do list.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, ConfigError};
pub use model::{Todo, TodoId};
pub use routes::{common_routes, todo_routes};
pub use server::app;
pub use service::TodoService;
pub use state::AppState;
pub use store::{MemoryTodoStore, PgTodoStore, TodoFilter, TodoStore};
