//! To-do entity: identifier, record, and input rules.

mod id;
pub mod schema;
mod todo;

pub use id::{TodoId, ID_LEN};
pub use schema::{decode_changes, decode_new};
pub use todo::{timestamp_now, NewTodo, Todo, TodoChanges};
