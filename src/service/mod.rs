//! Persistence flow for to-do records.

mod todo;
pub use todo::TodoService;
