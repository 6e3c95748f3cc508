mod common;
mod todo;

pub use common::common_routes;
pub use todo::todo_routes;
