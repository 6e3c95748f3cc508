mod body;
mod path;
mod query;

pub use body::TodoBody;
pub use path::TodoPath;
pub use query::ListFilter;
