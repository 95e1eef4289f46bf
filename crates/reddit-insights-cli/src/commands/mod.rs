//! Command implementations for reddit-insights

pub mod search;
pub mod sonars;
pub mod trends;

pub use search::{semantic_search, vector_search};
pub use sonars::{create_sonar, execution_detail, list_executions, list_sonars};
pub use trends::trends;
