pub mod memory;
pub mod models;
pub mod repository;

pub use memory::{InMemoryHistoryStore, InMemoryRunStore};
pub use repository::{PgHistoryStore, PgRunStore};
