pub mod memory;
pub mod models;
pub mod repository;

pub use memory::InMemorySnapshotStore;
pub use repository::PgSnapshotStore;
