pub mod entities;
pub mod repository;

pub use entities::{RestoredRun, Snapshot, SNAPSHOT_KEY};
pub use repository::SnapshotStore;
