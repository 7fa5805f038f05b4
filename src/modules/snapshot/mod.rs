/// Persistence bridge between the processor and a durable key-value store
///
/// A snapshot is the whole resumable state of a run (backlog cursors, run
/// state and results) written as one value, so a restarted process never sees
/// a torn mix of old results and new cursors.
pub mod domain;
pub mod infrastructure;

pub use domain::{
    entities::{RestoredRun, Snapshot, SNAPSHOT_KEY},
    repository::SnapshotStore,
};
pub use infrastructure::{InMemorySnapshotStore, PgSnapshotStore};
