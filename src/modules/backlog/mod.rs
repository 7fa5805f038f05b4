/// Backlog of enrichment tasks for the current run
///
/// A FIFO that is never compacted while a run is in progress: dequeue only
/// advances `head_index`, so `head_index / tail_index` doubles as the progress
/// ratio reported to observers.
pub mod domain;

pub use domain::{
    backlog::{Backlog, BacklogError},
    entities::{Task, TaskCategory},
};
