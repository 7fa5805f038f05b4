pub mod backlog;
pub mod entities;

pub use backlog::{Backlog, BacklogError};
pub use entities::{Task, TaskCategory};
