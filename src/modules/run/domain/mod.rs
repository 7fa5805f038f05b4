pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{RunProgress, RunSettings, RunStage, RunState};
pub use repository::{HistoryStore, RunStore};
pub use value_objects::RunStageDb;
