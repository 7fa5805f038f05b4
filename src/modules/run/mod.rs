/// Run lifecycle state shared with out-of-process observers
///
/// Architecture:
/// - Domain: `RunState` and the store ports the processor talks to
/// - Infrastructure: in-memory and Diesel-based store implementations
pub mod domain;
pub mod infrastructure;

pub use domain::{
    entities::{RunProgress, RunSettings, RunStage, RunState},
    repository::{HistoryStore, RunStore},
};
pub use infrastructure::{
    InMemoryHistoryStore, InMemoryRunStore, PgHistoryStore, PgRunStore,
};
