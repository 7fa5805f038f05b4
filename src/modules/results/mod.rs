/// Enriched records accumulated during a run
pub mod domain;
pub mod infrastructure;

pub use domain::{
    entities::{EnrichedUser, GeoLocation, ResultSet, UserFlags},
    repository::ResultStore,
};
pub use infrastructure::InMemoryResultStore;
