pub mod entities;
pub mod repository;

pub use entities::{EnrichedUser, GeoLocation, ResultSet, UserFlags};
pub use repository::ResultStore;
