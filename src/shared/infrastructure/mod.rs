/// Shared infrastructure concerns
///
/// Connection pooling and migrations used by the Postgres adapters of every
/// bounded context.
pub mod database;

pub use database::{Database, DbPool};
