// Shared kernel: errors, configuration, database and logging used by every module

pub mod config; // Environment-driven configuration
pub mod errors; // Shared error types
pub mod infrastructure; // Shared infrastructure (database)
pub mod utils; // Logging and rate limiting

// Re-exports for convenience
pub use config::{AppConfig, ProcessorConfig};
pub use infrastructure::database::Database;
