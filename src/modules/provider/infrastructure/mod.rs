// HTTP adapters for the remote collaborators
pub mod github;
pub mod http_client;
pub mod nominatim;
pub mod results_backend;

// Re-export commonly used types
pub use github::GithubClient;
pub use http_client::{RateLimitClient, RateLimitInfo};
pub use nominatim::NominatimClient;
pub use results_backend::ResultsBackendClient;
