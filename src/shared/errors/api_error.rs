use thiserror::Error;

/// Failure of a single network fetch (subject, events, forks/stargazer pages).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Rate limit exceeded for {url}, retry after {retry_after} seconds")]
    RateLimit { url: String, retry_after: u64 },

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid API response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::InvalidResponse {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Geocoding is best effort; this error never aborts a task.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoFetchError {
    #[error("Geocoding request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("No geocoding results for '{0}'")]
    NoMatch(String),

    #[error("Malformed coordinates for '{location}': {message}")]
    BadCoordinates { location: String, message: String },
}

/// Terminal failure of the result submission; moves the run to ERROR.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Backend rejected the result with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Backend answered without a result id: {0}")]
    InvalidResponse(String),

    #[error("Result payload could not be built: {0}")]
    Payload(String),
}
