//! Connection configuration for the search backend.

/// Default search service URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Default number of extra attempts made when a request fails in transport.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Settings used to build a backend connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL of the search service (e.g. "http://localhost:9200").
    pub url: String,
    /// Retry budget for requests that never got an HTTP response.
    pub max_retries: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl BackendConfig {
    /// Create a config for `url` with the default retry budget.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}
