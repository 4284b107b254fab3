//! Facade settings loaded from the environment.

use std::env;

use search_facade_repository::config::{DEFAULT_MAX_RETRIES, DEFAULT_URL};
use search_facade_repository::{BackendConfig, SearchError};
use tracing::warn;

use super::TypeIndexMap;

/// Search service URL.
pub const ENV_URL: &str = "SEARCH_URL";

/// Connection-level retry budget.
pub const ENV_MAX_RETRIES: &str = "SEARCH_MAX_RETRIES";

/// Scroll cursor time-to-live.
pub const ENV_SCROLL_TTL: &str = "SEARCH_SCROLL_TTL";

/// Documents per shard on each scroll page.
pub const ENV_SCROLL_PAGE_SIZE: &str = "SEARCH_SCROLL_PAGE_SIZE";

/// Record-type to index mapping, as `type=index` pairs.
pub const ENV_TYPE_INDICES: &str = "SEARCH_TYPE_INDICES";

/// How long a scrolled view stays alive on the service between calls.
pub const DEFAULT_SCROLL_TTL: &str = "3m";

/// Documents returned per shard on each scroll page. A page holds up to
/// this many documents times the number of shards.
pub const DEFAULT_SCROLL_PAGE_SIZE: usize = 500;

const TIME_UNITS: [&str; 7] = ["nanos", "micros", "ms", "s", "m", "h", "d"];

/// Everything the facade needs to connect and to fill in per-call defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadeConfig {
    /// Connection settings handed to the connector.
    pub backend: BackendConfig,
    /// Scroll cursor time-to-live, as a search time value (e.g. `3m`).
    pub scroll_ttl: String,
    /// Documents per shard on each scroll page.
    pub scroll_page_size: usize,
    /// Default index for each record type.
    pub type_indices: TypeIndexMap,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            scroll_ttl: DEFAULT_SCROLL_TTL.to_string(),
            scroll_page_size: DEFAULT_SCROLL_PAGE_SIZE,
            type_indices: TypeIndexMap::default(),
        }
    }
}

impl FacadeConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_URL`: search service URL (default: http://localhost:9200)
    /// - `SEARCH_MAX_RETRIES`: retry budget (default: 3)
    /// - `SEARCH_SCROLL_TTL`: scroll cursor TTL (default: 3m)
    /// - `SEARCH_SCROLL_PAGE_SIZE`: documents per shard per page (default: 500)
    /// - `SEARCH_TYPE_INDICES`: `type=index` pairs, comma separated (default: none)
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL).unwrap_or_else(|| DEFAULT_URL.to_string());

        let max_retries = lookup(ENV_MAX_RETRIES)
            .and_then(|raw| match raw.trim().parse::<usize>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(variable = ENV_MAX_RETRIES, value = %raw, error = %e, "Ignoring invalid value");
                    None
                }
            })
            .unwrap_or(DEFAULT_MAX_RETRIES);

        let scroll_ttl = lookup(ENV_SCROLL_TTL)
            .and_then(|raw| match parse_time_value(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(variable = ENV_SCROLL_TTL, value = %raw, error = %e, "Ignoring invalid value");
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_SCROLL_TTL.to_string());

        let scroll_page_size = lookup(ENV_SCROLL_PAGE_SIZE)
            .and_then(|raw| match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => Some(value),
                _ => {
                    warn!(variable = ENV_SCROLL_PAGE_SIZE, value = %raw, "Ignoring invalid value");
                    None
                }
            })
            .unwrap_or(DEFAULT_SCROLL_PAGE_SIZE);

        let type_indices = lookup(ENV_TYPE_INDICES)
            .and_then(|raw| match TypeIndexMap::parse(&raw) {
                Ok(map) => Some(map),
                Err(e) => {
                    warn!(variable = ENV_TYPE_INDICES, error = %e, "Ignoring invalid value");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            backend: BackendConfig { url, max_retries },
            scroll_ttl,
            scroll_page_size,
            type_indices,
        }
    }

    /// Set the search service URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.backend.url = url.into();
        self
    }

    /// Set the scroll page size.
    ///
    /// A page size of zero would make every first page empty, which reads as
    /// an exhausted scan. It is logged and the current size is kept.
    pub fn with_scroll_page_size(mut self, page_size: usize) -> Self {
        if page_size == 0 {
            warn!(
                current = self.scroll_page_size,
                "Ignoring zero scroll page size"
            );
            return self;
        }
        self.scroll_page_size = page_size;
        self
    }

    /// Set the scroll cursor TTL.
    pub fn with_scroll_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.scroll_ttl = ttl.into();
        self
    }

    /// Map `record_type` to a default index.
    pub fn with_type_index(
        mut self,
        record_type: impl Into<String>,
        index: impl Into<String>,
    ) -> Self {
        self.type_indices.insert(record_type, index);
        self
    }
}

/// Validate a search time value such as `3m`, `90s` or `500ms`.
///
/// Returns the trimmed value.
pub fn parse_time_value(raw: &str) -> Result<String, SearchError> {
    let value = raw.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);

    if amount.is_empty() || !TIME_UNITS.contains(&unit) {
        return Err(SearchError::config(format!(
            "Invalid time value '{}', expected e.g. 3m or 90s",
            raw
        )));
    }

    Ok(value.to_string())
}
