//! Search backend trait definition.
//!
//! This module defines the abstract interface for the remote calls the facade
//! makes, allowing for different backend implementations (OpenSearch,
//! Elasticsearch, in-memory mocks for tests).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{AliasAction, ScrollRequest, WriteMode};

/// Abstracts the underlying search service client.
///
/// Every method maps to exactly one REST call against the service (plus any
/// transport-level retries). Bodies are passed and returned as raw JSON so the
/// trait stays object safe; typed views live in `search_facade_shared`.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: one connection is shared by every
/// caller of the facade.
///
/// # Error Handling
///
/// Non-success statuses are mapped through `SearchError::from_status`, so a
/// missing document is `NotFound` and a create-only write on an existing id
/// is `Conflict`.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Check whether the cluster is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The cluster answered the health request
    /// * `Ok(false)` - The cluster answered with a non-success status
    /// * `Err(SearchError)` - The request could not be sent
    async fn health_check(&self) -> Result<bool, SearchError>;

    /// Write a document under `id` in `index`.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index or alias
    /// * `id` - Document identifier
    /// * `document` - Serialized document body
    /// * `mode` - Whether to replace an existing document or fail on conflict
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The acknowledgement body
    /// * `Err(SearchError::Conflict)` - `CreateOnly` and the id already exists
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: Value,
        mode: WriteMode,
    ) -> Result<Value, SearchError>;

    /// Open a match-all scan in document order and return the first page.
    async fn open_scroll(&self, request: &ScrollRequest) -> Result<Value, SearchError>;

    /// Fetch the next page of a scan, keeping the cursor alive for `ttl`.
    ///
    /// An expired or unknown cursor is reported as `NotFound`.
    async fn continue_scroll(&self, scroll_id: &str, ttl: &str) -> Result<Value, SearchError>;

    /// Release the server-side state of a scan.
    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), SearchError>;

    /// Return the aliases that point at `index`.
    async fn get_aliases(&self, index: &str) -> Result<Value, SearchError>;

    /// Apply all `actions` in a single atomic `_aliases` call.
    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<(), SearchError>;

    /// Delete the document `id` from `index`.
    ///
    /// A missing document is reported as `NotFound`.
    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchError>;

    /// Count every document in `index` with a match-all query.
    async fn count(&self, index: &str) -> Result<Value, SearchError>;
}
