//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust client.

use std::future::Future;

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::IndicesGetAliasParts,
    ClearScrollParts, CountParts, CreateParts, DeleteParts, IndexParts, OpenSearch, ScrollParts,
    SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::BackendConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchBackend;
use crate::opensearch::queries;
use crate::types::{AliasAction, ScrollRequest, WriteMode};

/// OpenSearch backend implementation.
///
/// Wraps a single-node OpenSearch client and applies the connection-level
/// retry budget to every request.
///
/// # Example
///
/// ```ignore
/// let config = BackendConfig::new("http://localhost:9200");
/// let backend = OpenSearchBackend::new(&config)?;
///
/// if backend.health_check().await? {
///     let body = backend.count("promotions").await?;
///     println!("{} promotions", body["count"]);
/// }
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
    max_retries: usize,
}

impl OpenSearchBackend {
    /// Create a new OpenSearch backend for the configured URL.
    ///
    /// No request is sent; use `health_check` to verify connectivity.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: &BackendConfig) -> Result<Self, SearchError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            max_retries = config.max_retries,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            max_retries: config.max_retries,
        })
    }

    /// Send a request, retrying transport failures up to the retry budget.
    ///
    /// Only requests that never produced an HTTP response are retried.
    async fn send_with_retries<F, Fut>(
        &self,
        operation: &'static str,
        request: F,
    ) -> Result<Response, SearchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Response, opensearch::Error>>,
    {
        let mut attempt = 0;
        loop {
            match request().await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "Request failed, retrying"
                    );
                }
                Err(e) => {
                    error!(operation, error = %e, "Request failed");
                    return Err(SearchError::connection(format!(
                        "{} failed after {} attempt(s): {}",
                        operation,
                        attempt + 1,
                        e
                    )));
                }
            }
        }
    }

    /// Turn a non-success response into an error.
    async fn ensure_success(
        response: Response,
        operation: &'static str,
    ) -> Result<Response, SearchError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(operation, status = %status, body = %error_body, "Request failed");
        Err(SearchError::from_status(
            status.as_u16(),
            format!("{} failed with status {}: {}", operation, status, error_body),
        ))
    }

    /// Check the status and parse the body as JSON.
    async fn read_json(response: Response, operation: &'static str) -> Result<Value, SearchError> {
        let response = Self::ensure_success(response, operation).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(format!("{} response: {}", operation, e)))
    }
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn health_check(&self) -> Result<bool, SearchError> {
        let cluster = self.client.cluster();
        let cluster = &cluster;
        let response = self
            .send_with_retries("cluster_health", move || {
                cluster.health(ClusterHealthParts::None).send()
            })
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            warn!(status = %status, "Cluster health request was rejected");
            return Ok(false);
        }

        let health: Value = response.json().await.unwrap_or_default();
        let cluster_status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(cluster_status, "Cluster health checked");
        Ok(true)
    }

    #[instrument(skip(self, document))]
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: Value,
        mode: WriteMode,
    ) -> Result<Value, SearchError> {
        let client = &self.client;
        let response = match mode {
            WriteMode::Upsert => {
                self.send_with_retries("index", move || {
                    client
                        .index(IndexParts::IndexId(index, id))
                        .body(document.clone())
                        .send()
                })
                .await?
            }
            WriteMode::CreateOnly => {
                self.send_with_retries("create", move || {
                    client
                        .create(CreateParts::IndexId(index, id))
                        .body(document.clone())
                        .send()
                })
                .await?
            }
        };

        let body = Self::read_json(response, "index").await?;
        debug!(index = %index, id = %id, "Document indexed");
        Ok(body)
    }

    #[instrument(skip(self))]
    async fn open_scroll(&self, request: &ScrollRequest) -> Result<Value, SearchError> {
        let client = &self.client;
        let indices = [request.index.as_str()];
        let indices = &indices;
        let ttl = request.ttl.as_str();
        let body = queries::build_scan_query(request.page_size);

        let response = self
            .send_with_retries("search", move || {
                client
                    .search(SearchParts::Index(indices))
                    .scroll(ttl)
                    .body(body.clone())
                    .send()
            })
            .await?;

        Self::read_json(response, "search").await
    }

    #[instrument(skip(self, scroll_id))]
    async fn continue_scroll(&self, scroll_id: &str, ttl: &str) -> Result<Value, SearchError> {
        let client = &self.client;
        let body = queries::build_scroll_continuation(scroll_id, ttl);

        let response = self
            .send_with_retries("scroll", move || {
                client
                    .scroll(ScrollParts::None)
                    .body(body.clone())
                    .send()
            })
            .await?;

        Self::read_json(response, "scroll").await
    }

    #[instrument(skip(self, scroll_id))]
    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), SearchError> {
        let client = &self.client;
        let body = queries::build_clear_scroll(scroll_id);

        let response = self
            .send_with_retries("clear_scroll", move || {
                client
                    .clear_scroll(ClearScrollParts::None)
                    .body(body.clone())
                    .send()
            })
            .await?;

        Self::ensure_success(response, "clear_scroll").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_aliases(&self, index: &str) -> Result<Value, SearchError> {
        let indices_client = self.client.indices();
        let indices_client = &indices_client;
        let indices = [index];
        let indices = &indices;
        let response = self
            .send_with_retries("get_aliases", move || {
                indices_client
                    .get_alias(IndicesGetAliasParts::Index(indices))
                    .send()
            })
            .await?;

        Self::read_json(response, "get_aliases").await
    }

    #[instrument(skip(self))]
    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<(), SearchError> {
        let indices_client = self.client.indices();
        let indices_client = &indices_client;
        let body = queries::build_alias_actions(actions);

        let response = self
            .send_with_retries("update_aliases", move || {
                indices_client.update_aliases().body(body.clone()).send()
            })
            .await?;

        Self::ensure_success(response, "update_aliases").await?;
        debug!(action_count = actions.len(), "Aliases updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchError> {
        let client = &self.client;
        let response = self
            .send_with_retries("delete", move || {
                client.delete(DeleteParts::IndexId(index, id)).send()
            })
            .await?;

        Self::ensure_success(response, "delete").await?;
        debug!(index = %index, id = %id, "Document deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self, index: &str) -> Result<Value, SearchError> {
        let client = &self.client;
        let indices = [index];
        let indices = &indices;
        let body = queries::build_count_query();

        let response = self
            .send_with_retries("count", move || {
                client
                    .count(CountParts::Index(indices))
                    .body(body.clone())
                    .send()
            })
            .await?;

        Self::read_json(response, "count").await
    }
}
