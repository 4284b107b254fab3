//! The search facade.
//!
//! This module provides the single entry point application code uses to talk
//! to the search service. It owns the lazily established connection and
//! fills in the configured defaults (target index, scroll TTL, page size).

use search_facade_repository::{
    AliasAction, ScrollRequest, SearchBackend, SearchError, WriteMode,
};
use search_facade_shared::{AliasesResponse, CountResponse, IndexResponse, Record, ScrollPage};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::config::FacadeConfig;
use crate::connection::{Connection, Connector, OpenSearchConnector};

/// Facade over a remote search service.
///
/// The connection is built on first use, at most once per facade, even when
/// many tasks make their first call at the same time. Afterwards it is shared
/// read-only by every caller.
///
/// # Example
///
/// ```ignore
/// let config = FacadeConfig::from_env().with_type_index("promotion", "promotions");
/// let facade = SearchFacade::new(config);
///
/// facade.index(&promotion, None).await?;
/// let mut page = facade.search::<Promotion>(None).await?;
/// while !page.is_empty() {
///     handle(page.documents());
///     let cursor = page.scroll_id.clone().unwrap_or_default();
///     page = facade.scroll(&cursor).await?;
/// }
/// ```
pub struct SearchFacade {
    config: FacadeConfig,
    connector: Box<dyn Connector>,
    connection: OnceCell<Connection>,
}

impl SearchFacade {
    /// Create a facade connecting to OpenSearch.
    pub fn new(config: FacadeConfig) -> Self {
        Self::with_connector(config, Box::new(OpenSearchConnector))
    }

    /// Create a facade with a custom connector.
    pub fn with_connector(config: FacadeConfig, connector: Box<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            connection: OnceCell::new(),
        }
    }

    /// Settings this facade was created with.
    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Get the connection, establishing it on first use.
    ///
    /// If building the backend fails the cell stays empty and the next call
    /// tries again.
    async fn connection(&self) -> Result<&Connection, SearchError> {
        self.connection
            .get_or_try_init(|| Connection::establish(self.connector.as_ref(), &self.config.backend))
            .await
    }

    async fn backend(&self) -> Result<&dyn SearchBackend, SearchError> {
        Ok(self.connection().await?.backend())
    }

    /// Pick the explicit index when one is given, else the record type's default.
    fn resolve_index<T: Record>(&self, index_name: Option<&str>) -> Result<String, SearchError> {
        match index_name.filter(|name| !name.is_empty()) {
            Some(name) => Ok(name.to_string()),
            None => self
                .config
                .type_indices
                .index_for(T::RECORD_TYPE)
                .map(str::to_string)
                .ok_or_else(|| SearchError::UnmappedRecordType(T::RECORD_TYPE.to_string())),
        }
    }

    /// Whether the initial health check succeeded.
    ///
    /// Returns `false` until a connection has been established. Never
    /// triggers initialization.
    pub fn is_connected(&self) -> bool {
        self.connection
            .get()
            .is_some_and(Connection::is_connected)
    }

    /// Establish the connection if needed and report its health.
    ///
    /// A failed health check is `Ok(false)`; only a failure to build the
    /// client is an error.
    pub async fn connect(&self) -> Result<bool, SearchError> {
        Ok(self.connection().await?.is_connected())
    }

    /// Append a fresh unique token to `base`, e.g. for a new physical index
    /// that an alias will later be pointed at.
    pub fn new_unique_index_suffix(base: &str) -> String {
        format!("{}_{}", base, Uuid::new_v4())
    }

    /// Index `record`, replacing any existing document with the same id.
    ///
    /// Uses `index_name` when given and non-empty, otherwise the default
    /// index mapped for `T`.
    #[instrument(skip(self, record), fields(record_type = T::RECORD_TYPE))]
    pub async fn index<T: Record>(
        &self,
        record: &T,
        index_name: Option<&str>,
    ) -> Result<IndexResponse, SearchError> {
        self.write(record, index_name, WriteMode::Upsert).await
    }

    /// Index `record` only if no document with its id exists yet.
    ///
    /// An existing id is reported as `SearchError::Conflict` and the stored
    /// document is left untouched. Useful when rebuilding an index from
    /// scratch.
    #[instrument(skip(self, record), fields(record_type = T::RECORD_TYPE))]
    pub async fn index_if_absent<T: Record>(
        &self,
        record: &T,
        index_name: Option<&str>,
    ) -> Result<IndexResponse, SearchError> {
        self.write(record, index_name, WriteMode::CreateOnly).await
    }

    async fn write<T: Record>(
        &self,
        record: &T,
        index_name: Option<&str>,
        mode: WriteMode,
    ) -> Result<IndexResponse, SearchError> {
        let index = self.resolve_index::<T>(index_name)?;
        let id = record.record_id();
        let document =
            serde_json::to_value(record).map_err(|e| SearchError::serialization(e.to_string()))?;

        let body = self
            .backend()
            .await?
            .index_document(&index, &id, document, mode)
            .await?;

        IndexResponse::from_value(body).map_err(|e| SearchError::parse(e.to_string()))
    }

    /// Start a scrolled scan over every document of the target index.
    ///
    /// Returns the first page and the cursor for `scroll`. Pages hold up to
    /// the configured page size per shard; the cursor lives for the
    /// configured TTL between calls.
    #[instrument(skip(self), fields(record_type = T::RECORD_TYPE))]
    pub async fn search<T: Record>(
        &self,
        index_name: Option<&str>,
    ) -> Result<ScrollPage<T>, SearchError> {
        // A zero-sized first page would read as an exhausted scan.
        if self.config.scroll_page_size == 0 {
            return Err(SearchError::config("Scroll page size must be greater than zero"));
        }

        let request = ScrollRequest {
            index: self.resolve_index::<T>(index_name)?,
            page_size: self.config.scroll_page_size,
            ttl: self.config.scroll_ttl.clone(),
        };

        let body = self.backend().await?.open_scroll(&request).await?;
        let page = ScrollPage::from_value(body).map_err(|e| SearchError::parse(e.to_string()))?;

        debug!(index = %request.index, hits = page.len(), total = ?page.total, "Scan started");
        Ok(page)
    }

    /// Fetch the next page of a scan. An empty page means the scan is done.
    pub async fn scroll<T: DeserializeOwned>(
        &self,
        scroll_id: &str,
    ) -> Result<ScrollPage<T>, SearchError> {
        let body = self
            .backend()
            .await?
            .continue_scroll(scroll_id, &self.config.scroll_ttl)
            .await?;

        ScrollPage::from_value(body).map_err(|e| SearchError::parse(e.to_string()))
    }

    /// Release a scan cursor before its TTL runs out.
    pub async fn clear_scroll(&self, scroll_id: &str) -> Result<(), SearchError> {
        self.backend().await?.clear_scroll(scroll_id).await
    }

    /// List the aliases pointing at `index_name`.
    pub async fn get_aliases(&self, index_name: &str) -> Result<AliasesResponse, SearchError> {
        let body = self.backend().await?.get_aliases(index_name).await?;
        AliasesResponse::from_value(body).map_err(|e| SearchError::parse(e.to_string()))
    }

    /// Point `alias` at `index`. Either may be new; existing pointers stay.
    #[instrument(skip(self))]
    pub async fn create_alias(&self, alias: &str, index: &str) -> Result<(), SearchError> {
        self.backend()
            .await?
            .update_aliases(&[AliasAction::add(alias, index)])
            .await
    }

    /// Stop pointing `alias` at `index`. The index itself is not deleted.
    #[instrument(skip(self))]
    pub async fn delete_alias(&self, alias: &str, index: &str) -> Result<(), SearchError> {
        self.backend()
            .await?
            .update_aliases(&[AliasAction::remove(alias, index)])
            .await
    }

    /// Move `alias` from `old_index` to `new_index`.
    ///
    /// Both actions go out in one request, so the service applies them
    /// atomically and readers never see the alias on neither or both.
    #[instrument(skip(self))]
    pub async fn reroute_alias(
        &self,
        alias: &str,
        old_index: &str,
        new_index: &str,
    ) -> Result<(), SearchError> {
        self.backend()
            .await?
            .update_aliases(&[
                AliasAction::add(alias, new_index),
                AliasAction::remove(alias, old_index),
            ])
            .await
    }

    /// Delete the document `id` from `T`'s default index.
    pub async fn try_delete_by_id<T: Record>(&self, id: impl ToString) -> Result<(), SearchError> {
        let id = id.to_string();
        let index = self.resolve_index::<T>(None)?;
        self.backend().await?.delete_document(&index, &id).await
    }

    /// Delete the document `id` from `T`'s default index, reporting only
    /// whether it worked.
    ///
    /// Every failure, including a missing document, is logged and turned
    /// into `false`. Use `try_delete_by_id` when the cause matters.
    pub async fn delete_by_id<T: Record>(&self, id: impl ToString) -> bool {
        let id = id.to_string();
        match self.try_delete_by_id::<T>(&id).await {
            Ok(()) => true,
            Err(e) => {
                error!(record_type = T::RECORD_TYPE, id = %id, error = %e, "Failed to delete document");
                false
            }
        }
    }

    /// Count every document in `T`'s default index.
    pub async fn count_all<T: Record>(&self) -> Result<u64, SearchError> {
        let index = self.resolve_index::<T>(None)?;
        let body = self.backend().await?.count(&index).await?;
        let response =
            CountResponse::from_value(body).map_err(|e| SearchError::parse(e.to_string()))?;
        Ok(response.count)
    }
}
