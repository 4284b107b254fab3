//! Connection construction and health tracking.

use std::sync::Arc;

use async_trait::async_trait;
use search_facade_repository::{BackendConfig, OpenSearchBackend, SearchBackend, SearchError};
use tracing::{error, info, instrument, warn};

/// Builds the backend a facade talks to.
///
/// The facade calls `connect` at most once; tests inject their own
/// connector to count constructions or serve an in-memory backend.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Build a backend for `config`. No health check is expected here.
    async fn connect(&self, config: &BackendConfig) -> Result<Arc<dyn SearchBackend>, SearchError>;
}

/// Connector producing an `OpenSearchBackend`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenSearchConnector;

#[async_trait]
impl Connector for OpenSearchConnector {
    async fn connect(&self, config: &BackendConfig) -> Result<Arc<dyn SearchBackend>, SearchError> {
        let backend: Arc<dyn SearchBackend> = Arc::new(OpenSearchBackend::new(config)?);
        Ok(backend)
    }
}

/// An established backend together with the outcome of its health check.
pub struct Connection {
    backend: Arc<dyn SearchBackend>,
    connected: bool,
}

impl Connection {
    /// Build the backend and run the initial health check.
    ///
    /// A failed health check is logged and recorded, never returned: the
    /// connection is still usable and callers decide from `is_connected`
    /// whether to rely on it. Only a failure to build the backend is an error.
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn establish(
        connector: &dyn Connector,
        config: &BackendConfig,
    ) -> Result<Self, SearchError> {
        let backend = connector.connect(config).await?;

        let connected = match backend.health_check().await {
            Ok(true) => {
                info!("Search service connection verified");
                true
            }
            Ok(false) => {
                warn!("Search service reported unhealthy, continuing disconnected");
                false
            }
            Err(e) => {
                error!(error = %e, "Connection failed");
                false
            }
        };

        Ok(Self { backend, connected })
    }

    /// Whether the initial health check succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn backend(&self) -> &dyn SearchBackend {
        self.backend.as_ref()
    }
}
