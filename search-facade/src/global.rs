//! Process-wide facade instance.

use std::sync::OnceLock;

use tracing::info;

use crate::config::FacadeConfig;
use crate::facade::SearchFacade;

static GLOBAL: OnceLock<SearchFacade> = OnceLock::new();

/// The process-wide facade.
///
/// Built on first call from `.env` and the environment (see
/// `FacadeConfig::from_env`) and kept for the lifetime of the process. The
/// connection itself is still only established by the first operation.
pub fn global() -> &'static SearchFacade {
    GLOBAL.get_or_init(|| {
        dotenv::dotenv().ok();
        let config = FacadeConfig::from_env();

        info!(
            url = %config.backend.url,
            max_retries = config.backend.max_retries,
            scroll_ttl = %config.scroll_ttl,
            scroll_page_size = config.scroll_page_size,
            mapped_types = config.type_indices.len(),
            "Initializing search facade"
        );

        SearchFacade::new(config)
    })
}
