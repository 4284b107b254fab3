//! Configuration for the search facade.

mod settings;
mod type_indices;

pub use settings::{
    parse_time_value, FacadeConfig, DEFAULT_SCROLL_PAGE_SIZE, DEFAULT_SCROLL_TTL, ENV_MAX_RETRIES,
    ENV_SCROLL_PAGE_SIZE, ENV_SCROLL_TTL, ENV_TYPE_INDICES, ENV_URL,
};
pub use type_indices::TypeIndexMap;
