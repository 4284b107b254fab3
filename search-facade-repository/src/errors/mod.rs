//! Error types for the search facade repository.

mod search_error;

pub use search_error::SearchError;
