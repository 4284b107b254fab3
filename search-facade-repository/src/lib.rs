//! # Search Facade Repository
//!
//! This crate provides the trait and implementation for talking to the
//! search service. It includes definitions for errors, request types, the
//! backend interface, and a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::BackendConfig;
pub use errors::SearchError;
pub use interfaces::SearchBackend;
pub use crate::opensearch::OpenSearchBackend;
pub use types::{AliasAction, ScrollRequest, WriteMode};
