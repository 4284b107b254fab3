//! OpenSearch implementation of the search backend.
//!
//! This module provides a concrete implementation of `SearchBackend`
//! using OpenSearch as the remote service.

mod client;
mod queries;

pub use client::OpenSearchBackend;
