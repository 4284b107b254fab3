//! # Search Facade
//!
//! A thin facade over a remote search service. It holds one lazily
//! established connection and exposes typed calls for indexing, scrolled
//! scans, alias management, deletion and counting, filling in the
//! configured defaults so callers never pass connection parameters.

pub mod config;
pub mod connection;
pub mod facade;
pub mod global;
pub mod telemetry;

#[cfg(test)]
mod mock;

pub use config::{FacadeConfig, TypeIndexMap};
pub use connection::{Connection, Connector, OpenSearchConnector};
pub use facade::SearchFacade;
pub use global::global;
pub use telemetry::init_tracing;

pub use search_facade_repository::SearchError;
pub use search_facade_shared::{
    AliasesResponse, CountResponse, DocumentHit, IndexResponse, Record, ScrollPage,
};
