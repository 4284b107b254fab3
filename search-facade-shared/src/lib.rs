//! # Search Facade Shared
//!
//! Types shared between the search backend and the facade: the `Record`
//! trait implemented by caller payloads, and the typed views of the
//! responses returned by the search service.

mod record;
mod responses;

pub use record::Record;
pub use responses::{AliasesResponse, CountResponse, DocumentHit, IndexResponse, ScrollPage};
