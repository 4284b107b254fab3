//! Record trait for caller-supplied payloads.

use serde::{de::DeserializeOwned, Serialize};

/// A caller-defined document stored in the search service.
///
/// The facade never inspects the payload. It only needs a record-type tag,
/// used to look up the default index, and the identifier the document is
/// stored under.
///
/// # Example
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Promotion {
///     id: u64,
///     title: String,
/// }
///
/// impl Record for Promotion {
///     const RECORD_TYPE: &'static str = "promotion";
///
///     fn record_id(&self) -> String {
///         self.id.to_string()
///     }
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Tag mapped to a default index name in the facade configuration.
    const RECORD_TYPE: &'static str;

    /// Identifier of the document in its index.
    fn record_id(&self) -> String;
}
