//! Typed views of search service responses.
//!
//! Bodies arrive from the backend as raw JSON. These types pick out the
//! parts callers care about and leave everything else behind.

use std::collections::{BTreeMap, BTreeSet};

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

/// Acknowledgement returned by an index or create call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexResponse {
    /// Concrete index the document landed in.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version after the write.
    #[serde(rename = "_version", default)]
    pub version: Option<u64>,
    /// Outcome reported by the service (`created`, `updated`, ...).
    #[serde(default)]
    pub result: Option<String>,
}

impl IndexResponse {
    /// Parse an index response body.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(body)
    }

    /// Whether the write created a new document rather than replacing one.
    pub fn is_created(&self) -> bool {
        self.result.as_deref() == Some("created")
    }
}

/// A single document returned from a search or scroll page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentHit<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: T,
}

/// One page of a scrolled scan together with the cursor for the next page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollPage<T> {
    /// Cursor to pass to the next scroll call. Opaque to the facade.
    pub scroll_id: Option<String>,
    /// Total number of documents matched by the scan, when reported.
    pub total: Option<u64>,
    /// Documents on this page.
    pub hits: Vec<DocumentHit<T>>,
}

#[derive(Deserialize)]
struct RawSearchBody<T> {
    #[serde(rename = "_scroll_id", default)]
    scroll_id: Option<String>,
    hits: RawHits<T>,
}

#[derive(Deserialize)]
struct RawHits<T> {
    #[serde(default)]
    total: Option<RawTotal>,
    hits: Vec<DocumentHit<T>>,
}

// Older engines report a bare number, newer ones an object with a relation.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl<T: DeserializeOwned> ScrollPage<T> {
    /// Parse a `_search` or `_search/scroll` response body.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let raw: RawSearchBody<T> = serde_json::from_value(body)?;

        Ok(Self {
            scroll_id: raw.scroll_id,
            total: raw.hits.total.map(|total| match total {
                RawTotal::Count(count) => count,
                RawTotal::Object { value } => value,
            }),
            hits: raw.hits.hits,
        })
    }
}

impl<T> ScrollPage<T> {
    /// An empty page means the scan is exhausted.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Iterate over the documents on this page.
    pub fn documents(&self) -> impl Iterator<Item = &T> {
        self.hits.iter().map(|hit| &hit.source)
    }

    /// Consume the page, keeping only the documents.
    pub fn into_documents(self) -> Vec<T> {
        self.hits.into_iter().map(|hit| hit.source).collect()
    }
}

/// Aliases grouped by the concrete index they point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasesResponse {
    indices: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Deserialize)]
struct RawIndexAliases {
    #[serde(default)]
    aliases: BTreeMap<String, Value>,
}

impl AliasesResponse {
    /// Parse a `GET /{index}/_alias` response body.
    ///
    /// The body is keyed by index name, each entry holding an `aliases`
    /// object keyed by alias name.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, RawIndexAliases> = serde_json::from_value(body)?;

        let indices = raw
            .into_iter()
            .map(|(index, entry)| (index, entry.aliases.into_keys().collect()))
            .collect();

        Ok(Self { indices })
    }

    /// Aliases pointing at `index`, sorted by name.
    pub fn aliases_for(&self, index: &str) -> Vec<&str> {
        self.indices
            .get(index)
            .map(|aliases| aliases.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every distinct alias in the response.
    pub fn all_aliases(&self) -> BTreeSet<&str> {
        self.indices
            .values()
            .flat_map(|aliases| aliases.iter().map(String::as_str))
            .collect()
    }

    /// Whether `alias` points at `index`.
    pub fn points_to(&self, alias: &str, index: &str) -> bool {
        self.indices
            .get(index)
            .is_some_and(|aliases| aliases.contains(alias))
    }

    /// Indices present in the response.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.indices.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.values().all(BTreeSet::is_empty)
    }
}

/// Result of a `_count` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

impl CountResponse {
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(body)
    }
}
