//! Request types for search backend operations.

use serde_json::{json, Value};

/// How a document write treats an existing document with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace any existing document.
    Upsert,
    /// Fail with a conflict if the document already exists.
    CreateOnly,
}

/// Parameters for opening a scrolled match-all scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Index or alias to scan.
    pub index: String,
    /// Documents returned per shard on each page.
    pub page_size: usize,
    /// How long the service keeps the cursor alive between calls (e.g. `3m`).
    pub ttl: String,
}

/// A single action in an `_aliases` request.
///
/// Actions sent together in one request are applied atomically by the
/// service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasAction {
    /// Point `alias` at `index`.
    Add { alias: String, index: String },
    /// Stop pointing `alias` at `index`. The index itself is untouched.
    Remove { alias: String, index: String },
}

impl AliasAction {
    pub fn add(alias: impl Into<String>, index: impl Into<String>) -> Self {
        Self::Add {
            alias: alias.into(),
            index: index.into(),
        }
    }

    pub fn remove(alias: impl Into<String>, index: impl Into<String>) -> Self {
        Self::Remove {
            alias: alias.into(),
            index: index.into(),
        }
    }

    /// The action as it appears in the `actions` array of an `_aliases` body.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Add { alias, index } => json!({ "add": { "index": index, "alias": alias } }),
            Self::Remove { alias, index } => {
                json!({ "remove": { "index": index, "alias": alias } })
            }
        }
    }
}
