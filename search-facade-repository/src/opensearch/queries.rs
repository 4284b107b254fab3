//! OpenSearch request bodies.
//!
//! This module builds the JSON bodies sent by the OpenSearch backend. The
//! facade only ever issues match-all queries, so there is no query DSL here.

use serde_json::{json, Value};

use crate::types::AliasAction;

/// The match-all query clause.
fn match_all() -> Value {
    json!({ "match_all": {} })
}

/// Build the body for opening a scrolled scan.
///
/// Sorting on `_doc` skips relevance scoring and returns documents in
/// index order, which is the cheapest way to walk a whole index.
pub fn build_scan_query(page_size: usize) -> Value {
    json!({
        "size": page_size,
        "query": match_all(),
        "sort": ["_doc"]
    })
}

/// Build the body for continuing a scan.
pub fn build_scroll_continuation(scroll_id: &str, ttl: &str) -> Value {
    json!({
        "scroll": ttl,
        "scroll_id": scroll_id
    })
}

/// Build the body for releasing a scan cursor.
pub fn build_clear_scroll(scroll_id: &str) -> Value {
    json!({ "scroll_id": [scroll_id] })
}

/// Build the body for counting every document in an index.
pub fn build_count_query() -> Value {
    json!({ "query": match_all() })
}

/// Build an `_aliases` body. Actions keep their order.
pub fn build_alias_actions(actions: &[AliasAction]) -> Value {
    json!({
        "actions": actions.iter().map(AliasAction::to_json).collect::<Vec<_>>()
    })
}
