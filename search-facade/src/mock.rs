//! In-memory search backend and connectors for tests.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use search_facade_repository::{
    AliasAction, BackendConfig, ScrollRequest, SearchBackend, SearchError, WriteMode,
};
use serde_json::{json, Map, Value};

use crate::connection::Connector;

#[derive(Default)]
struct State {
    /// index -> id -> source
    indices: BTreeMap<String, BTreeMap<String, Value>>,
    /// index -> aliases pointing at it
    aliases: BTreeMap<String, BTreeSet<String>>,
    /// cursor -> (page size, hits not yet returned)
    scrolls: HashMap<String, (usize, VecDeque<Value>)>,
    next_scroll: usize,
    /// TTLs received by `open_scroll` and `continue_scroll`, in order.
    scroll_ttls: Vec<String>,
    alias_calls: usize,
}

impl State {
    /// Concrete indices behind an index or alias name.
    fn resolve(&self, name: &str) -> Vec<String> {
        if self.indices.contains_key(name) {
            return vec![name.to_string()];
        }
        self.aliases
            .iter()
            .filter(|(_, aliases)| aliases.contains(name))
            .map(|(index, _)| index.clone())
            .collect()
    }

    fn resolve_existing(&self, name: &str) -> Result<Vec<String>, SearchError> {
        let indices = self.resolve(name);
        if indices.is_empty() {
            return Err(SearchError::from_status(
                404,
                format!("index_not_found_exception: {}", name),
            ));
        }
        Ok(indices)
    }

    fn take_page(&mut self, cursor: &str) -> Option<Vec<Value>> {
        let (page_size, remaining) = self.scrolls.get_mut(cursor)?;
        let take = (*page_size).min(remaining.len());
        Some(remaining.drain(..take).collect())
    }
}

fn page_body(cursor: &str, total: usize, hits: Vec<Value>) -> Value {
    json!({
        "_scroll_id": cursor,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "hits": hits
        }
    })
}

/// A search backend holding everything in memory.
///
/// Models the parts of the service the facade relies on: create-only
/// conflicts, aliases resolved on write and read, atomic alias updates, and
/// paged scroll cursors.
pub struct InMemoryBackend {
    healthy: bool,
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            healthy: true,
            state: Mutex::new(State::default()),
        }
    }

    /// A backend whose health check reports an unhealthy cluster.
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create `index` with the given documents.
    pub fn with_documents(self, index: &str, documents: Vec<(String, Value)>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let entries = state.indices.entry(index.to_string()).or_default();
            entries.extend(documents);
        }
        self
    }

    /// Create an empty index.
    pub fn with_index(self, index: &str) -> Self {
        self.with_documents(index, Vec::new())
    }

    pub fn document(&self, index: &str, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.indices.get(index)?.get(id).cloned()
    }

    pub fn aliases_of(&self, index: &str) -> BTreeSet<String> {
        let state = self.state.lock().unwrap();
        state.aliases.get(index).cloned().unwrap_or_default()
    }

    pub fn scroll_ttls(&self) -> Vec<String> {
        self.state.lock().unwrap().scroll_ttls.clone()
    }

    /// Number of `_aliases` requests received.
    pub fn alias_calls(&self) -> usize {
        self.state.lock().unwrap().alias_calls
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(self.healthy)
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: Value,
        mode: WriteMode,
    ) -> Result<Value, SearchError> {
        let mut state = self.state.lock().unwrap();
        let target = match state.resolve(index).as_slice() {
            [single] => single.clone(),
            [] => index.to_string(),
            _ => {
                return Err(SearchError::from_status(
                    400,
                    format!("alias [{}] has more than one index associated with it", index),
                ))
            }
        };

        let documents = state.indices.entry(target.clone()).or_default();
        let exists = documents.contains_key(id);
        if exists && mode == WriteMode::CreateOnly {
            return Err(SearchError::from_status(
                409,
                format!("version_conflict_engine_exception: [{}]: document already exists", id),
            ));
        }
        documents.insert(id.to_string(), document);

        Ok(json!({
            "_index": target,
            "_id": id,
            "_version": 1,
            "result": if exists { "updated" } else { "created" }
        }))
    }

    async fn open_scroll(&self, request: &ScrollRequest) -> Result<Value, SearchError> {
        let mut state = self.state.lock().unwrap();
        state.scroll_ttls.push(request.ttl.clone());
        let indices = state.resolve_existing(&request.index)?;

        let hits: VecDeque<Value> = indices
            .iter()
            .flat_map(|index| {
                state.indices[index].iter().map(move |(id, source)| {
                    json!({ "_index": index, "_id": id, "_score": null, "_source": source })
                })
            })
            .collect();
        let total = hits.len();

        state.next_scroll += 1;
        let cursor = format!("scroll-{}", state.next_scroll);
        state
            .scrolls
            .insert(cursor.clone(), (request.page_size, hits));

        let page = state.take_page(&cursor).unwrap_or_default();
        Ok(page_body(&cursor, total, page))
    }

    async fn continue_scroll(&self, scroll_id: &str, ttl: &str) -> Result<Value, SearchError> {
        let mut state = self.state.lock().unwrap();
        state.scroll_ttls.push(ttl.to_string());
        let page = state.take_page(scroll_id).ok_or_else(|| {
            SearchError::from_status(404, format!("search_context_missing_exception: {}", scroll_id))
        })?;
        Ok(page_body(scroll_id, page.len(), page))
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        state
            .scrolls
            .remove(scroll_id)
            .map(|_| ())
            .ok_or_else(|| SearchError::from_status(404, format!("no scroll {}", scroll_id)))
    }

    async fn get_aliases(&self, index: &str) -> Result<Value, SearchError> {
        let state = self.state.lock().unwrap();
        let indices = state.resolve_existing(index)?;

        let mut body = Map::new();
        for index in indices {
            let aliases: Map<String, Value> = state
                .aliases
                .get(&index)
                .into_iter()
                .flatten()
                .map(|alias| (alias.clone(), json!({})))
                .collect();
            body.insert(index, json!({ "aliases": aliases }));
        }
        Ok(Value::Object(body))
    }

    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        state.alias_calls += 1;

        // All actions are validated before any is applied.
        for action in actions {
            match action {
                AliasAction::Add { index, .. } => {
                    if !state.indices.contains_key(index) {
                        return Err(SearchError::from_status(
                            404,
                            format!("index_not_found_exception: {}", index),
                        ));
                    }
                }
                AliasAction::Remove { alias, index } => {
                    let present = state
                        .aliases
                        .get(index)
                        .is_some_and(|aliases| aliases.contains(alias));
                    if !present {
                        return Err(SearchError::from_status(
                            404,
                            format!("aliases_not_found_exception: [{}] on [{}]", alias, index),
                        ));
                    }
                }
            }
        }

        for action in actions {
            match action {
                AliasAction::Add { alias, index } => {
                    state
                        .aliases
                        .entry(index.clone())
                        .or_default()
                        .insert(alias.clone());
                }
                AliasAction::Remove { alias, index } => {
                    if let Some(aliases) = state.aliases.get_mut(index) {
                        aliases.remove(alias);
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap();
        let indices = state.resolve_existing(index)?;

        let removed = indices.iter().any(|index| {
            state
                .indices
                .get_mut(index)
                .is_some_and(|documents| documents.remove(id).is_some())
        });
        if !removed {
            return Err(SearchError::from_status(
                404,
                format!("document [{}] not found in [{}]", id, index),
            ));
        }
        Ok(())
    }

    async fn count(&self, index: &str) -> Result<Value, SearchError> {
        let state = self.state.lock().unwrap();
        let indices = state.resolve_existing(index)?;
        let count: usize = indices.iter().map(|index| state.indices[index].len()).sum();
        Ok(json!({ "count": count }))
    }
}

/// Connector handing out a shared in-memory backend and counting calls.
pub struct CountingConnector {
    backend: Arc<InMemoryBackend>,
    calls: Arc<AtomicUsize>,
    failures_remaining: AtomicUsize,
    delay: Duration,
}

impl CountingConnector {
    pub fn new(backend: Arc<InMemoryBackend>) -> Self {
        Self {
            backend,
            calls: Arc::new(AtomicUsize::new(0)),
            failures_remaining: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Sleep inside `connect` so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the first `failures` connection attempts.
    pub fn failing_first(self, failures: usize) -> Self {
        self.failures_remaining.store(failures, Ordering::SeqCst);
        self
    }

    /// Shared counter of `connect` invocations.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(&self, _config: &BackendConfig) -> Result<Arc<dyn SearchBackend>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SearchError::connection("simulated connection failure"));
        }

        let backend: Arc<dyn SearchBackend> = self.backend.clone();
        Ok(backend)
    }
}
