//! Mapping from record types to their default index.

use std::collections::HashMap;

use search_facade_repository::SearchError;

/// Default index names keyed by record-type tag.
///
/// Extend this mapping whenever a new record type is introduced, either in
/// code with `with` or through `SEARCH_TYPE_INDICES`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeIndexMap {
    indices: HashMap<String, String>,
}

impl TypeIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping, replacing any previous index for `record_type`.
    pub fn with(mut self, record_type: impl Into<String>, index: impl Into<String>) -> Self {
        self.insert(record_type, index);
        self
    }

    pub fn insert(&mut self, record_type: impl Into<String>, index: impl Into<String>) {
        self.indices.insert(record_type.into(), index.into());
    }

    /// Default index for `record_type`, if one is mapped.
    pub fn index_for(&self, record_type: &str) -> Option<&str> {
        self.indices.get(record_type).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Parse `type=index` pairs separated by commas.
    ///
    /// Whitespace around names is ignored and empty entries are skipped.
    /// A record type may only appear once.
    ///
    /// ```ignore
    /// let map = TypeIndexMap::parse("promotion=promotions, coupon=coupons")?;
    /// assert_eq!(map.index_for("coupon"), Some("coupons"));
    /// ```
    pub fn parse(text: &str) -> Result<Self, SearchError> {
        let mut map = Self::new();

        for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (record_type, index) = entry.split_once('=').ok_or_else(|| {
                SearchError::config(format!("Expected type=index, got '{}'", entry))
            })?;

            let record_type = record_type.trim();
            let index = index.trim();
            if record_type.is_empty() || index.is_empty() {
                return Err(SearchError::config(format!(
                    "Empty record type or index in '{}'",
                    entry
                )));
            }
            if map.indices.contains_key(record_type) {
                return Err(SearchError::config(format!(
                    "Record type '{}' is mapped more than once",
                    record_type
                )));
            }

            map.insert(record_type, index);
        }

        Ok(map)
    }
}
