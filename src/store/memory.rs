use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use super::Store;
use crate::error::StoreError;

/// In-memory store backed by a map of keys to bytes.
///
/// Items are added up front with the builder methods; the store is read-only
/// once handed to the resolver.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    items: HashMap<String, Bytes>,
    identifier: String,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            identifier: "memory://".to_string(),
        }
    }

    /// Add raw bytes under `key`.
    pub fn with_item(mut self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(key, data);
        self
    }

    /// Add a JSON document under `key`.
    pub fn with_json(self, key: impl Into<String>, value: &serde_json::Value) -> Self {
        let data = value.to_string().into_bytes();
        self.with_item(key, data)
    }

    /// Insert raw bytes under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.items.insert(key.into(), data.into());
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn contains_item(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.items.contains_key(key))
    }

    async fn get_item(&self, key: &str) -> Result<Bytes, StoreError> {
        self.items
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
