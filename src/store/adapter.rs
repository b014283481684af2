use std::fmt;

use async_trait::async_trait;
use zarrs::storage::byte_range::{ByteRange, ByteRangeIterator};
use zarrs::storage::{
    AsyncMaybeBytesIterator, AsyncReadableStorageTraits, MaybeBytes, StorageError, StoreKey,
};

use super::SharedStore;
use crate::error::StoreError;

/// Exposes a [`SharedStore`] to `zarrs` as async readable storage.
///
/// Reads are whole-object only. A key the store reports as `NotFound` reads
/// as `None`, which `zarrs` treats as an unwritten chunk.
#[derive(Clone)]
pub struct StorageAdapter {
    store: SharedStore,
}

impl StorageAdapter {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}

impl fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("store", &self.store.identifier())
            .finish()
    }
}

#[async_trait]
impl AsyncReadableStorageTraits for StorageAdapter {
    async fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        match self.store.get_item(key.as_str()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(StorageError::Other(e.to_string())),
        }
    }

    async fn get_partial(
        &self,
        _key: &StoreKey,
        _byte_range: ByteRange,
    ) -> Result<MaybeBytes, StorageError> {
        Err(StorageError::Unsupported(
            "get_partial not supported".into(),
        ))
    }

    async fn get_partial_many<'a>(
        &'a self,
        _key: &StoreKey,
        _byte_ranges: ByteRangeIterator<'a>,
    ) -> Result<AsyncMaybeBytesIterator<'a>, StorageError> {
        Err(StorageError::Unsupported(
            "get_partial_many not supported".into(),
        ))
    }

    async fn size_key(&self, key: &StoreKey) -> Result<Option<u64>, StorageError> {
        Ok(self.get(key).await?.map(|bytes| bytes.len() as u64))
    }

    fn supports_get_partial(&self) -> bool {
        false
    }
}
