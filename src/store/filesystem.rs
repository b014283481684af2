use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;
use zarrs::filesystem::FilesystemStore as DirectoryStore;
use zarrs::storage::{ReadableStorageTraits, StoreKey};

use super::{check_key, Store};
use crate::error::StoreError;

/// Store backed by a directory on the local filesystem.
///
/// File access goes through `zarrs`' filesystem store on the blocking pool.
/// Keys that climb out of the root with `..` are rejected.
#[derive(Clone)]
pub struct FilesystemStore {
    inner: Arc<DirectoryStore>,
    root: PathBuf,
    identifier: String,
}

impl FilesystemStore {
    /// Create a store rooted at `root`.
    ///
    /// The directory does not need to exist yet; missing keys surface as
    /// `StoreError::NotFound` on first access.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let inner = DirectoryStore::new(&root)
            .map_err(|e| StoreError::Filesystem(format!("{}: {}", root.display(), e)))?;
        let identifier = format!("file://{}", root.display());

        Ok(Self {
            inner: Arc::new(inner),
            root,
            identifier,
        })
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_key(&self, key: &str) -> Result<StoreKey, StoreError> {
        check_key(key)?;
        StoreKey::new(key.trim_start_matches('/'))
            .map_err(|e| StoreError::InvalidKey(format!("{}: {}", key, e)))
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&DirectoryStore) -> Result<T, zarrs::storage::StorageError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(inner.as_ref()))
            .await
            .map_err(|e| StoreError::Filesystem(format!("blocking read failed: {}", e)))?
            .map_err(|e| StoreError::Filesystem(format!("{}: {}", self.root.display(), e)))
    }
}

impl std::fmt::Debug for FilesystemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesystemStore")
            .field("root", &self.root)
            .finish()
    }
}

#[async_trait]
impl Store for FilesystemStore {
    async fn contains_item(&self, key: &str) -> Result<bool, StoreError> {
        let store_key = self.store_key(key)?;
        let size = self.blocking(move |store| store.size_key(&store_key)).await?;
        Ok(size.is_some())
    }

    async fn get_item(&self, key: &str) -> Result<Bytes, StoreError> {
        let store_key = self.store_key(key)?;
        trace!(root = %self.root.display(), key, "reading item");

        self.blocking(move |store| store.get(&store_key))
            .await?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
