//! Opened Zarr v2 arrays.
//!
//! A [`ZarrArray`] is one resolution level: a `zarrs` array opened over the
//! resolver's store, plus the store and path it was opened from. Chunks can
//! be fetched as raw stored bytes, or decoded through [`ZarrArray::array`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;
use zarrs::array::{Array, ArrayMetadata, ArrayMetadataV2};

use crate::error::{LoaderError, Result, StoreError};
use crate::store::{join_key, SharedStore, StorageAdapter};

use super::detect::ARRAY_KEY;
use super::fetch::fetch_attributes;

/// An opened chunked array at one path of a store.
#[derive(Clone)]
pub struct ZarrArray {
    store: SharedStore,
    path: String,
    chunks: Vec<u64>,
    array: Arc<Array<StorageAdapter>>,
}

impl ZarrArray {
    /// Open the array at `path` (empty for the store root).
    ///
    /// `<path>/.zarray` is read through the store so a missing key is reported
    /// as `LoaderError::NotFound` and transport errors keep their kind; the
    /// metadata is then validated by `zarrs`.
    pub async fn open(store: SharedStore, path: &str) -> Result<Self> {
        let path = path.trim_matches('/').to_string();
        let key = join_key(&path, ARRAY_KEY);
        let metadata: ArrayMetadataV2 = fetch_attributes(store.as_ref(), &key).await?;
        let chunks: Vec<u64> = metadata.chunks.iter().map(|c| c.get()).collect();

        let storage = Arc::new(StorageAdapter::new(store.clone()));
        let node_path = format!("/{}", path);
        let array = Array::new_with_metadata(storage, &node_path, ArrayMetadata::V2(metadata))
            .map_err(|e| LoaderError::malformed(&key, e))?;

        debug!(
            store = store.identifier(),
            path = %path,
            shape = ?array.shape(),
            chunks = ?chunks,
            "opened array"
        );

        Ok(Self {
            store,
            path,
            chunks,
            array: Arc::new(array),
        })
    }

    /// Path of this array within the store ("" for the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The underlying `zarrs` array, for decoding chunks and subsets.
    pub fn array(&self) -> &Array<StorageAdapter> {
        &self.array
    }

    /// Length of each axis.
    pub fn shape(&self) -> &[u64] {
        self.array.shape()
    }

    /// Chunk length along each axis.
    pub fn chunks(&self) -> &[u64] {
        &self.chunks
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.array.dimensionality()
    }

    /// The store this array was opened from.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Number of chunks along each axis.
    pub fn chunk_grid_shape(&self) -> &[u64] {
        self.array.chunk_grid_shape()
    }

    /// Store key of the chunk at `coords` in the chunk grid.
    ///
    /// Returns `None` if `coords` has the wrong length or lies outside the grid.
    pub fn chunk_key(&self, coords: &[u64]) -> Option<String> {
        if coords.len() != self.rank() {
            return None;
        }

        let grid = self.chunk_grid_shape();
        if coords.iter().zip(grid).any(|(&c, &n)| c >= n) {
            return None;
        }

        Some(self.array.chunk_key(coords).as_str().to_string())
    }

    /// Fetch the stored (still encoded) bytes of one chunk.
    ///
    /// Returns `Ok(None)` for a chunk that was never written, which readers
    /// fill with `fill_value`.
    pub async fn retrieve_chunk_bytes(&self, coords: &[u64]) -> Result<Option<Bytes>> {
        if coords.len() != self.rank() {
            return Err(LoaderError::DimensionMismatch {
                path: self.path.clone(),
                rank: self.rank(),
                dimensions: coords.len(),
            });
        }

        let key = self
            .chunk_key(coords)
            .ok_or_else(|| LoaderError::ChunkOutOfBounds {
                path: self.path.clone(),
                coords: coords.to_vec(),
            })?;

        match self.store.get_item(&key).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl fmt::Debug for ZarrArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZarrArray")
            .field("store", &self.store.identifier())
            .field("path", &self.path)
            .field("shape", &self.shape())
            .field("chunks", &self.chunks)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
