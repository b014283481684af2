//! Key-value store abstraction and backends.
//!
//! A Zarr hierarchy is addressed as a flat map from string keys
//! (`.zgroup`, `.zattrs`, `0/.zarray`, `0/0.0.0.1.2`, ...) to bytes. The
//! [`Store`] trait captures the two capabilities the resolver needs:
//! an existence check and a whole-object read.
//!
//! Backends:
//!
//! - [`MemoryStore`] - in-memory map, useful for tests and embedded data
//! - [`FilesystemStore`] - a directory on the local filesystem
//! - [`HttpStore`] - a static HTTP(S) endpoint
//! - [`S3Store`] - an S3 or S3-compatible bucket and prefix
//!
//! [`open_location`] upgrades a location string into the matching backend, and
//! [`StorageAdapter`] exposes any store to `zarrs` for array access.

mod adapter;
mod filesystem;
mod http;
mod location;
mod memory;
mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

pub use adapter::StorageAdapter;
pub use filesystem::FilesystemStore;
pub use http::HttpStore;
pub use location::open_location;
pub use memory::MemoryStore;
pub use s3::{create_s3_client, S3Store};

/// Trait for reading objects from a Zarr key-value store.
///
/// Implementations must be thread-safe; the resolver shares one store
/// between concurrent array opens.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check whether `key` exists in the store.
    async fn contains_item(&self, key: &str) -> Result<bool, StoreError>;

    /// Read the full contents of `key`.
    ///
    /// Returns `StoreError::NotFound` if the key does not exist.
    async fn get_item(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Get a unique identifier for this store (for logging).
    fn identifier(&self) -> &str;
}

/// A store shared between the resolver and the arrays it opens.
pub type SharedStore = Arc<dyn Store>;

/// Join a node path and a key relative to it.
///
/// An empty path refers to the store root.
pub fn join_key(path: &str, key: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", path, key)
    }
}

/// Reject keys that climb out of the store root.
///
/// Percent-encoded dots count, since URL resolution decodes them.
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    let escapes = key.split(['/', '\\']).any(|segment| {
        let segment = segment.to_ascii_lowercase().replace("%2e", ".");
        segment == ".."
    });
    if escapes {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
