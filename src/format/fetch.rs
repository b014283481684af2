//! Fetching and decoding small JSON metadata objects.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::{LoaderError, Result, StoreError};
use crate::store::Store;

/// Read `key` from the store and decode it as UTF-8 JSON.
///
/// # Errors
/// * `LoaderError::NotFound` - the key is absent
/// * `LoaderError::MalformedMetadata` - the bytes are not UTF-8 JSON
/// * `LoaderError::Store` - any other store failure, unchanged
pub async fn fetch_json(store: &dyn Store, key: &str) -> Result<Value> {
    let bytes = store.get_item(key).await.map_err(|e| match e {
        StoreError::NotFound(_) => LoaderError::NotFound {
            key: key.to_string(),
        },
        other => LoaderError::Store(other),
    })?;

    trace!(store = store.identifier(), key, len = bytes.len(), "fetched metadata");
    decode_json(key, &bytes)
}

/// Read `key` and decode it into a typed metadata document.
///
/// A document that is valid JSON but does not match `T` is reported as
/// `LoaderError::MalformedMetadata`.
pub async fn fetch_attributes<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Result<T> {
    let value = fetch_json(store, key).await?;
    serde_json::from_value(value).map_err(|e| LoaderError::malformed(key, e))
}

fn decode_json(key: &str, bytes: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(bytes).map_err(|e| LoaderError::malformed(key, e))?;
    serde_json::from_str(text).map_err(|e| LoaderError::malformed(key, e))
}
