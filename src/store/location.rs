use std::sync::Arc;

use tracing::debug;
use url::{ParseError, Url};

use super::{create_s3_client, FilesystemStore, HttpStore, S3Store, SharedStore};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Upgrade a location string into a store.
///
/// Supported forms:
///
/// - `http://...` and `https://...` - [`HttpStore`]
/// - `s3://bucket/prefix` - [`S3Store`]
/// - `file:///path` or a bare filesystem path - [`FilesystemStore`]
pub async fn open_location(location: &str, config: &StoreConfig) -> Result<SharedStore, StoreError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(StoreError::InvalidLocation("empty location".to_string()));
    }

    let url = match Url::parse(location) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            debug!(location, "treating location as a filesystem path");
            return Ok(Arc::new(FilesystemStore::new(location)?));
        }
        Err(e) => {
            return Err(StoreError::InvalidLocation(format!("{}: {}", location, e)));
        }
    };

    match url.scheme() {
        "http" | "https" => {
            debug!(url = %url, "opening HTTP store");
            Ok(Arc::new(HttpStore::new(url, config)?))
        }
        "s3" => {
            let bucket = url
                .host_str()
                .filter(|b| !b.is_empty())
                .ok_or_else(|| {
                    StoreError::InvalidLocation(format!("{}: missing bucket name", location))
                })?
                .to_string();
            let prefix = url.path().trim_matches('/').to_string();
            debug!(bucket = %bucket, prefix = %prefix, "opening S3 store");

            let client = create_s3_client(config).await;
            Ok(Arc::new(S3Store::new(client, bucket, prefix)))
        }
        "file" => {
            let path = url.to_file_path().map_err(|_| {
                StoreError::InvalidLocation(format!("{}: not a local file path", location))
            })?;
            Ok(Arc::new(FilesystemStore::new(path)?))
        }
        scheme => Err(StoreError::InvalidLocation(format!(
            "{}: unsupported scheme '{}'",
            location, scheme
        ))),
    }
}
