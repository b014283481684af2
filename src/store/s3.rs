use async_trait::async_trait;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::trace;

use super::{check_key, join_key, Store};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// S3-backed implementation of `Store`.
///
/// Keys are resolved under a prefix within one bucket, so `s3://bucket/a.zarr`
/// reads `.zattrs` from the object `a.zarr/.zattrs`.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    prefix: String,
    identifier: String,
}

impl S3Store {
    /// Create a store for the given bucket and key prefix.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let prefix = prefix.into().trim_matches('/').to_string();
        let identifier = if prefix.is_empty() {
            format!("s3://{}", bucket)
        } else {
            format!("s3://{}/{}", bucket, prefix)
        };

        Self {
            client,
            bucket,
            prefix,
            identifier,
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the key prefix (without leading or trailing slashes).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn object_key(&self, key: &str) -> String {
        join_key(&self.prefix, key.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

#[async_trait]
impl Store for S3Store {
    async fn contains_item(&self, key: &str) -> Result<bool, StoreError> {
        check_key(key)?;
        let object_key = self.object_key(key);
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let is_not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);
                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if is_not_found || status_is_404 {
                    Ok(false)
                } else {
                    Err(StoreError::S3(e.to_string()))
                }
            }
        }
    }

    async fn get_item(&self, key: &str) -> Result<Bytes, StoreError> {
        check_key(key)?;
        let object_key = self.object_key(key);
        trace!(bucket = %self.bucket, key = %object_key, "fetching object");

        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
            .map_err(|e| {
                let is_no_such_key = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if is_no_such_key || status_is_404 {
                    StoreError::NotFound(key.to_string())
                } else {
                    StoreError::S3(e.to_string())
                }
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .into_bytes();

        Ok(data)
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Create an S3 client from the store configuration.
///
/// A custom endpoint (MinIO and other S3-compatible services) switches the
/// client to path-style addressing.
pub async fn create_s3_client(config: &StoreConfig) -> Client {
    let region = aws_config::Region::new(config.s3_region.clone());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = &config.s3_endpoint {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.s3_endpoint.is_some())
        .build();

    Client::from_conf(s3_config)
}
