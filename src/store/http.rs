use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::trace;
use url::Url;

use super::{check_key, Store};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Store backed by a static HTTP(S) endpoint.
///
/// Each key is resolved relative to the base URL; existence checks use `HEAD`
/// and reads use `GET`. Static hosts report missing objects inconsistently
/// (`404`, or `403` from buckets without list permission), so any client
/// error counts as absent. Server errors are transport failures.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base: Url,
    identifier: String,
}

impl HttpStore {
    /// Create a store rooted at `base`, building a client from `config`.
    pub fn new(base: Url, config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| StoreError::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base))
    }

    /// Create a store rooted at `base` using an existing client.
    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let identifier = base.to_string();
        Self {
            client,
            base,
            identifier,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, key: &str) -> Result<Url, StoreError> {
        check_key(key)?;
        self.base
            .join(key.trim_start_matches('/'))
            .map_err(|e| StoreError::InvalidLocation(format!("{}{}: {}", self.base, key, e)))
    }
}

#[async_trait]
impl Store for HttpStore {
    async fn contains_item(&self, key: &str) -> Result<bool, StoreError> {
        let url = self.url_for(key)?;
        let response = self
            .client
            .head(url.clone())
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = match response.status() {
            // Some hosts only answer GET
            StatusCode::METHOD_NOT_ALLOWED => self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?
                .status(),
            status => status,
        };

        match status {
            status if status.is_success() => Ok(true),
            status if status.is_client_error() => {
                trace!(key, status = status.as_u16(), "treating key as absent");
                Ok(false)
            }
            status => Err(StoreError::Http(format!("HEAD {} returned {}", key, status))),
        }
    }

    async fn get_item(&self, key: &str) -> Result<Bytes, StoreError> {
        let url = self.url_for(key)?;
        trace!(url = %url, "fetching item");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .bytes()
                .await
                .map_err(|e| StoreError::Connection(e.to_string())),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN | StatusCode::GONE => {
                Err(StoreError::NotFound(key.to_string()))
            }
            status => Err(StoreError::Http(format!("GET {} returned {}", key, status))),
        }
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
