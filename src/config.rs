//! Configuration for loader resolution and store construction.
//!
//! Two small configuration types live here:
//!
//! - [`ResolverConfig`] controls the policies the pyramid resolver applies when
//!   the store's metadata leaves room for interpretation (a missing multiscales
//!   listing, small-image collapsing).
//! - [`StoreConfig`] controls how a location string is upgraded into a store
//!   (HTTP timeout, S3 endpoint and region).
//!
//! Both come with defaults that reproduce the reference viewer's behaviour, so
//! `ResolverConfig::default()` is the right choice for most callers.
//!
//! # Example
//!
//! ```
//! use ome_zarr_loader::config::{ResolverConfig, SmallImagePolicy};
//!
//! let config = ResolverConfig::default()
//!     .with_small_image_policy(SmallImagePolicy::MaxExtent(2048))
//!     .fail_on_missing_multiscales();
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

// =============================================================================
// Default Values
// =============================================================================

/// Dataset path assumed to hold the base resolution when a group has no
/// multiscales listing.
pub const DEFAULT_BASE_PATH: &str = "0";

/// Default AWS region for `s3://` locations.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default timeout for a single HTTP store request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Resolver Policies
// =============================================================================

/// What to do when an OME group carries no `multiscales` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingMultiscalesPolicy {
    /// Assume a single resolution level stored at the given path.
    ///
    /// This is a best-effort guess, not a convention guaranteed by the format.
    DefaultPath(String),

    /// Refuse to guess and fail with `LoaderError::AmbiguousResolution`.
    FailClosed,
}

impl Default for MissingMultiscalesPolicy {
    fn default() -> Self {
        MissingMultiscalesPolicy::DefaultPath(DEFAULT_BASE_PATH.to_string())
    }
}

/// When a multi-level pyramid should be collapsed to its base level.
///
/// A pyramid with a single level is always returned as a single array,
/// whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmallImagePolicy {
    /// Collapse when the base level's x and y chunk sizes differ.
    ///
    /// Large images are written with square x/y chunks, so non-square chunks
    /// mark an image small enough to be served from the base level alone.
    #[default]
    ChunkShape,

    /// Collapse when both the base level's y and x extents are at most this
    /// many pixels.
    MaxExtent(u64),

    /// Never collapse a multi-level pyramid.
    Never,
}

// =============================================================================
// ResolverConfig
// =============================================================================

/// Policies applied while resolving OME groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Fallback used when `multiscales` is absent.
    pub missing_multiscales: MissingMultiscalesPolicy,

    /// Small-image collapsing policy.
    pub small_image: SmallImagePolicy,
}

impl ResolverConfig {
    /// Configuration matching the reference viewer: fall back to path `"0"`
    /// and collapse on non-square base chunks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the small-image collapsing policy.
    pub fn with_small_image_policy(mut self, policy: SmallImagePolicy) -> Self {
        self.small_image = policy;
        self
    }

    /// Use a different dataset path when `multiscales` is absent.
    pub fn with_default_path(mut self, path: impl Into<String>) -> Self {
        self.missing_multiscales = MissingMultiscalesPolicy::DefaultPath(path.into());
        self
    }

    /// Fail instead of guessing a dataset path when `multiscales` is absent.
    pub fn fail_on_missing_multiscales(mut self) -> Self {
        self.missing_multiscales = MissingMultiscalesPolicy::FailClosed;
        self
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let MissingMultiscalesPolicy::DefaultPath(path) = &self.missing_multiscales {
            if path.trim_matches('/').is_empty() {
                return Err("default dataset path must not be empty".to_string());
            }
        }

        if self.small_image == SmallImagePolicy::MaxExtent(0) {
            return Err("max extent for small images must be greater than 0".to_string());
        }

        Ok(())
    }
}

// =============================================================================
// StoreConfig
// =============================================================================

/// Settings used when a location string is upgraded into a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Timeout applied to every HTTP store request.
    pub http_timeout: Duration,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    pub s3_endpoint: Option<String>,

    /// AWS region for `s3://` locations.
    pub s3_region: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            s3_endpoint: None,
            s3_region: DEFAULT_REGION.to_string(),
        }
    }
}

impl StoreConfig {
    /// Set a custom S3 endpoint.
    pub fn with_s3_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.s3_endpoint = Some(endpoint.into());
        self
    }

    /// Set the S3 region.
    pub fn with_s3_region(mut self, region: impl Into<String>) -> Self {
        self.s3_region = region.into();
        self
    }

    /// Set the HTTP request timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.http_timeout.is_zero() {
            return Err("http_timeout must be greater than 0".to_string());
        }

        if self.s3_region.is_empty() {
            return Err("s3_region must not be empty".to_string());
        }

        if let Some(endpoint) = &self.s3_endpoint {
            if url::Url::parse(endpoint).is_err() {
                return Err(format!("s3_endpoint is not a valid URL: {}", endpoint));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
