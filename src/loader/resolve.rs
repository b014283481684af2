//! Top-level store resolution.
//!
//! ```text
//!   StoreSource ──(location upgrade)──► SharedStore
//!                                            │
//!                                      detect_format
//!                         ┌──────────────────┴───────────────────┐
//!                         ▼                                      ▼
//!                    PlainArray                              OmeGroup
//!        open root array ∥ fetch .zattrs               resolve_pyramid
//!                         └──────────────► assemble ◄────────────┘
//! ```

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{ResolverConfig, StoreConfig};
use crate::error::{LoaderError, Result};
use crate::format::{
    detect_format, fetch_attributes, PlainArrayAttributes, RenderingMetadata, StoreFormat,
    ZarrArray, ATTRS_KEY,
};
use crate::store::{open_location, SharedStore, Store};

use super::handle::{assemble, DimensionDescriptor, LoaderData, LoaderHandle};
use super::pyramid::resolve_pyramid;

// =============================================================================
// StoreSource
// =============================================================================

/// What the caller hands to the resolver: a store, or a location string to
/// be upgraded into one.
#[derive(Clone)]
pub enum StoreSource {
    Store(SharedStore),
    Location(String),
}

impl StoreSource {
    /// Wrap a concrete store.
    pub fn from_store(store: impl Store + 'static) -> Self {
        StoreSource::Store(Arc::new(store))
    }
}

impl From<SharedStore> for StoreSource {
    fn from(store: SharedStore) -> Self {
        StoreSource::Store(store)
    }
}

impl From<&str> for StoreSource {
    fn from(location: &str) -> Self {
        StoreSource::Location(location.to_string())
    }
}

impl From<String> for StoreSource {
    fn from(location: String) -> Self {
        StoreSource::Location(location)
    }
}

impl std::fmt::Debug for StoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreSource::Store(store) => f.debug_tuple("Store").field(&store.identifier()).finish(),
            StoreSource::Location(location) => f.debug_tuple("Location").field(location).finish(),
        }
    }
}

// =============================================================================
// LoaderResolver
// =============================================================================

/// Resolves stores into loader handles.
///
/// Holds configuration only; every call builds its handle from scratch and
/// nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct LoaderResolver {
    config: ResolverConfig,
    store_config: StoreConfig,
}

impl LoaderResolver {
    /// Create a resolver with default policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the resolution policies.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the settings used to upgrade location strings.
    pub fn with_store_config(mut self, store_config: StoreConfig) -> Self {
        self.store_config = store_config;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a store or location into a loader handle.
    ///
    /// Any failure means no loader could be built for the store; nothing is
    /// retried and there is no partial result.
    pub async fn resolve(&self, source: impl Into<StoreSource>) -> Result<LoaderHandle> {
        self.config.validate().map_err(LoaderError::InvalidConfig)?;

        let store = match source.into() {
            StoreSource::Store(store) => store,
            StoreSource::Location(location) => {
                self.store_config
                    .validate()
                    .map_err(LoaderError::InvalidConfig)?;
                open_location(&location, &self.store_config).await?
            }
        };

        self.resolve_store(store).await
    }

    #[instrument(skip_all, fields(store = store.identifier()))]
    async fn resolve_store(&self, store: SharedStore) -> Result<LoaderHandle> {
        let format = detect_format(store.as_ref()).await?;
        let format_name = format.name();

        let handle = match format {
            StoreFormat::PlainArray => resolve_plain_array(store).await?,
            StoreFormat::OmeGroup(mut attrs) => {
                let (data, dimensions) = resolve_pyramid(store, &attrs, &self.config).await?;
                let metadata = attrs.omero.take().map(RenderingMetadata::new);
                assemble(data, dimensions, metadata)?
            }
        };

        info!(
            format = format_name,
            levels = handle.level_count(),
            dimensions = ?handle.dimensions().fields(),
            "resolved loader"
        );

        Ok(handle)
    }
}

/// Open the root array and read its dimension names concurrently.
async fn resolve_plain_array(store: SharedStore) -> Result<LoaderHandle> {
    let (array, attrs) = tokio::try_join!(
        ZarrArray::open(store.clone(), ""),
        fetch_attributes::<PlainArrayAttributes>(store.as_ref(), ATTRS_KEY),
    )?;

    assemble(
        LoaderData::Single(array),
        DimensionDescriptor::new(attrs.dimensions),
        None,
    )
}

/// Resolve a store or location with default settings.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> ome_zarr_loader::Result<()> {
/// let handle = ome_zarr_loader::resolve_loader("https://example.com/image.ome.zarr").await?;
/// println!("{} level(s), axes {:?}", handle.level_count(), handle.dimensions().fields());
/// # Ok(())
/// # }
/// ```
pub async fn resolve_loader(source: impl Into<StoreSource>) -> Result<LoaderHandle> {
    LoaderResolver::new().resolve(source).await
}

// =============================================================================
// Tests
// =============================================================================
