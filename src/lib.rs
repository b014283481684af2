//! # OME-Zarr Loader
//!
//! Resolves a local or remote Zarr store into a multi-resolution image loader.
//!
//! Two on-store layouts are supported transparently:
//!
//! - **Plain array**: a single chunked array at the store root, with its axis
//!   names listed under `dimensions` in the root `.zattrs`
//! - **OME group**: a `.zgroup` whose `.zattrs` carries `omero` rendering
//!   metadata and a `multiscales` listing of progressively downsampled arrays
//!
//! Either way the result is a [`LoaderHandle`]: one array or an ordered pyramid
//! of arrays, a dimension-order descriptor, and rendering metadata for OME
//! groups. Each level wraps a [`zarrs`] array, so chunks can be decoded
//! through it; rendering is left to the consumer.
//!
//! ## Architecture
//!
//! - [`store`] - the key-value [`Store`] trait and its backends (memory,
//!   filesystem, HTTP, S3)
//! - [`mod@format`] - metadata fetching, format detection and array opening
//! - [`loader`] - pyramid resolution, handle assembly and the entry points
//! - [`config`] - resolver policies and store settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use ome_zarr_loader::{LoaderResolver, ResolverConfig, SmallImagePolicy};
//!
//! #[tokio::main]
//! async fn main() -> ome_zarr_loader::Result<()> {
//!     let resolver = LoaderResolver::new().with_config(
//!         ResolverConfig::new().with_small_image_policy(SmallImagePolicy::MaxExtent(2048)),
//!     );
//!
//!     let handle = resolver.resolve("https://example.com/image.ome.zarr").await?;
//!     for level in handle.levels() {
//!         println!("{}: shape {:?}", level.path(), level.shape());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod store;

// Re-export commonly used types
pub use config::{MissingMultiscalesPolicy, ResolverConfig, SmallImagePolicy, StoreConfig};
pub use error::{LoaderError, Result, StoreError};
pub use format::{
    detect_format, fetch_attributes, fetch_json, Channel, Dataset, Dimension, Multiscale,
    PlainArrayAttributes, RenderingMetadata, RootAttributes, StoreFormat, Window, ZarrArray,
};
pub use loader::{
    assemble, resolve_loader, resolve_pyramid, DimensionDescriptor, LoaderData, LoaderHandle,
    LoaderResolver, StoreSource, OME_DIMENSIONS,
};
pub use store::{
    create_s3_client, open_location, FilesystemStore, HttpStore, MemoryStore, S3Store,
    SharedStore, StorageAdapter, Store,
};
