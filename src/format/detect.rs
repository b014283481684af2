//! Format detection for Zarr stores.
//!
//! Two layouts are recognised at the store root:
//!
//! - **Plain array**: no `.zgroup` key. The root is a single array whose
//!   `.zattrs` lists its axis names.
//! - **OME group**: a `.zgroup` key plus `.zattrs` carrying `omero` rendering
//!   metadata and, usually, a `multiscales` listing of resolution levels.
//!
//! Any other group is rejected as unsupported.

use tracing::debug;

use crate::error::{LoaderError, Result};
use crate::store::Store;

use super::fetch::fetch_attributes;
use super::metadata::RootAttributes;

/// Key marking the store root as a group.
pub const GROUP_KEY: &str = ".zgroup";

/// Key holding a node's user attributes.
pub const ATTRS_KEY: &str = ".zattrs";

/// Key holding an array's metadata.
pub const ARRAY_KEY: &str = ".zarray";

// =============================================================================
// StoreFormat
// =============================================================================

/// Detected store layout.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreFormat {
    /// The root is a single array with explicit dimension metadata.
    PlainArray,

    /// The root is an OME multiscale image group.
    OmeGroup(RootAttributes),
}

impl StoreFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            StoreFormat::PlainArray => "Plain Zarr array",
            StoreFormat::OmeGroup(_) => "OME-Zarr multiscale group",
        }
    }
}

// =============================================================================
// Format Detection
// =============================================================================

/// Detect the layout of a store.
///
/// # Returns
/// * `Ok(StoreFormat::PlainArray)` - no group marker at the root
/// * `Ok(StoreFormat::OmeGroup(attrs))` - group with `omero` metadata
/// * `Err(LoaderError::EmptyPyramid)` - group whose multiscales listing is empty
/// * `Err(LoaderError::UnsupportedGroupFormat)` - group without `omero`
///
/// # Detection Logic
///
/// 1. Check for `.zgroup`; if absent the store is a plain array
/// 2. Fetch the root `.zattrs`
/// 3. A present but empty multiscales listing can never be served
/// 4. Require an `omero` key (any value, including `null`)
pub async fn detect_format(store: &dyn Store) -> Result<StoreFormat> {
    if !store.contains_item(GROUP_KEY).await? {
        debug!(store = store.identifier(), "no group marker, treating root as array");
        return Ok(StoreFormat::PlainArray);
    }

    let attrs: RootAttributes = fetch_attributes(store, ATTRS_KEY).await?;

    if attrs.has_empty_multiscales() {
        return Err(LoaderError::EmptyPyramid);
    }

    if attrs.omero.is_none() {
        return Err(LoaderError::UnsupportedGroupFormat {
            reason: "not a recognized multiscale image group (missing 'omero')".to_string(),
        });
    }

    debug!(store = store.identifier(), "detected OME multiscale group");
    Ok(StoreFormat::OmeGroup(attrs))
}

// =============================================================================
// Tests
// =============================================================================
