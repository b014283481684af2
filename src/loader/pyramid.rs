//! Multiscale pyramid resolution for OME groups.
//!
//! Resolution levels are listed in the first `multiscales` entry of the root
//! attributes, highest resolution first. Every level is opened concurrently
//! and the result is normalized to either a single array or a full pyramid.
//!
//! # Small-image collapsing
//!
//! Fetching a multi-level pyramid only pays off for large images. The
//! [`SmallImagePolicy`] decides when the pyramid is dropped in favour of its
//! base level:
//!
//! - `ChunkShape` (default): base-level x and y chunk sizes differ
//! - `MaxExtent(n)`: base-level x and y extents are both at most `n`
//! - `Never`: keep every level
//!
//! A pyramid of one level is always returned as a single array.

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::config::{MissingMultiscalesPolicy, ResolverConfig, SmallImagePolicy};
use crate::error::{LoaderError, Result};
use crate::format::{RootAttributes, ZarrArray};
use crate::store::SharedStore;

use super::handle::{check_rank, DimensionDescriptor, LoaderData};

/// Index of the y axis in the OME axis order.
const Y_AXIS: usize = 3;

/// Index of the x axis in the OME axis order.
const X_AXIS: usize = 4;

/// Resolve the arrays of an OME group.
///
/// # Errors
/// * `LoaderError::EmptyPyramid` - `multiscales` lists no datasets
/// * `LoaderError::AmbiguousResolution` - no `multiscales` and the
///   fallback path is disabled
/// * `LoaderError::DimensionMismatch` - a level is not 5-dimensional
/// * any error from opening a level; the first failure wins
pub async fn resolve_pyramid(
    store: SharedStore,
    attrs: &RootAttributes,
    config: &ResolverConfig,
) -> Result<(LoaderData, DimensionDescriptor)> {
    let paths = resolution_paths(attrs, config)?;
    let levels = open_levels(store, &paths).await?;

    let dimensions = DimensionDescriptor::ome();
    check_rank(&levels, &dimensions)?;

    let collapse = should_collapse(&levels, config.small_image);
    debug!(
        levels = levels.len(),
        collapse,
        policy = ?config.small_image,
        "resolved multiscale levels"
    );

    let data = if collapse {
        let base = levels.into_iter().next().ok_or(LoaderError::EmptyPyramid)?;
        LoaderData::Single(base)
    } else {
        LoaderData::Pyramid(levels)
    };

    Ok((data, dimensions))
}

/// Dataset paths to open, highest resolution first.
pub fn resolution_paths(attrs: &RootAttributes, config: &ResolverConfig) -> Result<Vec<String>> {
    match attrs.dataset_paths() {
        Some(paths) if paths.is_empty() => Err(LoaderError::EmptyPyramid),
        Some(paths) => Ok(paths),
        None => match &config.missing_multiscales {
            MissingMultiscalesPolicy::DefaultPath(path) => {
                warn!(path = %path, "group has no multiscales listing, assuming a single level");
                Ok(vec![path.clone()])
            }
            MissingMultiscalesPolicy::FailClosed => Err(LoaderError::AmbiguousResolution),
        },
    }
}

/// Open every level concurrently, keeping the declared order.
async fn open_levels(store: SharedStore, paths: &[String]) -> Result<Vec<ZarrArray>> {
    let opens = paths
        .iter()
        .map(|path| ZarrArray::open(store.clone(), path));
    try_join_all(opens).await
}

/// Whether the pyramid should collapse to its base level.
///
/// Levels must already be known to be 5-dimensional.
fn should_collapse(levels: &[ZarrArray], policy: SmallImagePolicy) -> bool {
    let Some(base) = levels.first() else {
        return true;
    };
    if levels.len() == 1 {
        return true;
    }

    match policy {
        SmallImagePolicy::ChunkShape => base.chunks()[X_AXIS] != base.chunks()[Y_AXIS],
        SmallImagePolicy::MaxExtent(max) => {
            base.shape()[Y_AXIS] <= max && base.shape()[X_AXIS] <= max
        }
        SmallImagePolicy::Never => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
