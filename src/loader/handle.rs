//! The loader handle returned to callers, and the assembler that builds it.

use crate::error::{LoaderError, Result};
use crate::format::{Dimension, RenderingMetadata, ZarrArray};

/// Axis order of every OME group served by this crate.
pub const OME_DIMENSIONS: [&str; 5] = ["t", "c", "z", "y", "x"];

// =============================================================================
// DimensionDescriptor
// =============================================================================

/// Ordered axis labels, one per array axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DimensionDescriptor(Vec<Dimension>);

impl DimensionDescriptor {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self(dimensions)
    }

    /// Build a descriptor from bare field names.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Dimension::new).collect())
    }

    /// The fixed `t, c, z, y, x` order of OME groups.
    pub fn ome() -> Self {
        Self::from_fields(OME_DIMENSIONS)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.0
    }

    /// Field names in axis order.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|d| d.field.as_str()).collect()
    }

    /// Axis index of `field`, if present.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.0.iter().position(|d| d.field == field)
    }
}

// =============================================================================
// LoaderData
// =============================================================================

/// The array data behind a loader: one array, or a pyramid of them.
#[derive(Debug, Clone)]
pub enum LoaderData {
    /// A single resolution level.
    Single(ZarrArray),

    /// Resolution levels ordered from full resolution down.
    Pyramid(Vec<ZarrArray>),
}

impl LoaderData {
    /// All levels, full resolution first. A single array is one level.
    pub fn levels(&self) -> &[ZarrArray] {
        match self {
            LoaderData::Single(array) => std::slice::from_ref(array),
            LoaderData::Pyramid(levels) => levels,
        }
    }

    pub fn is_pyramid(&self) -> bool {
        matches!(self, LoaderData::Pyramid(_))
    }
}

// =============================================================================
// LoaderHandle
// =============================================================================

/// A resolved image loader: array data, axis order and rendering metadata.
///
/// Built fresh per resolution; the caller owns it outright.
#[derive(Debug, Clone)]
pub struct LoaderHandle {
    data: LoaderData,
    dimensions: DimensionDescriptor,
    metadata: Option<RenderingMetadata>,
}

impl LoaderHandle {
    pub fn data(&self) -> &LoaderData {
        &self.data
    }

    pub fn dimensions(&self) -> &DimensionDescriptor {
        &self.dimensions
    }

    /// Rendering metadata; present only for OME groups.
    pub fn metadata(&self) -> Option<&RenderingMetadata> {
        self.metadata.as_ref()
    }

    pub fn is_pyramid(&self) -> bool {
        self.data.is_pyramid()
    }

    /// All levels, full resolution first.
    pub fn levels(&self) -> &[ZarrArray] {
        self.data.levels()
    }

    /// Number of resolution levels.
    pub fn level_count(&self) -> usize {
        self.levels().len()
    }

    /// The full-resolution array.
    pub fn base(&self) -> &ZarrArray {
        // assemble() never builds a handle without levels
        &self.levels()[0]
    }

    pub fn into_parts(self) -> (LoaderData, DimensionDescriptor, Option<RenderingMetadata>) {
        (self.data, self.dimensions, self.metadata)
    }
}

/// Package resolved array data into a [`LoaderHandle`].
///
/// # Errors
/// * `LoaderError::EmptyPyramid` - a pyramid with no levels
/// * `LoaderError::DimensionMismatch` - an array whose rank differs from the
///   number of declared dimensions
pub fn assemble(
    data: LoaderData,
    dimensions: DimensionDescriptor,
    metadata: Option<RenderingMetadata>,
) -> Result<LoaderHandle> {
    if data.levels().is_empty() {
        return Err(LoaderError::EmptyPyramid);
    }

    check_rank(data.levels(), &dimensions)?;

    Ok(LoaderHandle {
        data,
        dimensions,
        metadata,
    })
}

/// Check every level's rank against the descriptor.
pub(crate) fn check_rank(levels: &[ZarrArray], dimensions: &DimensionDescriptor) -> Result<()> {
    match levels.iter().find(|a| a.rank() != dimensions.len()) {
        Some(array) => Err(LoaderError::DimensionMismatch {
            path: array.path().to_string(),
            rank: array.rank(),
            dimensions: dimensions.len(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
