//! Zarr metadata parsing, format detection and array opening.
//!
//! Array metadata, chunk grids and chunk keys are handled by `zarrs`; this
//! module models the group and root attributes the resolver decides on.
//!
//! # Format Detection
//!
//! Use [`detect::detect_format`] to decide how a store should be resolved:
//!
//! - **Plain array**: no `.zgroup`, dimension names in the root `.zattrs`
//! - **OME group**: `.zgroup` plus `omero` rendering metadata in `.zattrs`

pub mod array;
pub mod detect;
pub mod fetch;
pub mod metadata;

pub use array::ZarrArray;
pub use detect::{detect_format, StoreFormat, ARRAY_KEY, ATTRS_KEY, GROUP_KEY};
pub use fetch::{fetch_attributes, fetch_json};
pub use metadata::{
    Channel, Dataset, Dimension, Multiscale, PlainArrayAttributes, RenderingMetadata,
    RootAttributes, Window,
};
