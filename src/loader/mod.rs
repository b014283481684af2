//! Loader resolution.
//!
//! This module turns a store into a [`LoaderHandle`]:
//!
//! - [`resolve`] - entry points ([`resolve_loader`], [`LoaderResolver`])
//! - [`pyramid`] - OME multiscale level resolution and small-image collapsing
//! - [`handle`] - the handle type and the assembler that validates it

pub mod handle;
pub mod pyramid;
pub mod resolve;

pub use handle::{assemble, DimensionDescriptor, LoaderData, LoaderHandle, OME_DIMENSIONS};
pub use pyramid::{resolution_paths, resolve_pyramid};
pub use resolve::{resolve_loader, LoaderResolver, StoreSource};
