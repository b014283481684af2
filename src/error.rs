use thiserror::Error;

/// Errors raised by a store backend while talking to its transport.
///
/// The resolver never inspects these beyond `NotFound`; everything else is
/// passed through to the caller unchanged.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Key does not exist in the store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Error from an HTTP-backed store
    #[error("HTTP error: {0}")]
    Http(String),

    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Error reading from the local filesystem
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// A key would address an object outside the store root
    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    /// A location string could not be turned into a store
    #[error("Invalid store location: {0}")]
    InvalidLocation(String),
}

/// Errors that can occur while resolving a store into a loader.
#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    /// A required metadata key is missing from the store
    #[error("Metadata not found: {key}")]
    NotFound { key: String },

    /// Metadata bytes are not UTF-8 JSON of the expected shape
    #[error("Malformed metadata at {key}: {message}")]
    MalformedMetadata { key: String, message: String },

    /// The root is a group, but not a multiscale image group we understand
    #[error("Unsupported group format: {reason}")]
    UnsupportedGroupFormat { reason: String },

    /// The multiscale listing is present but names no datasets
    #[error("Multiscale image lists no datasets")]
    EmptyPyramid,

    /// An array's rank disagrees with the declared dimension count
    #[error("Dimension mismatch for array '{path}': rank {rank}, {dimensions} dimensions declared")]
    DimensionMismatch {
        path: String,
        rank: usize,
        dimensions: usize,
    },

    /// No multiscale listing and the default-path fallback is disabled
    #[error("Ambiguous resolution: group has no multiscales listing")]
    AmbiguousResolution,

    /// Resolver or store configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Chunk coordinates fall outside an array's chunk grid
    #[error("Chunk {coords:?} is outside the chunk grid of array '{path}'")]
    ChunkOutOfBounds { path: String, coords: Vec<u64> },

    /// Transport failure from the store, passed through unchanged
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LoaderError {
    pub(crate) fn malformed(key: impl Into<String>, message: impl ToString) -> Self {
        LoaderError::MalformedMetadata {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = LoaderError> = std::result::Result<T, E>;
