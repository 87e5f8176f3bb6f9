//! Error types for vcs-core

/// Result type for vcs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vcs-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller passed something the registry cannot accept: a missing
    /// path, a file instead of a directory, an overlapping share, an
    /// unknown share id, or an unparsable server URL.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// The share id counter cannot be advanced any further
    #[error("Share id space exhausted at {last}")]
    IdSpaceExhausted { last: u64 },

    /// Neither the configuration nor the platform names a store location
    #[error("No store location configured and no platform data directory available")]
    NoStoreLocation,

    /// Filesystem or store error from vcs-fs
    #[error(transparent)]
    Fs(#[from] vcs_fs::Error),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether this is a caller-input error rather than a store failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
