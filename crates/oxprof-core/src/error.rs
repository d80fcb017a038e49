//! Error types for oxprof

use thiserror::Error;

use crate::icc::{IccError, Signature};

/// Result type for oxprof operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in oxprof operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// File or standard role could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header magic or size sanity check failed
    #[error("Corrupted profile: {0}")]
    Corrupted(String),

    /// No registered codec handles the requested tag type
    #[error("No codec for tag type '{tag_type}' (version {version})")]
    NoCodec { tag_type: Signature, version: u8 },

    /// A handle was used as a kind it is not
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Growing a container failed
    #[error("Allocation failed")]
    AllocationFailed,

    /// Low level ICC layout error
    #[error(transparent)]
    Icc(#[from] IccError),

    /// Settings file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A profile with the same description or file name is already installed
    #[error("Profile already installed: {0}")]
    AlreadyInstalled(String),

    /// A scan was aborted by its cancellation token or deadline
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
