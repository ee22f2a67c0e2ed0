//! Error types for bundle operations.

use thiserror::Error;

/// Errors that can occur during bundle operations.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Manifest content cannot be used.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// No platform subpath is defined for the running OS and architecture.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),

    /// The bundle manifest resource is absent from every source.
    #[error("No {0} resource found")]
    ManifestNotFound(String),

    /// A bundled resource cannot be resolved by any source.
    #[error("Unable to load {0}")]
    ResourceNotFound(String),
}
