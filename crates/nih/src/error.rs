//! Error types for native extraction

use nih_bundle::BundleError;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for native extraction operations
pub type NativeResult<T> = Result<T, NativeError>;

/// Error returned to callers of the native cache
///
/// Cloneable so the single recorded initialization outcome can be handed to
/// every caller for the rest of the process.
#[derive(Error, Debug, Clone)]
pub enum NativeError {
    /// No platform subpath is defined for the running OS and architecture
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Extraction failed; the cache will not retry
    #[error("cannot extract native resources for {subpath}: {source}")]
    Initialization {
        subpath: String,
        #[source]
        source: Arc<InitError>,
    },
}

impl NativeError {
    pub(crate) fn initialization(subpath: &str, source: InitError) -> Self {
        Self::Initialization {
            subpath: subpath.to_string(),
            source: Arc::new(source),
        }
    }

    /// The platform subpath the failure happened for, when known
    pub fn subpath(&self) -> Option<&str> {
        match self {
            Self::Initialization { subpath, .. } => Some(subpath),
            _ => None,
        }
    }
}

/// Cause of a failed extraction
#[derive(Error, Debug)]
pub enum InitError {
    /// Manifest or resource lookup failed
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// Destination directory could not be created, listed, cleared or written
    #[error("cannot {action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bundled resource could not be read while copying
    #[error("cannot copy {resource} to {}: {source}", .path.display())]
    Copy {
        resource: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InitError {
    pub(crate) fn filesystem(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Filesystem {
            action,
            path,
            source,
        }
    }
}
