//! nih - native resource extraction
//!
//! This crate places the native libraries and helper executables bundled with
//! an application on the real filesystem, where the dynamic loader or process
//! launcher can reach them:
//! - [`NativeCache`] extracts the natives for the running platform once per
//!   process and reuses an up-to-date directory when it finds one
//! - [`NativeConfig`] selects a reusable cache location, a pre-extracted
//!   folder, or platform and naming overrides
//! - [`install_global`] / [`resolve_native_file`] share one cache process-wide
//!
//! # Example
//!
//! ```no_run
//! use nih::{NativeCache, NativeConfig};
//! use nih_bundle::{ArchiveSource, DirectorySource, FallbackSource};
//!
//! let source = FallbackSource::new(
//!     ArchiveSource::open("app-natives.zip")?,
//!     DirectorySource::new("/usr/share/app/natives"),
//! );
//! nih::install_global(NativeCache::new(NativeConfig::from_env(), source))?;
//!
//! let libpty = nih::resolve_native_file("libpty.so")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cache;
mod config;
mod error;
mod naming;

pub mod cleanup;
pub mod destination;
pub mod freshness;

pub use cache::{Extraction, NativeCache};
pub use config::{
    DEFAULT_RESOURCE_NAME_PREFIX, ENV_PREFERRED_DIR, ENV_RESOURCE_NAME_PREFIX,
    ENV_STATIC_PARENT_DIR, ENV_SUBPATH, NativeConfig,
};
pub use destination::{Destination, DestinationKind};
pub use error::{InitError, NativeError, NativeResult};
pub use freshness::{FreshnessSnapshot, Reconciliation};
pub use naming::{DIR_TAG, ResourceNaming};

use once_cell::sync::OnceCell;
use std::path::PathBuf;

static GLOBAL: OnceCell<NativeCache> = OnceCell::new();

/// Install the process-wide cache
///
/// Only the first installation takes effect.
pub fn install_global(cache: NativeCache) -> NativeResult<&'static NativeCache> {
    GLOBAL
        .set(cache)
        .map_err(|_| NativeError::Config("a global native cache is already installed".into()))?;
    global().ok_or_else(|| NativeError::Config("global native cache not installed".into()))
}

/// The process-wide cache, if installed
pub fn global() -> Option<&'static NativeCache> {
    GLOBAL.get()
}

/// Resolve a native file through the process-wide cache
pub fn resolve_native_file(file_name: &str) -> NativeResult<PathBuf> {
    global()
        .ok_or_else(|| NativeError::Config("no global native cache installed".into()))?
        .resolve_native_file(file_name)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{NativeCache, NativeConfig, NativeError, NativeResult};
    pub use nih_bundle::{
        ArchiveSource, DirectorySource, FallbackSource, MemorySource, ResourceSource,
    };
}
