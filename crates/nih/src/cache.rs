//! One-shot native extraction cache

use crate::config::NativeConfig;
use crate::destination::{self, DestinationKind};
use crate::error::{InitError, NativeError, NativeResult};
use crate::freshness::{self, Reconciliation, elapsed_ms};
use crate::naming::ResourceNaming;
use nih_bundle::{BundleError, BundleManifest, Platform, ResourceSource};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::time::Instant;

/// Result of the one-time extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Directory holding the natives for this process
    pub dir: PathBuf,
    /// How the directory was obtained
    pub kind: DestinationKind,
    /// What was done to its contents
    pub reconciliation: Reconciliation,
    /// Platform subpath the natives were selected for
    pub subpath: String,
}

/// Extracts bundled natives once and hands out their directory
///
/// The first call to [`destination_dir`](Self::destination_dir) selects the
/// destination directory, verifies it against the bundle and repopulates it
/// when stale. Concurrent first callers block until that finishes. The
/// outcome, success or failure, is kept for the lifetime of the cache and
/// never retried.
///
/// # Example
///
/// ```no_run
/// use nih::{NativeCache, NativeConfig};
/// use nih_bundle::ArchiveSource;
///
/// let cache = NativeCache::new(NativeConfig::from_env(), ArchiveSource::open("natives.zip")?);
/// let libpty = cache.resolve_native_file("libpty.so")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct NativeCache {
    config: NativeConfig,
    source: Box<dyn ResourceSource>,
    state: OnceCell<NativeResult<Extraction>>,
}

impl NativeCache {
    /// Create a cache reading natives from `source`
    pub fn new(config: NativeConfig, source: impl ResourceSource + 'static) -> Self {
        Self {
            config,
            source: Box::new(source),
            state: OnceCell::new(),
        }
    }

    /// The configuration
    pub fn config(&self) -> &NativeConfig {
        &self.config
    }

    /// Whether extraction has been attempted
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// The platform subpath, from configuration or detection
    pub fn subpath(&self) -> NativeResult<String> {
        match &self.config.subpath {
            Some(subpath) => Ok(subpath.clone()),
            None => Platform::current()
                .map(|platform| platform.subpath())
                .map_err(|e| match e {
                    BundleError::UnsupportedPlatform(msg) => NativeError::UnsupportedPlatform(msg),
                    other => NativeError::UnsupportedPlatform(other.to_string()),
                }),
        }
    }

    /// Absolute path of the verified natives directory
    pub fn destination_dir(&self) -> NativeResult<PathBuf> {
        self.extraction().map(|extraction| extraction.dir.clone())
    }

    /// The recorded extraction, running it on first use
    pub fn extraction(&self) -> NativeResult<&Extraction> {
        self.state
            .get_or_init(|| self.initialize())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Path of a native file
    ///
    /// A configured preferred folder that exists is used as is, laid out as
    /// `<folder>/<subpath>/<file_name>`, and nothing is extracted. Otherwise
    /// the file is looked up in the extraction directory.
    pub fn resolve_native_file(&self, file_name: &str) -> NativeResult<PathBuf> {
        if let Some(folder) = self.preferred_dir() {
            let subpath = self.subpath()?;
            return Ok(folder.join(subpath).join(file_name));
        }
        Ok(self.destination_dir()?.join(file_name))
    }

    fn preferred_dir(&self) -> Option<PathBuf> {
        let dir = self.config.preferred_dir.as_deref()?;
        if !dir.is_dir() {
            return None;
        }
        std::path::absolute(dir).ok()
    }

    fn initialize(&self) -> NativeResult<Extraction> {
        let subpath = self.subpath()?;
        let naming = ResourceNaming::new(&subpath, self.config.resource_name_prefix());

        self.extract(&naming)
            .map_err(|e| NativeError::initialization(&subpath, e))
            .inspect_err(|e| tracing::error!(error = %e, "Native extraction failed"))
    }

    fn extract(&self, naming: &ResourceNaming) -> Result<Extraction, InitError> {
        let start = Instant::now();

        let destination = destination::select(&self.config, &naming.dir_name())?;
        tracing::debug!(
            dir = %destination.path.display(),
            kind = ?destination.kind,
            elapsed_ms = elapsed_ms(start),
            "Found native directory"
        );

        let reconciliation = if destination.kind.needs_verification() {
            let manifest = BundleManifest::load(&*self.source)?;
            let expected = naming.expected_resources(&manifest);
            let reconciliation =
                freshness::reconcile(&destination.path, naming, &expected, &*self.source)?;
            tracing::debug!(
                resources = ?expected,
                outcome = ?reconciliation,
                elapsed_ms = elapsed_ms(start),
                "Reconciled native directory"
            );
            reconciliation
        } else {
            Reconciliation::Trusted
        };

        tracing::info!(
            dir = %destination.path.display(),
            subpath = naming.subpath(),
            source = %self.source.describe(),
            elapsed_ms = elapsed_ms(start),
            "Extracted natives"
        );

        Ok(Extraction {
            dir: destination.path,
            kind: destination.kind,
            reconciliation,
            subpath: naming.subpath().to_string(),
        })
    }
}

impl std::fmt::Debug for NativeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeCache")
            .field("config", &self.config)
            .field("source", &self.source.describe())
            .field("state", &self.state.get())
            .finish()
    }
}
