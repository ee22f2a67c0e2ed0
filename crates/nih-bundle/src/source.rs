//! Sources of packaged resource bytes.
//!
//! A [`ResourceSource`] opens a bundled resource by name. Sources are chained
//! with [`FallbackSource`] when resources may live in more than one place.

use crate::{BundleError, BundleResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// Lookup of packaged resources by name.
pub trait ResourceSource: Send + Sync {
    /// Open a resource for reading.
    ///
    /// Fails with [`BundleError::ResourceNotFound`] if the source has no
    /// resource with this name.
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + '_>>;

    /// Check if a resource can be opened.
    fn contains(&self, name: &str) -> bool {
        self.open(name).is_ok()
    }

    /// Short human-readable description used in logs.
    fn describe(&self) -> String;
}

impl<S: ResourceSource + ?Sized> ResourceSource for Box<S> {
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + '_>> {
        (**self).open(name)
    }

    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Resources stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        // Resource names never leave the root
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        let path = self.root.join(relative);
        path.is_file().then_some(path)
    }
}

impl ResourceSource for DirectorySource {
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + '_>> {
        let path = self
            .resolve(name)
            .ok_or_else(|| BundleError::ResourceNotFound(name.to_string()))?;
        Ok(Box::new(File::open(path)?))
    }

    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Resources packed in a ZIP archive.
///
/// Entries are read fully into memory when opened.
pub struct ArchiveSource<R = File> {
    archive: Mutex<ZipArchive<R>>,
    label: String,
}

impl ArchiveSource<File> {
    /// Open a ZIP archive on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(file, path.display().to_string())
    }
}

impl<R: Read + Seek> ArchiveSource<R> {
    /// Read an archive from any seekable reader.
    pub fn from_reader(reader: R, label: impl Into<String>) -> BundleResult<Self> {
        Ok(Self {
            archive: Mutex::new(ZipArchive::new(reader)?),
            label: label.into(),
        })
    }

    /// List every entry name in the archive.
    #[must_use]
    pub fn list_files(&self) -> Vec<String> {
        self.archive
            .lock()
            .file_names()
            .map(str::to_string)
            .collect()
    }
}

impl<R: Read + Seek + Send> ResourceSource for ArchiveSource<R> {
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + '_>> {
        let mut archive = self.archive.lock();
        let mut entry = archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => BundleError::ResourceNotFound(name.to_string()),
            other => BundleError::Zip(other),
        })?;

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        Ok(Box::new(Cursor::new(contents)))
    }

    fn contains(&self, name: &str) -> bool {
        self.archive.lock().index_for_name(name).is_some()
    }

    fn describe(&self) -> String {
        format!("archive {}", self.label)
    }
}

/// Resources held in memory, e.g. embedded with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, returning the source.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.resources.insert(name.into(), contents.into());
    }
}

impl ResourceSource for MemorySource {
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + '_>> {
        self.resources
            .get(name)
            .map(|bytes| Box::new(bytes.as_slice()) as Box<dyn Read + '_>)
            .ok_or_else(|| BundleError::ResourceNotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    fn describe(&self) -> String {
        format!("memory ({} resources)", self.resources.len())
    }
}

/// Two-tier lookup: the primary source first, then the secondary.
pub struct FallbackSource {
    primary: Box<dyn ResourceSource>,
    secondary: Box<dyn ResourceSource>,
}

impl FallbackSource {
    /// Chain two sources.
    pub fn new(
        primary: impl ResourceSource + 'static,
        secondary: impl ResourceSource + 'static,
    ) -> Self {
        Self {
            primary: Box::new(primary),
            secondary: Box::new(secondary),
        }
    }
}

impl ResourceSource for FallbackSource {
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + '_>> {
        match self.primary.open(name) {
            Ok(reader) => Ok(reader),
            Err(e) => {
                tracing::trace!(
                    resource = name,
                    primary = %self.primary.describe(),
                    error = %e,
                    "Falling back to secondary resource source"
                );
                self.secondary.open(name).map_err(|_| {
                    BundleError::ResourceNotFound(name.to_string())
                })
            }
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.primary.contains(name) || self.secondary.contains(name)
    }

    fn describe(&self) -> String {
        format!(
            "{} then {}",
            self.primary.describe(),
            self.secondary.describe()
        )
    }
}
