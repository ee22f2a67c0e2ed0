//! Bundle creation utilities.
//!
//! The [`BundleBuilder`] provides a fluent API for packing native resources
//! into a ZIP archive together with the manifest that lists them.

use crate::{BundleError, BundleManifest, BundleResult, MANIFEST_RESOURCE, RESOURCE_SEPARATOR};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for native resource bundles.
///
/// # Example
///
/// ```no_run
/// use nih_bundle::BundleBuilder;
///
/// BundleBuilder::new()
///     .add_file("linux/x86-64/libpty.so", "build/linux-x86-64/libpty.so")?
///     .add_file("darwin/libpty.dylib", "build/darwin/libpty.dylib")?
///     .write("natives.zip")?;
/// # Ok::<(), nih_bundle::BundleError>(())
/// ```
#[derive(Default)]
pub struct BundleBuilder {
    manifest: BundleManifest,
    files: Vec<BundleFile>,
}

/// A file to include in the bundle.
struct BundleFile {
    /// Resource location within the archive.
    location: String,
    /// File contents.
    contents: Vec<u8>,
}

impl BundleBuilder {
    /// Create an empty bundle builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file from disk at a resource location.
    pub fn add_file<P: AsRef<Path>>(self, location: &str, source_path: P) -> BundleResult<Self> {
        let source_path = source_path.as_ref();

        let contents = fs::read(source_path).map_err(|e| {
            BundleError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", source_path.display(), e),
            ))
        })?;

        self.add_location(location, contents)
    }

    /// Add raw bytes at a resource location.
    ///
    /// Adding a location twice replaces the earlier contents. Invalid
    /// locations are reported when the bundle is written.
    #[must_use]
    pub fn add_bytes(mut self, location: &str, contents: Vec<u8>) -> Self {
        if !self.manifest.insert(location) {
            if let Some(existing) = self.files.iter_mut().find(|f| f.location == location) {
                tracing::debug!(location, "Replacing bundled resource");
                existing.contents = contents;
                return self;
            }
        }
        self.files.push(BundleFile {
            location: location.to_string(),
            contents,
        });
        self
    }

    /// Add every file below `root`, located by its path relative to `root`.
    pub fn add_tree<P: AsRef<Path>>(mut self, root: P) -> BundleResult<Self> {
        let root = root.as_ref();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut children = fs::read_dir(&dir)?.collect::<Result<Vec<_>, _>>()?;
            children.sort_by_key(fs::DirEntry::file_name);

            for child in children {
                let path = child.path();
                if child.file_type()?.is_dir() {
                    pending.push(path);
                    continue;
                }
                let relative = path.strip_prefix(root).map_err(|_| {
                    BundleError::InvalidManifest(format!("{} is outside the tree", path.display()))
                })?;
                let location = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                self = self.add_file(&location, &path)?;
            }
        }

        Ok(self)
    }

    fn add_location(self, location: &str, contents: Vec<u8>) -> BundleResult<Self> {
        validate_location(location)?;
        Ok(self.add_bytes(location, contents))
    }

    /// Write the bundle to a file.
    pub fn write<P: AsRef<Path>>(self, output_path: P) -> BundleResult<()> {
        let output_path = output_path.as_ref();

        for bundle_file in &self.files {
            validate_location(&bundle_file.location)?;
        }

        let file = File::create(output_path)?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(MANIFEST_RESOURCE, options)?;
        zip.write_all(self.manifest.to_text().as_bytes())?;

        for bundle_file in &self.files {
            zip.start_file(&bundle_file.location, options)?;
            zip.write_all(&bundle_file.contents)?;
        }

        zip.finish()?;

        tracing::debug!(
            path = %output_path.display(),
            resources = self.files.len(),
            "Wrote native bundle"
        );
        Ok(())
    }

    /// Get the manifest built so far.
    #[must_use]
    pub fn manifest(&self) -> &BundleManifest {
        &self.manifest
    }
}

/// Check that a location is a relative `/`-separated path with a file name.
fn validate_location(location: &str) -> BundleResult<()> {
    let invalid = |reason: &str| -> BundleResult<()> {
        Err(BundleError::InvalidManifest(format!(
            "Invalid resource location {location:?}: {reason}"
        )))
    };

    if location.is_empty() {
        return invalid("empty");
    }
    if location == MANIFEST_RESOURCE {
        return invalid("reserved for the manifest");
    }
    if location.starts_with(RESOURCE_SEPARATOR) || location.contains('\\') {
        return invalid("must be a relative path using '/'");
    }
    if location
        .split(RESOURCE_SEPARATOR)
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return invalid("contains an empty or relative segment");
    }
    if location.trim() != location || location.starts_with('#') {
        return invalid("cannot be listed in the manifest");
    }
    Ok(())
}
