//! Opening bundles given on the command line.

use anyhow::{Context, Result};
use nih_bundle::{ArchiveSource, DirectorySource, ResourceSource};
use std::path::Path;

/// Open a bundle archive or a directory of natives.
pub fn open(bundle: &Path) -> Result<Box<dyn ResourceSource>> {
    if bundle.is_dir() {
        return Ok(Box::new(DirectorySource::new(bundle)));
    }

    let archive = ArchiveSource::open(bundle)
        .with_context(|| format!("Failed to open bundle {}", bundle.display()))?;
    Ok(Box::new(archive))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use nih_bundle::BundleBuilder;
    use tempfile::TempDir;

    #[test]
    fn open___directory___uses_directory_source() {
        let temp_dir = TempDir::new().unwrap();

        let source = open(temp_dir.path()).unwrap();

        assert!(source.describe().starts_with("directory"));
    }

    #[test]
    fn open___zip___uses_archive_source() {
        let temp_dir = TempDir::new().unwrap();
        let bundle_path = temp_dir.path().join("natives.zip");
        BundleBuilder::new().write(&bundle_path).unwrap();

        let source = open(&bundle_path).unwrap();

        assert!(source.describe().starts_with("archive"));
    }

    #[test]
    fn open___missing_file___returns_error_with_path() {
        let result = open(Path::new("/nonexistent/natives.zip"));

        let err = result.err().unwrap();
        assert!(err.to_string().contains("/nonexistent/natives.zip"));
    }
}
