//! Manifest listing command.

use anyhow::{Context, Result};
use nih_bundle::BundleManifest;
use std::path::Path;

/// Run the manifest command.
pub fn run(bundle: &Path, subpath: Option<&str>) -> Result<()> {
    for line in list(bundle, subpath)? {
        println!("{line}");
    }
    Ok(())
}

/// Manifest entries, optionally limited to one subpath.
fn list(bundle: &Path, subpath: Option<&str>) -> Result<Vec<String>> {
    let source = crate::source::open(bundle)?;
    let manifest = BundleManifest::load(&*source)
        .with_context(|| format!("Failed to read manifest of {}", bundle.display()))?;

    let entries: Vec<String> = match subpath {
        Some(subpath) => manifest.entries_for(subpath).map(str::to_string).collect(),
        None => manifest.entries().to_vec(),
    };

    for entry in &entries {
        if !source.contains(entry) {
            tracing::warn!(entry = %entry, "Manifest entry missing from bundle");
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use nih_bundle::BundleBuilder;
    use tempfile::TempDir;

    fn bundle(temp_dir: &TempDir) -> std::path::PathBuf {
        let path = temp_dir.path().join("natives.zip");
        BundleBuilder::new()
            .add_bytes("linux/x86-64/libfoo.so", b"so".to_vec())
            .add_bytes("linux/x86-64/helper", b"bin".to_vec())
            .add_bytes("darwin/libfoo.dylib", b"dylib".to_vec())
            .write(&path)
            .unwrap();
        path
    }

    #[test]
    fn list___no_subpath___returns_every_entry() {
        let temp_dir = TempDir::new().unwrap();

        let entries = list(&bundle(&temp_dir), None).unwrap();

        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn list___subpath___filters_entries() {
        let temp_dir = TempDir::new().unwrap();

        let entries = list(&bundle(&temp_dir), Some("darwin")).unwrap();

        assert_eq!(entries, ["darwin/libfoo.dylib"]);
    }

    #[test]
    fn list___directory_without_manifest___returns_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = list(temp_dir.path(), None);

        assert!(result.is_err());
    }
}
