//! Bundle creation command.
//!
//! Packs a directory tree laid out by platform subpath into a bundle archive.

use anyhow::{Context, Result};
use nih_bundle::BundleBuilder;
use std::path::Path;

/// Run the pack command.
pub fn run(tree: &Path, output: &Path) -> Result<()> {
    println!("Creating bundle from {}", tree.display());

    let builder = BundleBuilder::new()
        .add_tree(tree)
        .with_context(|| format!("Failed to read {}", tree.display()))?;

    for subpath in builder.manifest().subpaths() {
        let count = builder.manifest().entries_for(&subpath).count();
        println!("  {subpath}: {count} file(s)");
    }

    if builder.manifest().is_empty() {
        anyhow::bail!("No files found below {}", tree.display());
    }

    builder
        .write(output)
        .with_context(|| format!("Failed to write bundle {}", output.display()))?;

    println!("Bundle written to {}", output.display());
    Ok(())
}
