//! Extraction and resolution commands.

use crate::BundleArgs;
use anyhow::{Context, Result};
use nih::{NativeCache, NativeConfig};
use std::path::PathBuf;

/// Build the cache described by the arguments, on top of `NIH_*` settings.
fn cache(args: &BundleArgs) -> Result<NativeCache> {
    let mut config = NativeConfig::from_env();
    if let Some(subpath) = &args.subpath {
        config = config.with_subpath(subpath);
    }
    if let Some(parent) = &args.static_parent {
        let parent = std::path::absolute(parent)
            .with_context(|| format!("Invalid static parent {}", parent.display()))?;
        config = config.with_static_parent_dir(parent);
    }
    if let Some(prefix) = &args.prefix {
        config = config.with_resource_name_prefix(prefix);
    }

    let source = crate::source::open(&args.bundle)?;
    Ok(NativeCache::new(config, source))
}

/// Run the extract command, returning the natives directory.
pub fn run(args: &BundleArgs) -> Result<PathBuf> {
    let cache = cache(args)?;
    let extraction = cache.extraction().context("Extraction failed")?;

    tracing::info!(
        dir = %extraction.dir.display(),
        outcome = ?extraction.reconciliation,
        "Natives ready"
    );
    Ok(extraction.dir.clone())
}

/// Run the resolve command, returning the native file path.
pub fn resolve(args: &BundleArgs, file_name: &str) -> Result<PathBuf> {
    let cache = cache(args)?;
    let path = cache
        .resolve_native_file(file_name)
        .with_context(|| format!("Failed to resolve {file_name}"))?;

    if !path.exists() {
        tracing::warn!(path = %path.display(), "Resolved native file does not exist");
    }
    Ok(path)
}
