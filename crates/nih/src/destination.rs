//! Selection of the directory natives are extracted to

use crate::cleanup;
use crate::config::NativeConfig;
use crate::error::InitError;
use std::fs;
use std::path::{Path, PathBuf};

/// How a destination directory was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// An existing directory below the static parent, reused as is
    Reused,
    /// A directory newly created below the static parent
    Static,
    /// A per-process temporary directory removed at exit
    Temporary,
}

impl DestinationKind {
    /// Whether the directory contents must be checked against the bundle
    pub fn needs_verification(&self) -> bool {
        !matches!(self, Self::Reused)
    }
}

/// A directory natives are extracted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    pub kind: DestinationKind,
}

/// Pick the destination directory for a cache directory named `dir_name`
///
/// A configured absolute static parent yields `<parent>/<dir_name>`. When
/// that directory already exists it is trusted without verification; callers
/// that need fresh natives must not share a static parent across
/// incompatible bundle versions. Otherwise a new temporary directory is
/// created and registered for removal at exit.
pub fn select(config: &NativeConfig, dir_name: &str) -> Result<Destination, InitError> {
    if let Some(parent) = config.static_parent_dir.as_deref() {
        if let Some(destination) = static_destination(parent, dir_name)? {
            return Ok(destination);
        }
    }

    temporary_destination(dir_name)
}

fn static_destination(parent: &Path, dir_name: &str) -> Result<Option<Destination>, InitError> {
    if !parent.is_absolute() {
        tracing::warn!(
            parent = %parent.display(),
            "Ignoring static parent directory that is not absolute"
        );
        return Ok(None);
    }

    let path = parent.join(dir_name);
    if path.is_dir() {
        return Ok(Some(Destination {
            path,
            kind: DestinationKind::Reused,
        }));
    }

    if !parent.is_dir() {
        tracing::debug!(
            parent = %parent.display(),
            "Static parent directory does not exist, using a temporary directory"
        );
        return Ok(None);
    }

    // A stale non-directory entry may occupy the name
    if fs::symlink_metadata(&path).is_ok() {
        fs::remove_file(&path).map_err(InitError::filesystem("delete", &path))?;
    }
    fs::create_dir(&path).map_err(InitError::filesystem("create", &path))?;

    Ok(Some(Destination {
        path,
        kind: DestinationKind::Static,
    }))
}

fn temporary_destination(dir_name: &str) -> Result<Destination, InitError> {
    let temp_root = std::env::temp_dir();
    let path = tempfile::Builder::new()
        .prefix(&format!("{dir_name}-"))
        .tempdir_in(&temp_root)
        .map_err(InitError::filesystem("create temporary directory in", &temp_root))?
        .keep();

    cleanup::delete_on_exit(&path);

    Ok(Destination {
        path,
        kind: DestinationKind::Temporary,
    })
}
