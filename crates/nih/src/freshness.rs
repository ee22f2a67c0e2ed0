//! Freshness check and reconciliation of an extraction directory
//!
//! A directory is up to date only when it holds exactly the expected
//! resources and each file has the same checksum as its bundled resource.
//! Any difference clears the whole directory and copies every resource
//! again, so natives from different bundle versions never sit side by side.

use crate::error::InitError;
use crate::naming::ResourceNaming;
use nih_bundle::{Checksum, ResourceSource};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome of reconciling a directory with the bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The directory already matched; nothing was touched
    UpToDate,
    /// The directory was cleared and repopulated
    Refreshed { removed: usize, copied: usize },
    /// The directory was reused without verification
    Trusted,
}

/// Files currently in a directory, keyed by the resource they would be
#[derive(Debug, Clone, Default)]
pub struct FreshnessSnapshot {
    files: BTreeMap<String, PathBuf>,
}

impl FreshnessSnapshot {
    /// Snapshot a directory from its direct children
    pub fn new(children: &[PathBuf], naming: &ResourceNaming) -> Self {
        let files = children
            .iter()
            .filter_map(|child| {
                let file_name = child.file_name()?.to_string_lossy();
                Some((naming.resource_name(&file_name), child.clone()))
            })
            .collect();
        Self { files }
    }

    /// Resource names present on disk
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Check the snapshot against the expected resources
    ///
    /// Comparison failures are logged and count as stale.
    pub fn is_up_to_date(&self, expected: &[String], source: &dyn ResourceSource) -> bool {
        let on_disk: HashSet<&str> = self.resource_names().collect();
        let bundled: HashSet<&str> = expected.iter().map(String::as_str).collect();
        if on_disk != bundled {
            return false;
        }

        for (resource_name, path) in &self.files {
            match checksums_match(resource_name, path, source) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(
                        resource = %resource_name,
                        path = %path.display(),
                        "Checksum differs from bundled resource"
                    );
                    return false;
                }
                Err(e) => {
                    tracing::error!(
                        resource = %resource_name,
                        path = %path.display(),
                        error = %e,
                        "Cannot compare md5 checksums"
                    );
                    return false;
                }
            }
        }
        true
    }
}

fn checksums_match(
    resource_name: &str,
    path: &Path,
    source: &dyn ResourceSource,
) -> Result<bool, InitError> {
    let bundled = Checksum::of_reader(source.open(resource_name)?)
        .map_err(InitError::filesystem("read bundled", resource_name))?;
    let extracted = Checksum::of_file(path).map_err(InitError::filesystem("read", path))?;
    Ok(bundled == extracted)
}

/// Bring `dir` in line with the expected resources
///
/// Each phase is logged at debug level with the milliseconds elapsed since
/// reconciliation started.
pub fn reconcile(
    dir: &Path,
    naming: &ResourceNaming,
    expected: &[String],
    source: &dyn ResourceSource,
) -> Result<Reconciliation, InitError> {
    let start = Instant::now();

    let children = list_children(dir)?;
    tracing::debug!(
        dir = %dir.display(),
        files = children.len(),
        elapsed_ms = elapsed_ms(start),
        "Listed native files"
    );

    let snapshot = FreshnessSnapshot::new(&children, naming);
    let up_to_date = snapshot.is_up_to_date(expected, source);
    tracing::debug!(up_to_date, elapsed_ms = elapsed_ms(start), "Checked natives are up to date");
    if up_to_date {
        return Ok(Reconciliation::UpToDate);
    }

    clear(&children)?;
    tracing::debug!(
        removed = children.len(),
        elapsed_ms = elapsed_ms(start),
        "Cleared native directory"
    );

    for resource_name in expected {
        copy(resource_name, dir, naming, source)?;
    }
    tracing::debug!(
        copied = expected.len(),
        elapsed_ms = elapsed_ms(start),
        "Copied natives"
    );

    Ok(Reconciliation::Refreshed {
        removed: children.len(),
        copied: expected.len(),
    })
}

fn list_children(dir: &Path) -> Result<Vec<PathBuf>, InitError> {
    fs::read_dir(dir)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.path()))
                .collect::<io::Result<Vec<_>>>()
        })
        .map_err(InitError::filesystem("list", dir))
}

/// Remove every direct child; nested directories are expected to be empty
fn clear(children: &[PathBuf]) -> Result<(), InitError> {
    for child in children {
        let is_dir = fs::symlink_metadata(child)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let removed = if is_dir {
            fs::remove_dir(child)
        } else {
            fs::remove_file(child)
        };
        removed.map_err(InitError::filesystem("delete", child))?;
    }
    Ok(())
}

fn copy(
    resource_name: &str,
    dir: &Path,
    naming: &ResourceNaming,
    source: &dyn ResourceSource,
) -> Result<(), InitError> {
    let target = dir.join(naming.file_name(resource_name));
    let mut reader = source.open(resource_name)?;
    let mut file = File::create(&target).map_err(InitError::filesystem("create", &target))?;

    io::copy(&mut reader, &mut file).map_err(|e| InitError::Copy {
        resource: resource_name.to_string(),
        path: target.clone(),
        source: e,
    })?;

    // Helpers must be executable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755))
            .map_err(InitError::filesystem("set permissions on", &target))?;
    }

    Ok(())
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "freshness/freshness_tests.rs"]
mod freshness_tests;
