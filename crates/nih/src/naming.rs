//! Mapping between resource names and extracted file names
//!
//! A resource name is `prefix + location`, where a location is
//! `subpath/file_name`. Extracted files keep only the file name, so the two
//! mappings here must stay exact inverses of each other.

use nih_bundle::{BundleManifest, RESOURCE_SEPARATOR};

/// Tag prefixed to cache directory names
pub const DIR_TAG: &str = "nih";

/// Resource naming for one platform subpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNaming {
    prefix: String,
    subpath: String,
}

impl ResourceNaming {
    /// Create naming for a subpath and resource name prefix
    pub fn new(subpath: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            subpath: subpath.into(),
        }
    }

    /// The platform subpath
    pub fn subpath(&self) -> &str {
        &self.subpath
    }

    /// The resource name prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resource name an extracted file corresponds to
    pub fn resource_name(&self, file_name: &str) -> String {
        format!(
            "{}{}{RESOURCE_SEPARATOR}{file_name}",
            self.prefix, self.subpath
        )
    }

    /// File name a resource is extracted to
    pub fn file_name<'a>(&self, resource_name: &'a str) -> &'a str {
        resource_name
            .rsplit_once(RESOURCE_SEPARATOR)
            .map_or(resource_name, |(_, name)| name)
    }

    /// Directory name for a cache directory holding this subpath
    ///
    /// e.g. `nih-linux-x86-64` for `linux/x86-64`.
    pub fn dir_name(&self) -> String {
        format!(
            "{DIR_TAG}-{}",
            self.subpath.replace(RESOURCE_SEPARATOR, "-")
        )
    }

    /// Resource names the manifest bundles for this subpath, in manifest order
    ///
    /// Locations nested below the subpath are still extracted under their
    /// file name, but that name maps back to a different resource, so the
    /// directory never compares as up to date and is refreshed on every run.
    pub fn expected_resources(&self, manifest: &BundleManifest) -> Vec<String> {
        manifest
            .entries_for(&self.subpath)
            .map(|location| {
                let resource_name = format!("{}{location}", self.prefix);
                if !self.is_flat(&resource_name) {
                    tracing::warn!(
                        location,
                        subpath = %self.subpath,
                        "Nested native is extracted flat; the directory will always be refreshed"
                    );
                }
                resource_name
            })
            .collect()
    }

    /// Whether the extracted file name maps back to `resource_name`
    pub fn is_flat(&self, resource_name: &str) -> bool {
        self.resource_name(self.file_name(resource_name)) == resource_name
    }
}
