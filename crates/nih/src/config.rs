//! Native cache configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming a parent directory for a reusable cache directory
pub const ENV_STATIC_PARENT_DIR: &str = "NIH_TMPDIR";

/// Environment variable naming a pre-extracted native folder
pub const ENV_PREFERRED_DIR: &str = "NIH_PREFERRED_NATIVE_FOLDER";

/// Environment variable overriding the platform subpath
pub const ENV_SUBPATH: &str = "NIH_SUBPATH";

/// Environment variable overriding the resource name prefix
pub const ENV_RESOURCE_NAME_PREFIX: &str = "NIH_RESOURCE_PREFIX";

/// Prefix applied to manifest locations when none is configured
pub const DEFAULT_RESOURCE_NAME_PREFIX: &str = "";

/// Configuration for a [`NativeCache`](crate::NativeCache)
///
/// Every option is optional; blank values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeConfig {
    /// Absolute parent directory for a cache directory reused across runs
    ///
    /// Must not be shared by processes running at the same time. An existing
    /// cache directory below it is reused without verification.
    #[serde(default)]
    pub static_parent_dir: Option<PathBuf>,

    /// Folder holding already extracted natives laid out by platform subpath
    ///
    /// When it exists, natives are resolved from it and nothing is extracted.
    #[serde(default)]
    pub preferred_dir: Option<PathBuf>,

    /// Platform subpath to use instead of the detected one
    #[serde(default)]
    pub subpath: Option<String>,

    /// Prefix prepended to manifest locations to form resource names
    #[serde(default)]
    pub resource_name_prefix: Option<String>,
}

impl NativeConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the `NIH_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a variable lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            static_parent_dir: lookup(ENV_STATIC_PARENT_DIR).map(PathBuf::from),
            preferred_dir: lookup(ENV_PREFERRED_DIR).map(PathBuf::from),
            subpath: lookup(ENV_SUBPATH),
            resource_name_prefix: lookup(ENV_RESOURCE_NAME_PREFIX),
        }
        .normalized()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice::<Self>(bytes).map(Self::normalized)
    }

    /// Set the parent directory of the reusable cache directory
    pub fn with_static_parent_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_parent_dir = Some(dir.into());
        self
    }

    /// Set the pre-extracted native folder
    pub fn with_preferred_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preferred_dir = Some(dir.into());
        self
    }

    /// Override the platform subpath
    pub fn with_subpath(mut self, subpath: impl Into<String>) -> Self {
        self.subpath = Some(subpath.into());
        self
    }

    /// Override the resource name prefix
    pub fn with_resource_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resource_name_prefix = Some(prefix.into());
        self
    }

    /// The resource name prefix, or the default when unset
    pub fn resource_name_prefix(&self) -> &str {
        self.resource_name_prefix
            .as_deref()
            .unwrap_or(DEFAULT_RESOURCE_NAME_PREFIX)
    }

    fn normalized(self) -> Self {
        Self {
            static_parent_dir: self.static_parent_dir.filter(|p| !is_blank_path(p)),
            preferred_dir: self.preferred_dir.filter(|p| !is_blank_path(p)),
            subpath: self
                .subpath
                .map(|s| s.trim().trim_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            resource_name_prefix: self.resource_name_prefix,
        }
    }
}

fn is_blank_path(path: &std::path::Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
