//! Bundle manifest listing the packaged native resources.
//!
//! The manifest is a plain text resource with one resource location per line.
//! Blank lines and lines starting with `#` are ignored, surrounding whitespace
//! is trimmed and repeated locations collapse to their first occurrence.

use crate::{BundleError, BundleResult, MANIFEST_RESOURCE, RESOURCE_SEPARATOR, ResourceSource};
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};

/// Ordered set of bundled resource locations.
#[derive(Debug, Clone, Default)]
pub struct BundleManifest {
    entries: Vec<String>,
    seen: HashSet<String>,
}

impl PartialEq for BundleManifest {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for BundleManifest {}

impl BundleManifest {
    /// Create an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the manifest resource from a source.
    pub fn load(source: &dyn ResourceSource) -> BundleResult<Self> {
        let reader = source.open(MANIFEST_RESOURCE).map_err(|e| match e {
            BundleError::ResourceNotFound(_) => {
                BundleError::ManifestNotFound(MANIFEST_RESOURCE.to_string())
            }
            other => other,
        })?;
        Self::from_reader(reader)
    }

    /// Parse a manifest from a byte stream.
    pub fn from_reader<R: Read>(reader: R) -> BundleResult<Self> {
        let mut manifest = Self::new();
        for line in BufReader::new(reader).lines() {
            manifest.push_line(&line?);
        }
        Ok(manifest)
    }

    /// Parse a manifest from text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut manifest = Self::new();
        for line in text.lines() {
            manifest.push_line(line);
        }
        manifest
    }

    fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        self.insert(line);
    }

    /// Add a location, keeping the first occurrence of duplicates.
    ///
    /// Returns `false` if the location was already present.
    pub fn insert(&mut self, location: impl Into<String>) -> bool {
        let location = location.into();
        if !self.seen.insert(location.clone()) {
            return false;
        }
        self.entries.push(location);
        true
    }

    /// Check if a location is listed.
    #[must_use]
    pub fn contains(&self, location: &str) -> bool {
        self.seen.contains(location)
    }

    /// All locations in first-seen order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of distinct locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest lists nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Locations bundled for a platform subpath.
    ///
    /// A location belongs to `subpath` when it starts with `subpath/`.
    pub fn entries_for<'a>(&'a self, subpath: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let prefix = format!("{subpath}{RESOURCE_SEPARATOR}");
        self.entries
            .iter()
            .filter(move |e| e.starts_with(&prefix))
            .map(String::as_str)
    }

    /// Distinct platform subpaths that have at least one entry.
    ///
    /// The subpath of a location is everything before its file name.
    #[must_use]
    pub fn subpaths(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter_map(|e| e.rsplit_once(RESOURCE_SEPARATOR).map(|(dir, _)| dir))
            .filter(|dir| seen.insert(*dir))
            .map(str::to_string)
            .collect()
    }

    /// Render the manifest in its resource text form.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::from("# nih native bundle\n");
        for entry in &self.entries {
            text.push_str(entry);
            text.push('\n');
        }
        text
    }
}
