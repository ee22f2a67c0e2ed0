//! Platform detection and subpath identification.

use crate::{BundleError, BundleResult};
use std::fmt;

/// Operating system families that have bundled natives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsKind {
    /// Microsoft Windows.
    Windows,
    /// macOS.
    Mac,
    /// Linux.
    Linux,
    /// FreeBSD.
    FreeBsd,
}

impl OsKind {
    /// Map a `std::env::consts::OS` value to an OS family.
    #[must_use]
    pub fn from_os_name(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::Mac),
            "linux" => Some(Self::Linux),
            "freebsd" => Some(Self::FreeBsd),
            _ => None,
        }
    }

    /// Directory segment used for this OS in bundle locations.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::Mac => "darwin",
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
        }
    }
}

/// The OS and CPU architecture natives are selected for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    os: OsKind,
    arch: String,
}

impl Platform {
    /// Create a platform from an OS family and bundle architecture name.
    pub fn new(os: OsKind, arch: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
        }
    }

    /// Detect the platform of the running process.
    pub fn current() -> BundleResult<Self> {
        Self::detect(
            std::env::consts::OS,
            std::env::consts::ARCH,
            cfg!(target_endian = "little"),
        )
    }

    /// Classify an OS name and Rust architecture name.
    ///
    /// Architecture names are translated to the names used for bundle
    /// directories, e.g. `x86_64` becomes `x86-64`.
    pub fn detect(os: &str, arch: &str, little_endian: bool) -> BundleResult<Self> {
        let unsupported = || {
            BundleError::UnsupportedPlatform(format!(
                "No native support for OS name: {os}, arch: {arch}"
            ))
        };

        let os_kind = OsKind::from_os_name(os).ok_or_else(unsupported)?;
        let bundle_arch = bundle_arch_name(arch, little_endian).ok_or_else(unsupported)?;

        Ok(Self::new(os_kind, bundle_arch))
    }

    /// The OS family.
    #[must_use]
    pub fn os(&self) -> OsKind {
        self.os
    }

    /// The bundle architecture name (e.g. `x86-64`, `aarch64`).
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Get the subpath key natives for this platform are bundled under.
    ///
    /// macOS natives are universal binaries, so the subpath carries no
    /// architecture segment.
    ///
    /// # Example
    ///
    /// ```
    /// use nih_bundle::{OsKind, Platform};
    ///
    /// assert_eq!(Platform::new(OsKind::Linux, "x86-64").subpath(), "linux/x86-64");
    /// assert_eq!(Platform::new(OsKind::Mac, "aarch64").subpath(), "darwin");
    /// ```
    #[must_use]
    pub fn subpath(&self) -> String {
        match self.os {
            OsKind::Mac => self.os.as_str().to_string(),
            _ => format!("{}/{}", self.os.as_str(), self.arch),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subpath())
    }
}

fn bundle_arch_name(arch: &str, little_endian: bool) -> Option<&'static str> {
    match (arch, little_endian) {
        ("x86_64", _) => Some("x86-64"),
        ("x86", _) => Some("x86"),
        ("aarch64", _) => Some("aarch64"),
        ("arm", _) => Some("arm"),
        ("powerpc64", true) => Some("ppc64le"),
        ("mips64", true) => Some("mips64el"),
        _ => None,
    }
}
