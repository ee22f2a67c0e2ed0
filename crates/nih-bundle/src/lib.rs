//! Native resource bundles for nih
//!
//! This crate provides the packaging side of native extraction: the platform
//! subpath a process runs under, the bundle manifest listing every packaged
//! native file, and the [`ResourceSource`] capability used to read those files.
//!
//! # Bundle Structure
//!
//! ```text
//! app-natives.zip
//! ├── META-INF/
//! │   └── nih.bundle             # one resource location per line
//! ├── linux/
//! │   ├── x86-64/
//! │   │   ├── libpty.so
//! │   │   └── helper
//! │   └── aarch64/
//! │       └── libpty.so
//! ├── darwin/
//! │   └── libpty.dylib
//! └── win/
//!     └── x86-64/
//!         ├── conpty.dll
//!         └── OpenConsole.exe
//! ```
//!
//! # Example
//!
//! ```no_run
//! use nih_bundle::{ArchiveSource, BundleManifest, Platform, ResourceSource};
//!
//! let source = ArchiveSource::open("app-natives.zip")?;
//! let manifest = BundleManifest::load(&source)?;
//! let subpath = Platform::current()?.subpath();
//!
//! for location in manifest.entries_for(&subpath) {
//!     println!("{location}");
//! }
//! # Ok::<(), nih_bundle::BundleError>(())
//! ```

mod checksum;
mod error;
mod manifest;
mod platform;

pub mod builder;
pub mod source;

pub use builder::BundleBuilder;
pub use checksum::Checksum;
pub use error::BundleError;
pub use manifest::BundleManifest;
pub use platform::{OsKind, Platform};
pub use source::{ArchiveSource, DirectorySource, FallbackSource, MemorySource, ResourceSource};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Resource name of the bundle manifest.
pub const MANIFEST_RESOURCE: &str = "META-INF/nih.bundle";

/// Separator used in resource names and platform subpaths.
pub const RESOURCE_SEPARATOR: char = '/';
