//! Content checksums used to detect changed natives.
//!
//! MD5 is only used to notice that an extracted file differs from its bundled
//! counterpart. It is not an integrity or authenticity check.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// MD5 digest of a file or resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 16]);

impl Checksum {
    /// Checksum of in-memory bytes.
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(md5::compute(data).0)
    }

    /// Checksum of everything a reader yields, streamed in chunks.
    pub fn of_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut context = md5::Context::new();
        io::copy(&mut reader, &mut context)?;
        Ok(Self(context.finalize().0))
    }

    /// Checksum of a file on disk.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        Self::of_reader(File::open(path)?)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "md5:{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn Checksum___of_bytes___matches_known_digest() {
        let checksum = Checksum::of_bytes(b"abcdefghijklmnopqrstuvwxyz");

        assert_eq!(
            checksum.to_string(),
            "md5:c3fcd3d76192e4007dfb496cca67e13b"
        );
    }

    #[test]
    fn Checksum___of_reader___matches_of_bytes() {
        let data = b"native library contents";

        let from_reader = Checksum::of_reader(&data[..]).unwrap();

        assert_eq!(from_reader, Checksum::of_bytes(data));
    }

    #[test]
    fn Checksum___of_reader___larger_than_copy_buffer___matches_of_bytes() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();

        let from_reader = Checksum::of_reader(std::io::Cursor::new(&data)).unwrap();

        assert_eq!(from_reader, Checksum::of_bytes(&data));
    }

    #[test]
    fn Checksum___of_file___matches_of_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("libpty.so");
        std::fs::write(&path, b"ELF").unwrap();

        let checksum = Checksum::of_file(&path).unwrap();

        assert_eq!(checksum, Checksum::of_bytes(b"ELF"));
    }

    #[test]
    fn Checksum___of_file___missing_file___returns_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = Checksum::of_file(&temp_dir.path().join("gone.so"));

        assert!(result.is_err());
    }

    #[test]
    fn Checksum___different_content___differs() {
        assert_ne!(Checksum::of_bytes(b"v1"), Checksum::of_bytes(b"v2"));
    }
}
