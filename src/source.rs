// ==============================================================================
// source.rs - Raw Data File Handles
// ==============================================================================
// Description: Opaque, re-openable file handles (name, size, byte stream)
// Author: Matt Barham
// Created: 2026-01-10
// Modified: 2026-01-17
// Version: 1.0.0
// ==============================================================================

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A raw data file supplied by the caller
///
/// `open` must return a fresh stream positioned at the first byte each time
/// it is called, so format detection can sniff the header without disturbing the parse.
pub trait SourceFile: Send + Sync {
    /// File name including extension (used for large-file format checks)
    fn name(&self) -> &str;

    /// Size in bytes as stored (used for progress and the large-file cutover)
    fn size(&self) -> u64;

    /// Open a new byte stream from the start of the file
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>>;
}

/// A file on the local filesystem
///
/// Gzip-compressed files (including BGZF) are decompressed transparently;
/// `size` still reports the on-disk size.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl LocalFile {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

impl SourceFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        let mut reader = BufReader::new(File::open(&self.path)?);

        // GZIP magic: 1f 8b
        let is_gzip = {
            let buf = reader.fill_buf()?;
            buf.len() >= 2 && buf[0] == 0x1f && buf[1] == 0x8b
        };

        if is_gzip {
            debug!("Detected GZIP/BGZF layer in {}", self.name);
            Ok(Box::new(MultiGzDecoder::new(reader)))
        } else {
            Ok(Box::new(reader))
        }
    }
}

/// An in-memory file, for uploads already buffered by the caller
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    name: String,
    bytes: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl SourceFile for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_local_file_metadata() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"rs1\t1\t100\tAA\n").unwrap();
        file.flush().unwrap();

        let source = LocalFile::new(file.path()).unwrap();
        assert_eq!(source.size(), 13);
        assert!(!source.name().is_empty());
    }

    #[test]
    fn test_open_is_repeatable() {
        let source = InMemoryFile::new("genome.txt", "abc");
        for _ in 0..2 {
            let mut text = String::new();
            source.open().unwrap().read_to_string(&mut text).unwrap();
            assert_eq!(text, "abc");
        }
    }

    #[test]
    fn test_gzip_is_transparent() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"##fileformat=VCFv4.2\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&compressed).unwrap();
        file.flush().unwrap();

        let source = LocalFile::new(file.path()).unwrap();
        assert_eq!(source.size(), compressed.len() as u64);

        let mut text = String::new();
        source.open().unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "##fileformat=VCFv4.2\n");
    }

    #[test]
    fn test_missing_file() {
        assert!(LocalFile::new("/nonexistent/genome.txt").is_err());
    }
}
