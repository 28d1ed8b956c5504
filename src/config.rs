// ==============================================================================
// config.rs - Parser Settings
// ==============================================================================
// Description: Size thresholds and chunk sizes for streaming parses
// Author: Matt Barham
// Created: 2026-01-10
// Modified: 2026-01-17
// Version: 1.0.0
// ==============================================================================
// The defaults must stay in sync with existing export fixtures:
//   - files above 100 MiB skip header sniffing and must be VCF
//   - normal files are read in 50 KiB chunks
// ==============================================================================

use serde::{Deserialize, Serialize};

/// Files larger than this are not sniffed (100 MiB)
pub const LARGE_FILE_THRESHOLD: u64 = 104_857_600;

/// Chunk size for normal-size files (50 KiB)
pub const CHUNK_SIZE: usize = 51_200;

/// Chunk size for large files; the row splitter's own default (10 MiB)
pub const LARGE_FILE_CHUNK_SIZE: usize = 10_485_760;

/// Tunable settings for format detection and chunked reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Byte size above which content sniffing is skipped
    pub large_file_threshold: u64,

    /// Bytes per chunk for files at or below the threshold
    pub chunk_size: usize,

    /// Bytes per chunk for files above the threshold
    pub large_file_chunk_size: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            large_file_threshold: LARGE_FILE_THRESHOLD,
            chunk_size: CHUNK_SIZE,
            large_file_chunk_size: LARGE_FILE_CHUNK_SIZE,
        }
    }
}

impl ParserSettings {
    /// Override the normal-file chunk size (clamped to at least 1 byte)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn is_large(&self, file_size: u64) -> bool {
        file_size > self.large_file_threshold
    }

    /// Chunk size to use for a file of `file_size` bytes
    pub fn chunk_size_for(&self, file_size: u64) -> usize {
        if self.is_large(file_size) {
            self.large_file_chunk_size.max(1)
        } else {
            self.chunk_size.max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let settings = ParserSettings::default();
        assert_eq!(settings.large_file_threshold, 104_857_600);
        assert_eq!(settings.chunk_size, 51_200);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let settings = ParserSettings::default();
        assert!(!settings.is_large(LARGE_FILE_THRESHOLD));
        assert!(settings.is_large(LARGE_FILE_THRESHOLD + 1));
        assert_eq!(settings.chunk_size_for(LARGE_FILE_THRESHOLD), CHUNK_SIZE);
        assert_eq!(settings.chunk_size_for(LARGE_FILE_THRESHOLD + 1), LARGE_FILE_CHUNK_SIZE);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let settings: ParserSettings = serde_json::from_str(r#"{ "chunk_size": 1024 }"#).unwrap();
        assert_eq!(settings.chunk_size, 1024);
        assert_eq!(settings.large_file_threshold, LARGE_FILE_THRESHOLD);
    }

    #[test]
    fn test_zero_chunk_size_clamped() {
        assert_eq!(ParserSettings::default().with_chunk_size(0).chunk_size, 1);
    }
}
