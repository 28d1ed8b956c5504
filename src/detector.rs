// ==============================================================================
// detector.rs - Source Format Detection
// ==============================================================================
// Description: Classifies a raw data file and builds its parse configuration
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================
// Rules:
//   1. size > 100 MiB  -> name must end in .vcf / .vcf.gz, no content is read
//   2. otherwise read the first line only:
//        contains "generated by 23andMe"            -> 23andMe, tab
//        contains "#AncestryDNA raw data download"  -> AncestryDNA, comma
//        anything else                              -> FormatUndetected
// ==============================================================================

use std::io::{BufRead, BufReader, Read};
use tracing::{debug, info};

use crate::config::{ParserSettings, CHUNK_SIZE};
use crate::error::AnnotateError;
use crate::models::SourceFormat;
use crate::parsers::{decoder_for, RowDecoder};
use crate::source::SourceFile;

/// Header marker written on the first line of 23andMe exports
pub const GENOME23_MARKER: &str = "generated by 23andMe";

/// Header marker written on the first line of AncestryDNA exports
pub const ANCESTRY_MARKER: &str = "#AncestryDNA raw data download";

/// Per-parse configuration, fixed once the format is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    pub format: SourceFormat,
    pub delimiter: u8,
    pub chunk_size: usize,
    pub file_size: u64,
}

impl ParseConfig {
    pub fn new(format: SourceFormat, chunk_size: usize, file_size: u64) -> Self {
        Self {
            format,
            delimiter: format.delimiter(),
            chunk_size: chunk_size.max(1),
            file_size,
        }
    }

    /// Row decoder for the detected format
    pub fn decoder(&self) -> &'static dyn RowDecoder {
        decoder_for(self.format)
    }
}

/// Side-effect-free format sniffing
#[derive(Debug, Clone, Default)]
pub struct FormatDetector {
    settings: ParserSettings,
}

impl FormatDetector {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }

    /// Detect the format of `source`
    ///
    /// Opens its own stream and reads at most the first line, bounded by
    /// one chunk, so running it twice yields the same result.
    pub fn detect(&self, source: &dyn SourceFile) -> Result<ParseConfig, AnnotateError> {
        let name = source.name();
        let size = source.size();
        let chunk_size = self.settings.chunk_size_for(size);

        if self.settings.is_large(size) {
            debug!("{} is {} bytes, skipping header sniff", name, size);
            if !has_vcf_extension(name) {
                return Err(AnnotateError::UnsupportedLargeFile {
                    name: name.to_string(),
                    size,
                    threshold: self.settings.large_file_threshold,
                });
            }
            info!("Detected VCF (large file): {}", name);
            return Ok(ParseConfig::new(SourceFormat::Vcf, chunk_size, size));
        }

        let first_line = self.read_first_line(source)?;
        let format = if first_line.contains(GENOME23_MARKER) {
            SourceFormat::Genome23andMe
        } else if first_line.contains(ANCESTRY_MARKER) {
            SourceFormat::AncestryDna
        } else {
            return Err(AnnotateError::FormatUndetected {
                name: name.to_string(),
            });
        };

        info!("Detected {} file: {}", format, name);
        Ok(ParseConfig::new(format, chunk_size, size))
    }

    fn read_first_line(&self, source: &dyn SourceFile) -> Result<String, AnnotateError> {
        let read_fault = |e: std::io::Error| AnnotateError::ReadFault {
            name: source.name().to_string(),
            source: e,
        };

        let stream = source.open().map_err(read_fault)?;
        // The header read is never narrower than one nominal chunk
        let limit = CHUNK_SIZE.max(self.settings.chunk_size) as u64;
        let mut reader = BufReader::new(stream.take(limit));

        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line).map_err(read_fault)?;

        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

fn has_vcf_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".vcf") || lower.ends_with(".vcf.gz")
}
