// ==============================================================================
// error.rs - Annotation Errors
// ==============================================================================
// Description: Fatal outcomes of a detect-and-parse operation
// Author: Matt Barham
// Created: 2026-01-10
// Modified: 2026-01-17
// Version: 1.0.0
// ==============================================================================
// None of these are retried. Malformed rows, comment rows and unknown
// identifiers are skipped by the decoders and never surface here.
// ==============================================================================

use thiserror::Error;

use crate::parsers::DecodeError;
use crate::processor::ParseState;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Unable to detect file type of {name}: no 23andMe or AncestryDNA header found")]
    FormatUndetected { name: String },

    #[error("Unsupported large file {name}: {size} bytes exceeds {threshold} and is not a VCF file")]
    UnsupportedLargeFile {
        name: String,
        size: u64,
        threshold: u64,
    },

    #[error("Failed to read {name}: {source}")]
    ReadFault {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Decoder fault in chunk {chunk}: {source}")]
    DecodeFault {
        chunk: usize,
        #[source]
        source: DecodeError,
    },

    #[error("Parse job already used (state: {state:?}); each job runs once")]
    JobReused { state: ParseState },

    #[error("Parse worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl AnnotateError {
    /// Short machine-readable kind, for logs and callers that map to UI messages
    pub fn kind(&self) -> &'static str {
        match self {
            AnnotateError::FormatUndetected { .. } => "format_undetected",
            AnnotateError::UnsupportedLargeFile { .. } => "unsupported_large_file",
            AnnotateError::ReadFault { .. } => "read_fault",
            AnnotateError::DecodeFault { .. } => "decode_fault",
            AnnotateError::JobReused { .. } => "job_reused",
            AnnotateError::Worker(_) => "worker",
        }
    }
}
