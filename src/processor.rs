// ==============================================================================
// processor.rs - Streaming Raw Data Processing
// ==============================================================================
// Description: Chunked, memory-bounded parse of raw genome exports
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2026-01-17
// Version: 3.0.0
// ==============================================================================
// Pipeline:
//   Idle -> Detecting -> (DetectFailed | Ready) -> Streaming
//        -> (AbortedOnDecodeFault | AbortedOnReadFault | Completed)
//
// Each chunk is cut at its last line terminator (\n or bare \r); the trailing partial row is carried
// into the next chunk. Chunks are decoded strictly in order and appended to
// one owned Vec, so accumulation is O(total rows).
// ==============================================================================

use csv::{ReaderBuilder, StringRecord};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ParserSettings;
use crate::detector::{FormatDetector, ParseConfig};
use crate::error::AnnotateError;
use crate::matcher::{select_notable_with, MatchOptions};
use crate::models::GeneVariant;
use crate::parsers::{DecodeError, RowDecoder};
use crate::reference::ReferenceDataset;
use crate::source::{LocalFile, SourceFile};

/// Lifecycle of a single parse operation; never moves backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Idle,
    Detecting,
    DetectFailed,
    Ready,
    Streaming,
    AbortedOnDecodeFault,
    AbortedOnReadFault,
    Completed,
}

/// Progress event delivered to the caller's callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// A chunk was consumed; approximate percent of the file, 0-100
    Chunk { percent: f64 },
    /// All chunks consumed; sent exactly once, only on success
    Complete,
}

/// Unfiltered result of a completed parse
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub config: ParseConfig,
    /// Every reference hit in file order, before notable-genotype matching
    pub variants: Vec<GeneVariant>,
    /// Chunks read from the source
    pub chunks: usize,
    /// Raw rows handed to the decoder
    pub rows: usize,
}

/// Fault raised while streaming, before the source name is attached
enum StreamFault {
    Read(io::Error),
    Decode { chunk: usize, source: DecodeError },
}

/// Drives chunked reads through one row decoder
pub struct StreamingParser<'a> {
    config: ParseConfig,
    decoder: &'a dyn RowDecoder,
    reference: &'a ReferenceDataset,
}

impl<'a> StreamingParser<'a> {
    /// Parser using the decoder selected by `config`
    pub fn new(config: ParseConfig, reference: &'a ReferenceDataset) -> Self {
        Self {
            config,
            decoder: config.decoder(),
            reference,
        }
    }

    /// Replace the decoder chosen by detection
    pub fn with_decoder(mut self, decoder: &'a dyn RowDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Parse `source` from its first byte
    ///
    /// Calls `on_progress` after every chunk and once with
    /// [`Progress::Complete`] on success. On any fault no variants are
    /// returned and no completion event is sent.
    pub fn parse<F>(&self, source: &dyn SourceFile, mut on_progress: F) -> Result<ParseOutcome, AnnotateError>
    where
        F: FnMut(Progress),
    {
        let read_fault = |e: io::Error| AnnotateError::ReadFault {
            name: source.name().to_string(),
            source: e,
        };

        let reader = source.open().map_err(read_fault)?;
        let outcome = self.stream(reader, &mut on_progress).map_err(|fault| match fault {
            StreamFault::Read(e) => read_fault(e),
            StreamFault::Decode { chunk, source } => AnnotateError::DecodeFault { chunk, source },
        })?;

        on_progress(Progress::Complete);
        Ok(outcome)
    }

    fn stream<R, F>(&self, mut reader: R, on_progress: &mut F) -> Result<ParseOutcome, StreamFault>
    where
        R: Read,
        F: FnMut(Progress),
    {
        let chunk_size = self.config.chunk_size;
        let mut buffer = vec![0u8; chunk_size];
        let mut pending: Vec<u8> = Vec::with_capacity(chunk_size);
        let mut variants = Vec::new();
        let mut processed: u64 = 0;
        let mut chunks = 0;
        let mut rows = 0;

        loop {
            let read = fill_chunk(&mut reader, &mut buffer).map_err(StreamFault::Read)?;
            if read == 0 {
                break;
            }
            chunks += 1;
            pending.extend_from_slice(&buffer[..read]);

            // A short read means EOF: everything left is complete rows
            let at_end = read < chunk_size;
            let split = if at_end {
                pending.len()
            } else {
                pending
                    .iter()
                    .rposition(|&b| b == b'\n' || b == b'\r')
                    .map_or(0, |i| i + 1)
            };

            if split > 0 {
                let rest = pending.split_off(split);
                let complete = std::mem::replace(&mut pending, rest);
                rows += self.decode_chunk(&complete, chunks, &mut variants)?;
            }

            processed += chunk_size as u64;
            let percent = self.percent(processed);
            debug!("Chunk {} decoded: {} variants so far ({:.1}%)", chunks, variants.len(), percent);
            on_progress(Progress::Chunk { percent });

            if at_end {
                break;
            }
        }

        // File ended exactly on a chunk boundary without a trailing newline
        if !pending.is_empty() {
            rows += self.decode_chunk(&pending, chunks, &mut variants)?;
        }

        Ok(ParseOutcome {
            config: self.config,
            variants,
            chunks,
            rows,
        })
    }

    /// Split `bytes` into rows and append the decoded variants
    fn decode_chunk(
        &self,
        bytes: &[u8],
        chunk: usize,
        variants: &mut Vec<GeneVariant>,
    ) -> Result<usize, StreamFault> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(bytes);

        // Fields are decoded lossily; a stray Latin-1 byte never aborts the parse
        let mut records: Vec<StringRecord> = Vec::new();
        for result in reader.byte_records() {
            let record = result.map_err(|e| StreamFault::Decode {
                chunk,
                source: DecodeError::Split(e.to_string()),
            })?;
            records.push(StringRecord::from_byte_record_lossy(record));
        }

        let decoded = self
            .decoder
            .decode_batch(&records, self.reference)
            .map_err(|source| StreamFault::Decode { chunk, source })?;
        variants.extend(decoded);

        Ok(records.len())
    }

    fn percent(&self, processed: u64) -> f64 {
        if self.config.file_size == 0 {
            return 100.0;
        }
        (processed as f64 / self.config.file_size as f64 * 100.0).min(100.0)
    }
}

/// Read until `buf` is full or the stream ends
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// One detect-then-stream operation over a single file
///
/// Single-shot: a second `run` fails with [`AnnotateError::JobReused`].
pub struct AnnotationJob<'a> {
    reference: &'a ReferenceDataset,
    settings: ParserSettings,
    decoder: Option<&'a dyn RowDecoder>,
    state: ParseState,
}

impl<'a> AnnotationJob<'a> {
    pub fn new(reference: &'a ReferenceDataset, settings: ParserSettings) -> Self {
        Self {
            reference,
            settings,
            decoder: None,
            state: ParseState::Idle,
        }
    }

    /// Use `decoder` instead of the one detection selects
    pub fn with_decoder(mut self, decoder: &'a dyn RowDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    fn transition(&mut self, next: ParseState) {
        debug!("Parse state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Detect the format of `source` and stream it
    ///
    /// Returns the unfiltered reference hits; pass them to
    /// [`crate::matcher::select_notable`] for the final list.
    pub fn run<F>(&mut self, source: &dyn SourceFile, on_progress: F) -> Result<ParseOutcome, AnnotateError>
    where
        F: FnMut(Progress),
    {
        if self.state != ParseState::Idle {
            return Err(AnnotateError::JobReused { state: self.state });
        }

        self.transition(ParseState::Detecting);
        let config = match FormatDetector::new(self.settings).detect(source) {
            Ok(config) => config,
            Err(e) => {
                warn!("Format detection failed for {}: {}", source.name(), e);
                self.transition(ParseState::DetectFailed);
                return Err(e);
            }
        };
        self.transition(ParseState::Ready);

        let mut parser = StreamingParser::new(config, self.reference);
        if let Some(decoder) = self.decoder {
            parser = parser.with_decoder(decoder);
        }

        self.transition(ParseState::Streaming);
        info!(
            "Streaming {} ({} bytes, {} byte chunks)",
            source.name(),
            config.file_size,
            config.chunk_size
        );

        match parser.parse(source, on_progress) {
            Ok(outcome) => {
                info!(
                    "Parse complete: {} chunks, {} rows, {} reference hits",
                    outcome.chunks,
                    outcome.rows,
                    outcome.variants.len()
                );
                self.transition(ParseState::Completed);
                Ok(outcome)
            }
            Err(e) => {
                warn!("Parse aborted: {}", e);
                let aborted = match e {
                    AnnotateError::DecodeFault { .. } => ParseState::AbortedOnDecodeFault,
                    _ => ParseState::AbortedOnReadFault,
                };
                self.transition(aborted);
                Err(e)
            }
        }
    }
}

/// Final, filtered result handed to the presentation layer
#[derive(Debug, Clone)]
pub struct Annotation {
    pub config: ParseConfig,
    /// Variants whose observed genotype is notable
    pub matched: Vec<GeneVariant>,
    /// Reference hits before matching
    pub hits: usize,
    /// Raw rows scanned
    pub rows: usize,
}

/// Detect, stream and match one source
pub fn annotate<F>(
    source: &dyn SourceFile,
    reference: &ReferenceDataset,
    settings: ParserSettings,
    options: MatchOptions,
    on_progress: F,
) -> Result<Annotation, AnnotateError>
where
    F: FnMut(Progress),
{
    let outcome = AnnotationJob::new(reference, settings).run(source, on_progress)?;
    let hits = outcome.variants.len();
    let matched = select_notable_with(outcome.variants, reference, options);
    info!("{} of {} reference hits carry a notable genotype", matched.len(), hits);

    Ok(Annotation {
        config: outcome.config,
        matched,
        hits,
        rows: outcome.rows,
    })
}

/// [`annotate`] a local file on the blocking thread pool
pub async fn annotate_path<F>(
    path: PathBuf,
    reference: Arc<ReferenceDataset>,
    settings: ParserSettings,
    options: MatchOptions,
    on_progress: F,
) -> Result<Annotation, AnnotateError>
where
    F: FnMut(Progress) + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let source = LocalFile::new(&path).map_err(|e| AnnotateError::ReadFault {
            name: path.display().to_string(),
            source: e,
        })?;
        annotate(&source, &reference, settings, options, on_progress)
    })
    .await?
}
