// ==============================================================================
// lib.rs - Genotype Annotator Library
// ==============================================================================
// Description: Streaming raw genome parser with reference annotation
// Author: Matt Barham
// Created: 2025-11-03
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

pub mod config;
pub mod detector;
pub mod error;
pub mod matcher;
pub mod models;
pub mod output;
pub mod parsers;
pub mod processor;
pub mod reference;
pub mod source;

pub use config::ParserSettings;
pub use error::AnnotateError;
pub use matcher::{select_notable, MatchOptions};
pub use models::{GeneVariant, Genotype, SourceFormat};
pub use processor::{annotate, annotate_path, Annotation, AnnotationJob, Progress};
pub use reference::ReferenceDataset;
pub use source::{InMemoryFile, LocalFile, SourceFile};
