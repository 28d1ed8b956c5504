// ==============================================================================
// parsers/mod.rs - Row decoders
// ==============================================================================
// Description: Per-format decoders mapping raw rows to annotated variants
// Author: Matt Barham
// Created: 2025-11-03
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

pub mod ancestry;
pub mod genome23andme;
pub mod vcf;

pub use ancestry::AncestryDecoder;
pub use genome23andme::Genome23Decoder;
pub use vcf::VcfDecoder;

use csv::StringRecord;
use thiserror::Error;

use crate::models::{GeneVariant, Genotype, SourceFormat};
use crate::reference::ReferenceDataset;

/// Result of decoding one raw row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Row is well-formed and its identifier is a reference variant
    Emit(GeneVariant),
    /// Comment, short row, or identifier unknown to the reference
    Skip,
}

/// Unexpected decoder failure; aborts the whole parse
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to split rows: {0}")]
    Split(String),

    #[error("{decoder} decoder fault: {details}")]
    Fault {
        decoder: &'static str,
        details: String,
    },
}

/// Maps raw rows of one source format to [`GeneVariant`]s
///
/// Malformed rows and unknown identifiers are not errors: decoders return
/// [`RowOutcome::Skip`]. `Err` is reserved for faults that should abort
/// the parse.
pub trait RowDecoder: Send + Sync {
    /// Decode a single row of already-split fields
    fn decode_row(
        &self,
        fields: &[&str],
        reference: &ReferenceDataset,
    ) -> Result<RowOutcome, DecodeError>;

    /// Decode a batch of rows, keeping input order
    fn decode_batch(
        &self,
        rows: &[StringRecord],
        reference: &ReferenceDataset,
    ) -> Result<Vec<GeneVariant>, DecodeError> {
        let mut variants = Vec::new();
        for row in rows {
            let fields: Vec<&str> = row.iter().collect();
            if let RowOutcome::Emit(variant) = self.decode_row(&fields, reference)? {
                variants.push(variant);
            }
        }
        Ok(variants)
    }
}

static GENOME23: Genome23Decoder = Genome23Decoder;
static ANCESTRY: AncestryDecoder = AncestryDecoder;
static VCF: VcfDecoder = VcfDecoder;

/// Decoder for a detected source format
pub fn decoder_for(format: SourceFormat) -> &'static dyn RowDecoder {
    match format {
        SourceFormat::Genome23andMe => &GENOME23,
        SourceFormat::AncestryDna => &ANCESTRY,
        SourceFormat::Vcf => &VCF,
    }
}

/// Shared tail of every decoder: look up the identifier and build the variant
fn emit(
    reference: &ReferenceDataset,
    rsid: &str,
    chromosome: &str,
    position: &str,
    genotype: Option<Genotype>,
) -> RowOutcome {
    match reference.annotate(rsid.trim(), chromosome, position, genotype) {
        Some(variant) => RowOutcome::Emit(variant),
        None => RowOutcome::Skip,
    }
}

fn is_comment(field: &str) -> bool {
    field.starts_with('#')
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::reference;

    #[test]
    fn test_decoder_for_each_format() {
        let reference = reference();
        let row = ["rs1801133", "1", "11856378", "AA"];

        let outcome = decoder_for(SourceFormat::Genome23andMe)
            .decode_row(&row, &reference)
            .unwrap();
        assert!(matches!(outcome, RowOutcome::Emit(_)));

        // Same four fields are too short for VCF
        let outcome = decoder_for(SourceFormat::Vcf).decode_row(&row, &reference).unwrap();
        assert_eq!(outcome, RowOutcome::Skip);
    }

    #[test]
    fn test_identifier_trimmed_but_case_sensitive() {
        let reference = reference();
        let decoder = decoder_for(SourceFormat::Genome23andMe);

        match decoder.decode_row(&[" rs429358 ", "19", "45411941", "CC"], &reference).unwrap() {
            RowOutcome::Emit(variant) => assert_eq!(variant.rsid, "rs429358"),
            RowOutcome::Skip => panic!("Expected padded identifier to match"),
        }

        let outcome = decoder
            .decode_row(&["RS429358", "19", "45411941", "CC"], &reference)
            .unwrap();
        assert_eq!(outcome, RowOutcome::Skip);
    }

    #[test]
    fn test_decode_batch_preserves_order() {
        let reference = reference();
        let rows = vec![
            StringRecord::from(vec!["rs1801133", "1", "11856378", "AG"]),
            StringRecord::from(vec!["rs0000001", "1", "1", "AA"]),
            StringRecord::from(vec!["rs429358", "19", "45411941", "CT"]),
        ];

        let variants = Genome23Decoder.decode_batch(&rows, &reference).unwrap();
        let ids: Vec<&str> = variants.iter().map(|v| v.rsid.as_str()).collect();
        assert_eq!(ids, vec!["rs1801133", "rs429358"]);
    }
}
