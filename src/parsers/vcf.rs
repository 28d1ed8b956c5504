// ==============================================================================
// parsers/vcf.rs - VCF row decoder
// ==============================================================================
// Description: Fixed-column decoder for VCF rows (no INFO/FORMAT parsing)
// Author: Matt Barham
// Created: 2025-11-03
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================
// Columns used: CHROM (0), POS (1), ID (2), and column 4 as the genotype.
// Multi-sample columns and comma-separated ALT alleles are not interpreted;
// a multi-allelic column 4 simply fails genotype construction.
// ==============================================================================

use super::{emit, is_comment, DecodeError, RowDecoder, RowOutcome};
use crate::models::Genotype;
use crate::reference::ReferenceDataset;

/// Decoder for VCF data lines
#[derive(Debug, Clone, Copy, Default)]
pub struct VcfDecoder;

impl RowDecoder for VcfDecoder {
    fn decode_row(
        &self,
        fields: &[&str],
        reference: &ReferenceDataset,
    ) -> Result<RowOutcome, DecodeError> {
        // Meta lines (##) and the #CHROM header both start with '#'
        if fields.len() < 5 || is_comment(fields[0]) {
            return Ok(RowOutcome::Skip);
        }

        Ok(emit(
            reference,
            fields[2],
            fields[0],
            fields[1],
            Genotype::parse(fields[4]),
        ))
    }
}
