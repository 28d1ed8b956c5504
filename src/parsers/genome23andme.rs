// ==============================================================================
// genome23andme.rs - 23andMe Raw Data Decoder
// ==============================================================================
// Description: Row decoder for 23andMe raw genome data files
// Author: Matt Barham
// Created: 2025-11-04
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================
// Format: Tab-delimited text with header comments
// Example:
//   # This data file generated by 23andMe at: ...
//   # rsid    chromosome    position    genotype
//   rs548049170    1    69869    TT
//   rs13328684    1    74792    --
// ==============================================================================

use super::{emit, is_comment, DecodeError, RowDecoder, RowOutcome};
use crate::models::Genotype;
use crate::reference::ReferenceDataset;

/// Decoder for 23andMe rows
///
/// Columns: rsid, chromosome, position, genotype. Rows with fewer than four
/// fields or a leading `#` are skipped. Position is kept as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Genome23Decoder;

impl RowDecoder for Genome23Decoder {
    fn decode_row(
        &self,
        fields: &[&str],
        reference: &ReferenceDataset,
    ) -> Result<RowOutcome, DecodeError> {
        if fields.len() < 4 || is_comment(fields[0]) {
            return Ok(RowOutcome::Skip);
        }

        Ok(emit(
            reference,
            fields[0],
            fields[1],
            fields[2],
            Genotype::parse(fields[3]),
        ))
    }
}
