// ==============================================================================
// ancestry.rs - AncestryDNA Raw Data Decoder
// ==============================================================================
// Description: Row decoder for AncestryDNA raw data downloads
// Author: Matt Barham
// Created: 2026-01-12
// Modified: 2026-01-17
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited text, alleles split over two columns
// Example:
//   #AncestryDNA raw data download
//   rsid    chromosome    position    allele1    allele2
//   rs4477212    1    82154    T    T
//
// The row splitter runs with a comma delimiter for this format, so a
// tab-delimited row normally arrives as a single field. Field 0 is
// re-split on tabs before any column index is used.
// ==============================================================================

use super::{emit, DecodeError, RowDecoder, RowOutcome};
use crate::models::Genotype;
use crate::reference::ReferenceDataset;

/// Decoder for AncestryDNA rows
///
/// Genotype is the literal concatenation of allele1 and allele2. When either
/// side is empty or multi-character the result is not two characters long
/// and the variant carries an absent genotype.
#[derive(Debug, Clone, Copy, Default)]
pub struct AncestryDecoder;

/// Undo a comma split that left tab-joined columns inside field 0
fn resplit<'a>(fields: &[&'a str]) -> Vec<&'a str> {
    match fields.split_first() {
        Some((first, rest)) if first.contains('\t') => {
            first.split('\t').chain(rest.iter().copied()).collect()
        }
        _ => fields.to_vec(),
    }
}

impl RowDecoder for AncestryDecoder {
    fn decode_row(
        &self,
        fields: &[&str],
        reference: &ReferenceDataset,
    ) -> Result<RowOutcome, DecodeError> {
        let fields = resplit(fields);
        if fields.len() < 4 {
            return Ok(RowOutcome::Skip);
        }

        let allele2 = fields.get(4).copied().unwrap_or_default();
        let genotype = Genotype::parse(&format!("{}{}", fields[3], allele2));

        Ok(emit(reference, fields[0], fields[1], fields[2], genotype))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::reference;

    fn expect_emit(outcome: RowOutcome) -> crate::models::GeneVariant {
        match outcome {
            RowOutcome::Emit(variant) => variant,
            RowOutcome::Skip => panic!("Expected Emit"),
        }
    }

    #[test]
    fn test_comma_split_row() {
        let reference = reference();
        let variant = expect_emit(
            AncestryDecoder
                .decode_row(&["rs429358", "19", "45411941", "C", "T"], &reference)
                .unwrap(),
        );
        assert_eq!(variant.genotype, Genotype::parse("CT"));
        assert_eq!(variant.gene, "APOE");
    }

    #[test]
    fn test_tab_joined_row_matches_comma_split() {
        let reference = reference();
        let joined = AncestryDecoder
            .decode_row(&["rs429358\t19\t45411941\tC\tT"], &reference)
            .unwrap();
        let split = AncestryDecoder
            .decode_row(&["rs429358", "19", "45411941", "C", "T"], &reference)
            .unwrap();
        assert_eq!(joined, split);
    }

    #[test]
    fn test_partial_tab_join() {
        // Tabs in field 0 plus a trailing comma-separated field
        let reference = reference();
        let variant = expect_emit(
            AncestryDecoder
                .decode_row(&["rs1801133\t1\t11856378\tA", "A"], &reference)
                .unwrap(),
        );
        assert_eq!(variant.genotype, Genotype::parse("AA"));
    }

    #[test]
    fn test_header_rows_skipped() {
        let reference = reference();
        assert_eq!(
            AncestryDecoder
                .decode_row(&["#AncestryDNA raw data download"], &reference)
                .unwrap(),
            RowOutcome::Skip
        );
        assert_eq!(
            AncestryDecoder
                .decode_row(&["rsid\tchromosome\tposition\tallele1\tallele2"], &reference)
                .unwrap(),
            RowOutcome::Skip
        );
    }

    #[test]
    fn test_missing_second_allele_gives_absent_genotype() {
        let reference = reference();
        let variant = expect_emit(
            AncestryDecoder
                .decode_row(&["rs1801133", "1", "11856378", "A"], &reference)
                .unwrap(),
        );
        assert!(variant.genotype.is_none());
    }

    #[test]
    fn test_multi_character_allele_gives_absent_genotype() {
        let reference = reference();
        let variant = expect_emit(
            AncestryDecoder
                .decode_row(&["rs1801133", "1", "11856378", "AT", "A"], &reference)
                .unwrap(),
        );
        assert!(variant.genotype.is_none());
    }

    #[test]
    fn test_no_call_zeros() {
        let reference = reference();
        let variant = expect_emit(
            AncestryDecoder
                .decode_row(&["rs1801133", "1", "11856378", "0", "0"], &reference)
                .unwrap(),
        );
        assert_eq!(variant.genotype.map(|g| g.to_string()).as_deref(), Some("00"));
        assert!(!variant.notable.contains(&variant.genotype.unwrap()));
    }
}
