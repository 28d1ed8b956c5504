// ==============================================================================
// matcher.rs - Notable Genotype Matching
// ==============================================================================
// Description: Keeps only variants whose observed genotype is notable
// Author: Matt Barham
// Created: 2026-01-12
// Modified: 2026-01-17
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};

use crate::models::GeneVariant;
use crate::reference::{ReferenceDataset, ReferenceEntry};

/// Matching switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Also accept the reverse complement of the observed genotype, for
    /// exports reported on the opposite strand to the reference
    pub strand_tolerant: bool,
}

/// Keep variants whose genotype is in the reference's notable set, in order
///
/// Variants with an absent genotype, or whose identifier is not in
/// `reference`, are always dropped.
///
/// # Examples
/// ```
/// use genotype_annotator::matcher::select_notable;
/// use genotype_annotator::models::Genotype;
/// use genotype_annotator::reference::{ReferenceDataset, ReferenceEntry};
///
/// let reference: ReferenceDataset =
///     [("rs1".to_string(), ReferenceEntry::new("trait", None, &["AG"]))].into_iter().collect();
/// let hit = reference.annotate("rs1", "1", "100", Genotype::parse("GA")).unwrap();
/// let miss = reference.annotate("rs1", "1", "100", Genotype::parse("AA")).unwrap();
///
/// let matched = select_notable(vec![hit, miss], &reference);
/// assert_eq!(matched.len(), 1);
/// ```
pub fn select_notable(variants: Vec<GeneVariant>, reference: &ReferenceDataset) -> Vec<GeneVariant> {
    select_notable_with(variants, reference, MatchOptions::default())
}

/// [`select_notable`] with explicit [`MatchOptions`]
pub fn select_notable_with(
    variants: Vec<GeneVariant>,
    reference: &ReferenceDataset,
    options: MatchOptions,
) -> Vec<GeneVariant> {
    variants
        .into_iter()
        .filter(|variant| {
            reference
                .get(&variant.rsid)
                .map(|entry| is_notable(variant, entry, options))
                .unwrap_or(false)
        })
        .collect()
}

fn is_notable(variant: &GeneVariant, entry: &ReferenceEntry, options: MatchOptions) -> bool {
    let Some(observed) = variant.genotype else {
        return false;
    };

    entry.is_notable(&observed)
        || (options.strand_tolerant && entry.is_notable(&observed.reverse_complement()))
}
