// ==============================================================================
// models.rs - Genotype and Variant Data Models
// ==============================================================================
// Description: Unordered allele pairs and annotated variant observations
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2026-01-17
// Version: 3.0.0
// ==============================================================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Unordered pair of alleles observed at one variant position
///
/// Equality and hashing are order-insensitive: `AG` == `GA`. The observed
/// order is kept for display so no allele information is lost.
#[derive(Debug, Clone, Copy)]
pub struct Genotype {
    alleles: [char; 2],
}

impl Genotype {
    /// Build a genotype from a two-character string (e.g., "AG", "TT", "--")
    ///
    /// Surrounding whitespace is ignored. Any other length yields `None`,
    /// which downstream code treats as an absent genotype.
    ///
    /// # Examples
    /// ```
    /// use genotype_annotator::models::Genotype;
    ///
    /// assert_eq!(Genotype::parse("AG"), Genotype::parse("GA"));
    /// assert!(Genotype::parse("A").is_none());
    /// assert!(Genotype::parse("AGT").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Some(Self {
                alleles: [first, second],
            }),
            _ => None,
        }
    }

    /// Alleles in the order they were observed
    pub fn alleles(&self) -> [char; 2] {
        self.alleles
    }

    /// Alleles sorted so that `AG` and `GA` share one representation
    pub fn canonical(&self) -> [char; 2] {
        let [a, b] = self.alleles;
        if a <= b {
            [a, b]
        } else {
            [b, a]
        }
    }

    /// Reverse complement (strand flip)
    ///
    /// # Mapping
    /// - A ↔ T
    /// - C ↔ G
    /// - anything else (no-calls, indel markers) is kept as-is
    pub fn reverse_complement(&self) -> Self {
        let flip = |c: char| match c {
            'A' => 'T',
            'T' => 'A',
            'C' => 'G',
            'G' => 'C',
            'a' => 't',
            't' => 'a',
            'c' => 'g',
            'g' => 'c',
            _ => c,
        };
        Self {
            alleles: [flip(self.alleles[0]), flip(self.alleles[1])],
        }
    }
}

impl PartialEq for Genotype {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Genotype {}

impl Hash for Genotype {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.alleles[0], self.alleles[1])
    }
}

impl Serialize for Genotype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Genotype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Genotype::parse(&text).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid genotype '{}' (expected 2 characters)",
                text
            ))
        })
    }
}

/// Supported consumer raw-data export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// 23andMe raw data (tab-delimited, '#' comment header)
    #[serde(rename = "23andme")]
    Genome23andMe,
    /// AncestryDNA raw data (alleles split over two columns)
    #[serde(rename = "ancestrydna")]
    AncestryDna,
    /// Variant Call Format (fixed-position columns only)
    Vcf,
}

impl SourceFormat {
    /// Field delimiter handed to the row splitter
    pub fn delimiter(&self) -> u8 {
        match self {
            SourceFormat::Genome23andMe => b'\t',
            SourceFormat::AncestryDna => b',',
            SourceFormat::Vcf => b'\t',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Genome23andMe => "23andMe",
            SourceFormat::AncestryDna => "AncestryDNA",
            SourceFormat::Vcf => "VCF",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded observation whose identifier is present in the reference dataset
///
/// Only built through [`crate::reference::ReferenceDataset::annotate`], so the
/// phenotype, gene and notable set always come from a real reference entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneVariant {
    /// Variant identifier as written in the source (usually an rsID)
    pub rsid: String,

    /// Chromosome label, copied verbatim
    pub chromosome: String,

    /// Position, copied verbatim (not validated as numeric)
    pub position: String,

    /// Observed genotype, `None` when the source value was unparseable
    pub genotype: Option<Genotype>,

    /// Phenotype label from the reference (may be empty)
    pub phenotype: String,

    /// Gene label from the reference (empty when the reference has none)
    pub gene: String,

    /// Notable genotypes copied from the reference entry at decode time
    pub notable: Vec<Genotype>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_two_characters() {
        let genotype = Genotype::parse("AG").unwrap();
        assert_eq!(genotype.alleles(), ['A', 'G']);
        assert_eq!(genotype.to_string(), "AG");
    }

    #[test]
    fn test_parse_rejects_other_lengths() {
        assert!(Genotype::parse("").is_none());
        assert!(Genotype::parse("A").is_none());
        assert!(Genotype::parse("AGT").is_none());
        // Concatenated AncestryDNA fields where one side is multi-character
        assert!(Genotype::parse("AAG").is_none());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Genotype::parse(" TT "), Genotype::parse("TT"));
    }

    #[test]
    fn test_no_call_is_a_genotype() {
        // "--" is well-formed; it just never appears in a notable set
        assert_eq!(Genotype::parse("--").unwrap().to_string(), "--");
    }

    #[test]
    fn test_order_insensitive_hash() {
        let mut set = HashSet::new();
        set.insert(Genotype::parse("CT").unwrap());
        assert!(set.contains(&Genotype::parse("TC").unwrap()));
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(Genotype::parse("AC").unwrap().reverse_complement().to_string(), "TG");
        assert_eq!(Genotype::parse("AT").unwrap().reverse_complement().to_string(), "TA");
        assert_eq!(Genotype::parse("--").unwrap().reverse_complement().to_string(), "--");
    }

    #[test]
    fn test_serde_as_string() {
        let genotype: Genotype = serde_json::from_str("\"GA\"").unwrap();
        assert_eq!(genotype, Genotype::parse("AG").unwrap());
        assert_eq!(serde_json::to_string(&genotype).unwrap(), "\"GA\"");
        assert!(serde_json::from_str::<Genotype>("\"GAT\"").is_err());
    }

    #[test]
    fn test_source_format_delimiters() {
        assert_eq!(SourceFormat::Genome23andMe.delimiter(), b'\t');
        assert_eq!(SourceFormat::AncestryDna.delimiter(), b',');
        assert_eq!(SourceFormat::Vcf.delimiter(), b'\t');
    }

    fn nucleotide() -> impl Strategy<Value = char> {
        prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')]
    }

    proptest! {
        #[test]
        fn prop_allele_order_does_not_matter(x in nucleotide(), y in nucleotide()) {
            let forward = Genotype::parse(&format!("{}{}", x, y));
            let backward = Genotype::parse(&format!("{}{}", y, x));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn prop_display_round_trip_keeps_alleles(x in nucleotide(), y in nucleotide()) {
            let genotype = Genotype::parse(&format!("{}{}", x, y)).unwrap();
            let reparsed = Genotype::parse(&genotype.to_string()).unwrap();
            prop_assert_eq!(reparsed.alleles(), [x, y]);
            prop_assert_eq!(reparsed.canonical(), genotype.canonical());
        }
    }
}
