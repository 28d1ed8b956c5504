// ==============================================================================
// reference.rs - Reference Dataset
// ==============================================================================
// Description: Read-only lookup of variant identifier -> phenotype annotation
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================
// Format (JSON object keyed by rsID):
//   {
//     "rs429358": { "phenotype": "Alzheimer's risk", "gene": "APOE", "pathogenic": ["CC", "CT"] },
//     "rs1801133": { "phenotype": "MTHFR C677T", "pathogenic": ["AA"] }
//   }
// ==============================================================================

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{GeneVariant, Genotype};

/// Errors that can occur while loading a reference dataset
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid reference JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Annotation attached to one reference variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Phenotype label (may be empty)
    pub phenotype: String,

    /// Associated gene, if any
    pub gene: Option<String>,

    /// Genotypes considered clinically notable for this variant
    pub notable: Vec<Genotype>,
}

impl ReferenceEntry {
    /// Build an entry from textual genotypes, dropping unparseable ones
    pub fn new(phenotype: impl Into<String>, gene: Option<&str>, notable: &[&str]) -> Self {
        Self {
            phenotype: phenotype.into(),
            gene: gene.map(str::to_string),
            notable: notable.iter().filter_map(|g| Genotype::parse(g)).collect(),
        }
    }

    /// Whether `genotype` is in this entry's notable set
    pub fn is_notable(&self, genotype: &Genotype) -> bool {
        self.notable.contains(genotype)
    }
}

/// On-disk shape of a reference entry
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    phenotype: Option<String>,
    #[serde(default)]
    gene: Option<String>,
    #[serde(default, alias = "notable")]
    pathogenic: Vec<String>,
}

/// Immutable mapping from variant identifier to its reference annotation
///
/// Lookups are exact and case-sensitive. Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    entries: HashMap<String, ReferenceEntry>,
}

impl ReferenceDataset {
    /// Load a reference dataset from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        info!("Loading reference dataset: {:?}", path);

        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Load a reference dataset from any JSON source
    ///
    /// Notable genotypes that are not two characters long are dropped with a
    /// warning; they could never match an observed genotype.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ReferenceError> {
        let raw: HashMap<String, RawEntry> = serde_json::from_reader(reader)?;

        let entries: HashMap<String, ReferenceEntry> = raw
            .into_iter()
            .map(|(rsid, entry)| {
                let mut notable = Vec::with_capacity(entry.pathogenic.len());
                for text in &entry.pathogenic {
                    match Genotype::parse(text) {
                        Some(genotype) if !notable.contains(&genotype) => notable.push(genotype),
                        Some(_) => {}
                        None => warn!("Dropping invalid notable genotype '{}' for {}", text, rsid),
                    }
                }

                let reference_entry = ReferenceEntry {
                    phenotype: entry.phenotype.unwrap_or_default(),
                    gene: entry.gene.filter(|g| !g.is_empty()),
                    notable,
                };
                (rsid, reference_entry)
            })
            .collect();

        info!("Reference dataset loaded: {} variants", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, rsid: &str) -> Option<&ReferenceEntry> {
        self.entries.get(rsid)
    }

    pub fn contains(&self, rsid: &str) -> bool {
        self.entries.contains_key(rsid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a [`GeneVariant`] for `rsid` if it is a reference variant
    ///
    /// Returns `None` for identifiers the reference does not know. The
    /// notable set is copied from the entry so the variant stands alone.
    pub fn annotate(
        &self,
        rsid: &str,
        chromosome: &str,
        position: &str,
        genotype: Option<Genotype>,
    ) -> Option<GeneVariant> {
        let entry = self.entries.get(rsid)?;

        Some(GeneVariant {
            rsid: rsid.to_string(),
            chromosome: chromosome.to_string(),
            position: position.to_string(),
            genotype,
            phenotype: entry.phenotype.clone(),
            gene: entry.gene.clone().unwrap_or_default(),
            notable: entry.notable.clone(),
        })
    }
}

impl FromIterator<(String, ReferenceEntry)> for ReferenceDataset {
    fn from_iter<I: IntoIterator<Item = (String, ReferenceEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
